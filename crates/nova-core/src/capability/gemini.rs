//! Hosted-model capabilities over the Gemini `generateContent` REST API.
//!
//! Structured calls (planning, synthesis, validation) request JSON output
//! constrained by a schema derived from the response types with `schemars`.
//! Design asks for raw SVG text.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    response::{self, PlanResponse, SynthesisResponse},
    CapabilityError, Capabilities, PlanDraft, ValidationReport,
};
use crate::{
    config::GeminiConfig,
    models::{Milestone, ProjectFile},
};

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;
const MAX_BACKOFF_MS: u64 = 60_000;

const PLANNING_INSTRUCTION: &str = "You are a senior project architect. Break the request down into \
    a structured technical plan: a list of steps, each with an id, a title, a description and the ids \
    of the steps it depends on. Cover research, architecture, implementation, UI design and testing. \
    Respond with JSON only.";

const SYNTHESIS_INSTRUCTION: &str = "You are an expert software engineer. Generate high-quality, \
    production-ready code for the given task, with comments and a modular structure. Emit as many \
    files as the task needs. Respond with a JSON object listing each file's name, path, content and \
    language.";

const VALIDATION_INSTRUCTION: &str = "You are a quality assurance engineer. Review the generated \
    files for syntax errors, logical flaws and missing dependencies. Report whether they passed, \
    overall feedback, and a list of concrete errors.";

const DESIGN_INSTRUCTION: &str = "You are a creative director and senior UI designer. Produce a \
    standalone SVG of a modern UI dashboard or a detailed system architecture diagram. Output only \
    the raw SVG markup: no markdown fences and no text before or after it.";

/// Capabilities backed by Gemini models.
pub struct GeminiCapabilities {
    config: GeminiConfig,
    api_key: String,
    http: Client,
}

impl GeminiCapabilities {
    /// Creates a client from configuration. Fails when no API key is set.
    pub fn from_config(config: GeminiConfig) -> Result<Self, CapabilityError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CapabilityError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(CapabilityError::Network)?;

        Ok(Self {
            config,
            api_key,
            http,
        })
    }

    /// Creates a client configured from the environment.
    pub fn from_env() -> Result<Self, CapabilityError> {
        Self::from_config(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Sends one `generateContent` request and returns the concatenated text
    /// of the first candidate.
    async fn generate(&self, model: &str, body: &Value) -> Result<Option<String>, CapabilityError> {
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);
        debug!("Calling {model} ({} retries allowed)", self.config.max_retries);

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = backoff_ms(attempt);
                warn!("Retrying {model} in {backoff}ms (attempt {attempt})");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    debug!("Network error calling {model}: {e}");
                    last_error = Some(CapabilityError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if !response.status().is_success() {
                let message = response.text().await.unwrap_or_default();
                let error = CapabilityError::Api { status, message };
                if error.is_retryable() && attempt < self.config.max_retries {
                    last_error = Some(error);
                    continue;
                }
                return Err(error);
            }

            let decoded: GenerateContentResponse = response.json().await?;
            return Ok(decoded.text());
        }

        Err(last_error
            .unwrap_or_else(|| CapabilityError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl Capabilities for GeminiCapabilities {
    async fn plan(&self, prompt: &str, images: &[String]) -> Result<Vec<PlanDraft>, CapabilityError> {
        let mut parts = vec![json!({ "text": prompt })];
        parts.extend(images.iter().map(|image| image_part(image)));
        let body = request_body(
            PLANNING_INSTRUCTION,
            parts,
            Some(response_schema::<PlanResponse>()),
        );

        let text = self.generate(&self.config.planning_model, &body).await?;
        Ok(response::parse_plan(text.as_deref()))
    }

    async fn synthesize(
        &self,
        milestone: &Milestone,
        context: &str,
    ) -> Result<Vec<ProjectFile>, CapabilityError> {
        let body = request_body(
            SYNTHESIS_INSTRUCTION,
            vec![json!({ "text": synthesis_prompt(milestone, context) })],
            Some(response_schema::<SynthesisResponse>()),
        );

        let text = self.generate(&self.config.synthesis_model, &body).await?;
        Ok(response::parse_files(text.as_deref()))
    }

    async fn validate(&self, files: &[ProjectFile]) -> Result<ValidationReport, CapabilityError> {
        let body = request_body(
            VALIDATION_INSTRUCTION,
            vec![json!({ "text": validation_prompt(files) })],
            Some(response_schema::<ValidationReport>()),
        );

        let text = self.generate(&self.config.validation_model, &body).await?;
        Ok(response::parse_report(text.as_deref()))
    }

    async fn design(&self, prompt: &str, plan: &[Milestone]) -> Result<Option<String>, CapabilityError> {
        let body = request_body(
            DESIGN_INSTRUCTION,
            vec![json!({ "text": design_prompt(prompt, plan) })],
            None,
        );

        let text = self.generate(&self.config.design_model, &body).await?;
        Ok(response::clean_markup(text.as_deref()))
    }
}

fn request_body(instruction: &str, parts: Vec<Value>, schema: Option<Value>) -> Value {
    let mut body = json!({
        "systemInstruction": { "parts": [{ "text": instruction }] },
        "contents": [{ "role": "user", "parts": parts }],
    });
    if let Some(schema) = schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseJsonSchema": schema,
        });
    }
    body
}

/// JSON schema of `T` without the meta-schema URI.
fn response_schema<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({}));
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    schema
}

/// Exponential delay before retry `attempt` (1-based), capped.
fn backoff_ms(attempt: u32) -> u64 {
    2u64.saturating_pow(attempt.saturating_sub(1))
        .saturating_mul(INITIAL_BACKOFF_MS)
        .min(MAX_BACKOFF_MS)
}

/// Inline image part from a base64 payload or a `data:` URL.
fn image_part(image: &str) -> Value {
    let (mime, data) = match image.split_once(',') {
        Some((header, data)) => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|h| h.split(';').next())
                .filter(|m| !m.is_empty())
                .unwrap_or("image/jpeg");
            (mime, data)
        }
        None => ("image/jpeg", image),
    };
    json!({ "inlineData": { "mimeType": mime, "data": data } })
}

fn synthesis_prompt(milestone: &Milestone, context: &str) -> String {
    format!(
        "Task: {}\nDescription: {}\nContext:\n{}",
        milestone.title, milestone.description, context
    )
}

fn validation_prompt(files: &[ProjectFile]) -> String {
    let listing = files
        .iter()
        .map(|f| format!("--- {} ---\n{}", f.path, f.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Analyze these files for bugs:\n{listing}")
}

fn design_prompt(prompt: &str, plan: &[Milestone]) -> String {
    let steps = plan
        .iter()
        .map(|m| m.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Generate a complete SVG mockup or diagram for: {prompt}. Steps involved in the process: {steps}")
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(backoff_ms(1), 1000);
        assert_eq!(backoff_ms(2), 2000);
        assert_eq!(backoff_ms(4), 8000);
        assert_eq!(backoff_ms(7), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(65), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(u32::MAX), MAX_BACKOFF_MS);
    }

    #[test]
    fn test_missing_api_key() {
        let result = GeminiCapabilities::from_config(GeminiConfig::default());
        assert!(matches!(result, Err(CapabilityError::MissingApiKey)));

        let result = GeminiCapabilities::from_config(GeminiConfig::default().with_api_key("  "));
        assert!(matches!(result, Err(CapabilityError::MissingApiKey)));
    }

    #[test]
    fn test_from_config_with_key() {
        let client = GeminiCapabilities::from_config(GeminiConfig::default().with_api_key("k")).unwrap();
        assert_eq!(client.config().design_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_request_body_with_schema() {
        let body = request_body(
            "be terse",
            vec![json!({ "text": "hi" })],
            Some(response_schema::<PlanResponse>()),
        );
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be terse");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let schema = &body["generationConfig"]["responseJsonSchema"];
        assert!(schema["properties"]["plan"].is_object());
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn test_request_body_without_schema() {
        let body = request_body("draw", vec![json!({ "text": "x" })], None);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_image_part() {
        let part = image_part("data:image/png;base64,AAAA");
        assert_eq!(part["inlineData"]["mimeType"], "image/png");
        assert_eq!(part["inlineData"]["data"], "AAAA");

        let part = image_part("BBBB");
        assert_eq!(part["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(part["inlineData"]["data"], "BBBB");
    }

    #[test]
    fn test_prompts() {
        let milestone = Milestone::new("a", "Build API").with_description("REST endpoints");
        assert_eq!(
            synthesis_prompt(&milestone, "FILE: a.ts\nx"),
            "Task: Build API\nDescription: REST endpoints\nContext:\nFILE: a.ts\nx"
        );

        let files = vec![ProjectFile::new("a.ts", "x"), ProjectFile::new("b.ts", "y")];
        assert_eq!(
            validation_prompt(&files),
            "Analyze these files for bugs:\n--- a.ts ---\nx\n\n--- b.ts ---\ny"
        );

        let plan = vec![Milestone::new("a", "Setup"), Milestone::new("b", "Ship")];
        assert!(design_prompt("todo app", &plan).ends_with("Steps involved in the process: Setup, Ship"));
    }

    #[test]
    fn test_response_text() {
        let decoded: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"plan\":"},{"text":"[]}"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(decoded.text().as_deref(), Some(r#"{"plan":[]}"#));

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);
    }
}
