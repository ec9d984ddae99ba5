//! Tolerant decoding of structured model responses.
//!
//! Each capability has a fallback value for a missing or malformed response.
//! Decoding never fails; problems are logged and the fallback is returned.

use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{PlanDraft, ValidationReport};
use crate::models::ProjectFile;

/// Feedback used when a validation response cannot be decoded.
pub const UNPARSABLE_FEEDBACK: &str = "Error parsing response";

/// Planning response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PlanResponse {
    #[serde(default)]
    pub plan: Vec<PlanDraft>,
}

/// One generated file as the synthesis capability returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FileDraft {
    #[serde(default)]
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Synthesis response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SynthesisResponse {
    #[serde(default)]
    pub files: Vec<FileDraft>,
}

impl From<FileDraft> for ProjectFile {
    fn from(draft: FileDraft) -> Self {
        let mut file = ProjectFile::new(draft.path, draft.content);
        if !draft.name.trim().is_empty() {
            file.name = draft.name;
        }
        if let Some(language) = draft.language.filter(|l| !l.trim().is_empty()) {
            file = file.with_language(language);
        }
        file
    }
}

/// Decodes a planning response. Empty or malformed text yields no drafts.
pub fn parse_plan(text: Option<&str>) -> Vec<PlanDraft> {
    decode::<PlanResponse>(text, "plan")
        .map(|response| response.plan)
        .unwrap_or_default()
}

/// Decodes a synthesis response. Entries without a path are dropped.
pub fn parse_files(text: Option<&str>) -> Vec<ProjectFile> {
    decode::<SynthesisResponse>(text, "synthesis")
        .map(|response| {
            response
                .files
                .into_iter()
                .filter(|draft| !draft.path.trim().is_empty())
                .map(ProjectFile::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Decodes a validation report. Anything undecodable counts as a failure.
pub fn parse_report(text: Option<&str>) -> ValidationReport {
    decode::<ValidationReport>(text, "validation")
        .unwrap_or_else(|| ValidationReport::failed(UNPARSABLE_FEEDBACK))
}

/// Cleans raw diagram markup. Markdown fences around the markup are removed
/// and blank output becomes `None`.
pub fn clean_markup(text: Option<&str>) -> Option<String> {
    let trimmed = strip_fences(text?.trim());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn decode<T: for<'de> Deserialize<'de>>(text: Option<&str>, what: &str) -> Option<T> {
    let body = strip_fences(text?.trim());
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Could not decode {what} response: {e}");
            None
        }
    }
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string (```json, ```svg, ...)
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileKind;

    #[test]
    fn test_parse_plan() {
        let drafts = parse_plan(Some(
            r#"{"plan":[{"id":"a","title":"Setup","description":"d","dependencies":[]},
                        {"id":"b","title":"Build","description":"","dependencies":["a"]}]}"#,
        ));
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].dependencies, vec!["a"]);
    }

    #[test]
    fn test_parse_plan_fallbacks() {
        assert!(parse_plan(None).is_empty());
        assert!(parse_plan(Some("   ")).is_empty());
        assert!(parse_plan(Some("not json")).is_empty());
        assert!(parse_plan(Some(r#"{"other":1}"#)).is_empty());
    }

    #[test]
    fn test_parse_files() {
        let files = parse_files(Some(
            r#"{"files":[{"name":"App.tsx","path":"src/App.tsx","content":"x","language":"typescript"},
                         {"name":"bad","path":"","content":"y"}]}"#,
        ));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/App.tsx");
        assert_eq!(files[0].name, "App.tsx");
        assert_eq!(files[0].kind, FileKind::Code);
        assert_eq!(files[0].language.as_deref(), Some("typescript"));
    }

    #[test]
    fn test_parse_files_malformed_is_empty() {
        assert!(parse_files(Some("{\"files\": [")).is_empty());
    }

    #[test]
    fn test_parse_report() {
        let report = parse_report(Some(r#"{"passed":true,"feedback":"LGTM"}"#));
        assert!(report.passed);
        assert_eq!(report.feedback, "LGTM");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_parse_report_unparsable_fails() {
        for text in [None, Some(""), Some("<html>")] {
            let report = parse_report(text);
            assert!(!report.passed);
            assert_eq!(report.feedback, UNPARSABLE_FEEDBACK);
        }
    }

    #[test]
    fn test_fenced_json() {
        let drafts = parse_plan(Some("```json\n{\"plan\":[{\"id\":\"a\",\"title\":\"A\"}]}\n```"));
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn test_clean_markup() {
        assert_eq!(
            clean_markup(Some("```svg\n<svg></svg>\n```")),
            Some("<svg></svg>".to_string())
        );
        assert_eq!(clean_markup(Some("  <svg/>  ")), Some("<svg/>".to_string()));
        assert_eq!(clean_markup(Some(" \n ")), None);
        assert_eq!(clean_markup(None), None);
    }
}
