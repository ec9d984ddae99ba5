//! Generated file model.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Broad category of a generated file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[default]
    Code,
    Doc,
    Image,
    Data,
}

impl FileKind {
    /// Infers the kind from a path's extension.
    pub fn from_path(path: &str) -> Self {
        match extension(path).as_deref() {
            Some("md" | "txt" | "rst" | "adoc") => FileKind::Doc,
            Some("png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico") => FileKind::Image,
            Some("json" | "yaml" | "yml" | "toml" | "csv" | "xml" | "sql") => FileKind::Data,
            _ => FileKind::Code,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Code => "code",
            FileKind::Doc => "doc",
            FileKind::Image => "image",
            FileKind::Data => "data",
        }
    }
}

/// A file produced by the synthesis capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectFile {
    /// Display name (usually the file name)
    #[serde(default)]
    pub name: String,

    /// Path used as the lookup key and for preview assembly
    pub path: String,

    /// Full text content
    #[serde(default)]
    pub content: String,

    #[serde(rename = "type", default)]
    pub kind: FileKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ProjectFile {
    /// Creates a file, deriving its name and kind from the path.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        let kind = FileKind::from_path(&path);
        Self {
            name,
            path,
            content: content.into(),
            kind,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Lower-case extension of the path, if any.
    pub fn extension(&self) -> Option<String> {
        extension(&self.path)
    }

    /// Short label for file listings, keyed by extension.
    pub fn label(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("js" | "ts" | "tsx" | "jsx") => "JS",
            Some("py") => "PY",
            Some("html") => "HTML",
            Some("css") => "CSS",
            Some("json") => "JSON",
            Some("md") => "MD",
            Some("rs") => "RS",
            _ => "FILE",
        }
    }
}

fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
