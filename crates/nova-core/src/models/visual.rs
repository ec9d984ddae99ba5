//! Rendered visuals (diagrams and mockups).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    Chart,
    Mockup,
    #[default]
    Diagram,
}

impl VisualKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualKind::Chart => "chart",
            VisualKind::Mockup => "mockup",
            VisualKind::Diagram => "diagram",
        }
    }
}

/// A visual produced by the design capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visual {
    #[serde(rename = "type")]
    pub kind: VisualKind,

    /// Raw SVG or HTML markup
    pub content: String,

    pub title: String,
}

impl Visual {
    /// Title given to the diagram rendered after a run.
    pub const BLUEPRINT_TITLE: &'static str = "Engineering Blueprint";

    pub fn diagram(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: VisualKind::Diagram,
            content: content.into(),
            title: title.into(),
        }
    }
}
