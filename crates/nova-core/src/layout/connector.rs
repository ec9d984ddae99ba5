//! Dependency connectors between milestone rows.
//!
//! A connector is a quadratic Bézier curve from the left-edge midpoint of the
//! dependency to a point just below the top-left of the dependent. The
//! control point bows out into the left margin so connectors never cross
//! the rows themselves.

use std::fmt;

use super::{Layout, LayoutConfig, Point};
use crate::models::{MilestoneStatus, Plan};

/// Visual state of a connector.
///
/// `Satisfied` takes precedence over `Related`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorState {
    /// The dependency is done
    Satisfied,
    /// Either endpoint is the hovered milestone
    Related,
    Default,
}

/// Stroke attributes for one connector state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorStyle {
    pub stroke: &'static str,
    pub width: f64,
    pub opacity: f64,
    /// SVG dash pattern; `None` draws a solid line
    pub dash: Option<&'static str>,
    /// Draw a wide, faint underlay beneath the stroke
    pub glow: bool,
    pub marker: &'static str,
}

/// Stroke of the glow underlay drawn beneath satisfied connectors.
pub const GLOW_STYLE: ConnectorStyle = ConnectorStyle {
    stroke: "#10b981",
    width: 4.0,
    opacity: 0.1,
    dash: None,
    glow: false,
    marker: "",
};

impl ConnectorState {
    pub const ALL: [ConnectorState; 3] = [
        ConnectorState::Satisfied,
        ConnectorState::Related,
        ConnectorState::Default,
    ];

    pub fn classify(dependency_status: MilestoneStatus, related: bool) -> Self {
        if dependency_status == MilestoneStatus::Done {
            ConnectorState::Satisfied
        } else if related {
            ConnectorState::Related
        } else {
            ConnectorState::Default
        }
    }

    pub fn style(&self) -> ConnectorStyle {
        match self {
            ConnectorState::Satisfied => ConnectorStyle {
                stroke: "#10b981",
                width: 1.5,
                opacity: 0.6,
                dash: None,
                glow: true,
                marker: self.marker_id(),
            },
            ConnectorState::Related => ConnectorStyle {
                stroke: "#818cf8",
                width: 2.5,
                opacity: 0.8,
                dash: None,
                glow: false,
                marker: self.marker_id(),
            },
            ConnectorState::Default => ConnectorStyle {
                stroke: "#6366f1",
                width: 1.5,
                opacity: 0.2,
                dash: Some("4 2"),
                glow: false,
                marker: self.marker_id(),
            },
        }
    }

    /// ID of the arrowhead marker definition for this state.
    pub fn marker_id(&self) -> &'static str {
        match self {
            ConnectorState::Satisfied => "arrowhead-done",
            ConnectorState::Related => "arrowhead-highlight",
            ConnectorState::Default => "arrowhead-default",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorState::Satisfied => "satisfied",
            ConnectorState::Related => "related",
            ConnectorState::Default => "default",
        }
    }
}

impl fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quadratic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePath {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl CurvePath {
    /// Curve between two anchors whose control point sits left of both,
    /// halfway down. The bow grows with the horizontal gap between them.
    pub fn between(start: Point, end: Point, config: &LayoutConfig) -> Self {
        let gap = (start.x - end.x).abs();
        let control = Point::new(
            start.x.min(end.x) - config.bow - config.bow_per_gap * gap,
            (start.y + end.y) / 2.0,
        );
        Self {
            start,
            control,
            end,
        }
    }

    /// SVG path data.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

/// One drawn dependency edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    /// The dependency
    pub from: String,
    /// The dependent
    pub to: String,
    pub path: CurvePath,
    pub state: ConnectorState,
}

impl Connector {
    pub fn style(&self) -> ConnectorStyle {
        self.state.style()
    }
}

/// Computes one connector per dependency edge whose endpoints both have a
/// position in `layout`, in plan order of the dependents.
pub fn connectors(
    plan: &Plan,
    layout: &Layout,
    hovered: Option<&str>,
    config: &LayoutConfig,
) -> Vec<Connector> {
    let mut result = Vec::new();
    for dependent in plan {
        let Some(target) = layout.node(&dependent.id) else {
            continue;
        };
        for dep_id in &dependent.dependencies {
            let (Some(source), Some(dependency)) = (layout.node(dep_id), plan.get(dep_id)) else {
                continue;
            };
            let related = hovered == Some(dependent.id.as_str()) || hovered == Some(dep_id.as_str());
            result.push(Connector {
                from: dep_id.clone(),
                to: dependent.id.clone(),
                path: CurvePath::between(source.left_mid(), target.entry(config.entry_offset), config),
                state: ConnectorState::classify(dependency.status, related),
            });
        }
    }
    result
}
