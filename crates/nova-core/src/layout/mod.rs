//! Layout and connector engine for the plan graph view.
//!
//! Node positions come from a declarative row model rather than from
//! measuring rendered output: every milestone is a row in a vertical list,
//! indented from the left edge so dependency connectors have room to bow
//! into the margin. The expanded row (detail panel open) is taller.
//!
//! ```text
//!   header
//!   ┌──────────────┐
//!  ╭┤ a            │   row 0
//!  │└──────────────┘
//!  │┌──────────────┐
//!  ╰▶ b            │   row 1 (depends on a)
//!   └──────────────┘
//! ```
//!
//! Everything here is derived data: nothing is mutated or persisted. A
//! [`LayoutEngine`] keeps the current view state (expanded and hovered
//! milestone, container width) and recomputes positions and connectors when
//! notified, with a trailing recompute scheduled by [`RelayoutScheduler`].

use std::{collections::HashMap, time::Duration};

use crate::models::Plan;

pub mod connector;
pub mod schedule;
pub mod svg;

pub use connector::{connectors, Connector, ConnectorState, ConnectorStyle, CurvePath};
pub use schedule::{LayoutTrigger, RelayoutScheduler};

/// Tunables of the row model and connector geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Left margin between the container edge and the rows
    pub indent: f64,
    /// Space above the first row (toolbar and progress bar)
    pub header_height: f64,
    pub row_height: f64,
    pub expanded_height: f64,
    pub row_gap: f64,
    /// Width used when the container is narrower than this
    pub min_width: f64,
    /// Fixed leftward offset of a connector's control point
    pub bow: f64,
    /// Extra leftward offset per unit of horizontal gap between endpoints
    pub bow_per_gap: f64,
    /// Distance below a dependent's top edge where a connector ends
    pub entry_offset: f64,
    /// Trailing delay before the settle-time recompute
    pub settle: Duration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent: 40.0,
            header_height: 72.0,
            row_height: 96.0,
            expanded_height: 360.0,
            row_gap: 16.0,
            min_width: 240.0,
            bow: 50.0,
            bow_per_gap: 0.5,
            entry_offset: 10.0,
            settle: Duration::from_millis(400),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of one milestone row, relative to the scrolling container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    /// Vertical midpoint of the left edge; where outgoing connectors start.
    pub fn left_mid(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    /// Point on the left edge `offset` below the top; where incoming
    /// connectors end.
    pub fn entry(&self, offset: f64) -> Point {
        Point::new(self.x, self.y + offset)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// View state that affects geometry or connector styling.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Milestone whose detail panel is open
    pub expanded: Option<String>,
    /// Milestone under the pointer
    pub hovered: Option<String>,
    pub container_width: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            expanded: None,
            hovered: None,
            container_width: 896.0,
        }
    }
}

/// Computed row positions for a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    order: Vec<String>,
    nodes: HashMap<String, NodeBox>,
    width: f64,
    height: f64,
}

impl Layout {
    /// Lays out every milestone of the plan as a row.
    pub fn compute(plan: &Plan, view: &ViewState, config: &LayoutConfig) -> Self {
        let width = view.container_width.max(config.min_width + config.indent);
        let row_width = width - config.indent;
        let mut y = config.header_height;
        let mut order = Vec::with_capacity(plan.len());
        let mut nodes = HashMap::with_capacity(plan.len());

        for (index, milestone) in plan.iter().enumerate() {
            if index > 0 {
                y += config.row_gap;
            }
            let height = if view.expanded.as_deref() == Some(milestone.id.as_str()) {
                config.expanded_height
            } else {
                config.row_height
            };
            nodes.insert(
                milestone.id.clone(),
                NodeBox {
                    x: config.indent,
                    y,
                    width: row_width,
                    height,
                },
            );
            order.push(milestone.id.clone());
            y += height;
        }

        Self {
            order,
            nodes,
            width,
            height: y,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeBox> {
        self.nodes.get(id)
    }

    /// Rows in plan order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeBox)> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|node| (id.as_str(), node)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Total content height including the header.
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Keeps the derived layout and connectors in sync with the plan and view.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    view: ViewState,
    scheduler: RelayoutScheduler,
    layout: Layout,
    connectors: Vec<Connector>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let scheduler = RelayoutScheduler::new(config.settle);
        Self {
            config,
            view: ViewState::default(),
            scheduler,
            layout: Layout::default(),
            connectors: Vec::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Handles a render-affecting change by recomputing right away. Returns
    /// whether a trailing recompute is now scheduled.
    pub fn notify(&mut self, trigger: LayoutTrigger, plan: &Plan, now: std::time::Instant) -> bool {
        self.recompute(plan);
        self.scheduler.notify(trigger, now)
    }

    /// Fires the trailing recompute once its deadline has passed.
    pub fn tick(&mut self, plan: &Plan, now: std::time::Instant) -> bool {
        let due = self.scheduler.poll(now);
        if due {
            self.recompute(plan);
        }
        due
    }

    /// Opens the detail panel of `id`, or closes it when already open.
    pub fn toggle_expanded(&mut self, id: &str, plan: &Plan, now: std::time::Instant) {
        if self.view.expanded.as_deref() == Some(id) {
            self.view.expanded = None;
        } else {
            self.view.expanded = Some(id.to_string());
        }
        self.notify(LayoutTrigger::ExpandToggled, plan, now);
    }

    pub fn resize(&mut self, container_width: f64, plan: &Plan, now: std::time::Instant) {
        self.view.container_width = container_width;
        self.notify(LayoutTrigger::Resized, plan, now);
    }

    /// Updates the hover focus. Only connector styling depends on it, so
    /// positions are left alone.
    pub fn set_hovered(&mut self, id: Option<&str>, plan: &Plan) {
        self.view.hovered = id.map(String::from);
        self.connectors = connectors(plan, &self.layout, self.view.hovered.as_deref(), &self.config);
    }

    /// Recomputes positions and connectors immediately.
    pub fn recompute(&mut self, plan: &Plan) {
        self.layout = Layout::compute(plan, &self.view, &self.config);
        self.connectors = connectors(plan, &self.layout, self.view.hovered.as_deref(), &self.config);
    }

    /// Renders the current layout and connectors as a standalone SVG.
    pub fn render_svg(&self, plan: &Plan) -> String {
        svg::render(plan, &self.layout, &self.connectors)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
