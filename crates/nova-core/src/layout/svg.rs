//! Standalone SVG rendering of the plan graph.

use std::fmt::Write;

use super::{connector::GLOW_STYLE, Connector, ConnectorState, Layout};
use crate::models::{MilestoneStatus, Plan};

/// Renders rows and connectors. Connectors are drawn after the rows so they
/// sit on top, the way the overlay does.
pub fn render(plan: &Plan, layout: &Layout, connectors: &[Connector]) -> String {
    let width = layout.width();
    let height = layout.height().max(1.0);
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    out.push_str(&markers());

    for (id, node) in layout.iter() {
        let Some(milestone) = plan.get(id) else {
            continue;
        };
        let _ = writeln!(
            out,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="12" fill="{}" stroke="{}"/>"#,
            node.x,
            node.y,
            node.width,
            node.height,
            row_fill(milestone.status),
            row_stroke(milestone.status),
        );
        let _ = writeln!(
            out,
            r##"  <text x="{}" y="{}" font-family="sans-serif" font-size="14" fill="#e2e8f0">{}</text>"##,
            node.x + 16.0,
            node.y + 28.0,
            escape(&milestone.title),
        );
        let _ = writeln!(
            out,
            r##"  <text x="{}" y="{}" font-family="monospace" font-size="11" fill="#94a3b8">{} · {}</text>"##,
            node.x + 16.0,
            node.y + 48.0,
            escape(&milestone.id),
            milestone.status,
        );
    }

    for connector in connectors {
        let d = connector.path.to_svg_path();
        let style = connector.style();
        if style.glow {
            let _ = writeln!(
                out,
                r#"  <path d="{d}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"#,
                GLOW_STYLE.stroke, GLOW_STYLE.width, GLOW_STYLE.opacity,
            );
        }
        let dash = style
            .dash
            .map(|pattern| format!(r#" stroke-dasharray="{pattern}""#))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            r#"  <path d="{d}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}"{dash} marker-end="url(#{})" data-from="{}" data-to="{}"/>"#,
            style.stroke,
            style.width,
            style.opacity,
            style.marker,
            escape(&connector.from),
            escape(&connector.to),
        );
    }

    out.push_str("</svg>\n");
    out
}

fn markers() -> String {
    let mut defs = String::from("  <defs>\n");
    for state in ConnectorState::ALL {
        let style = state.style();
        let _ = writeln!(
            defs,
            r#"    <marker id="{}" markerWidth="8" markerHeight="6" refX="7" refY="3" orient="auto"><polygon points="0 0, 8 3, 0 6" fill="{}" fill-opacity="{}"/></marker>"#,
            style.marker, style.stroke, style.opacity,
        );
    }
    defs.push_str("  </defs>\n");
    defs
}

fn row_fill(status: MilestoneStatus) -> &'static str {
    match status {
        MilestoneStatus::Done => "#064e3b",
        MilestoneStatus::Running => "#312e81",
        MilestoneStatus::Failed => "#7f1d1d",
        MilestoneStatus::Pending => "#1e293b",
    }
}

fn row_stroke(status: MilestoneStatus) -> &'static str {
    match status {
        MilestoneStatus::Done => "#10b981",
        MilestoneStatus::Running => "#6366f1",
        MilestoneStatus::Failed => "#ef4444",
        MilestoneStatus::Pending => "#334155",
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layout::LayoutEngine, models::Milestone};

    fn render_plan(plan: &Plan) -> String {
        let mut engine = LayoutEngine::default();
        engine.recompute(plan);
        engine.render_svg(plan)
    }

    #[test]
    fn test_render_contains_rows_and_connectors() {
        let plan = Plan::from(vec![
            Milestone::new("a", "Setup").with_status(MilestoneStatus::Done),
            Milestone::new("b", "Build <api>").with_dependencies(["a"]),
        ]);
        let svg = render_plan(&plan);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Build &lt;api&gt;"));
        assert!(svg.contains(r#"marker-end="url(#arrowhead-done)""#));
        assert!(svg.contains(r#"data-from="a" data-to="b""#));
        // Glow underlay plus the stroke itself
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_render_defines_all_markers() {
        let svg = render_plan(&Plan::new());
        for id in ["arrowhead-done", "arrowhead-highlight", "arrowhead-default"] {
            assert!(svg.contains(&format!(r#"<marker id="{id}""#)));
        }
    }

    #[test]
    fn test_default_connector_is_dashed() {
        let plan = Plan::from(vec![
            Milestone::new("a", "A"),
            Milestone::new("b", "B").with_dependencies(["a"]),
        ]);
        let svg = render_plan(&plan);
        assert!(svg.contains(r#"stroke-dasharray="4 2""#));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a & "b" <c>"#), "a &amp; &quot;b&quot; &lt;c&gt;");
    }
}
