//! Display implementations for domain models.
//!
//! Kept apart from the model definitions. Output is Markdown with status
//! icons.

use std::fmt;

use super::datetime::LocalTime;
use crate::{
    models::{
        FileKind, LogEntry, Milestone, MilestoneStatus, Plan, ProjectFile, ProjectState,
        ProjectStatus, Severity, Visual, VisualKind,
    },
    orchestrator::RunReport,
};

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {} ({})", self.id, self.title, self.status.with_icon())?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        if !self.dependencies.is_empty() {
            writeln!(f, "- Depends on: {}", self.dependencies.join(", "))?;
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Markdown roadmap: progress line, then every milestone in execution order.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No milestones in this plan.");
        }

        writeln!(
            f,
            "## Roadmap ({}/{} done, {:.0}%)",
            self.completed(),
            self.len(),
            self.progress() * 100.0
        )?;
        writeln!(f)?;
        for milestone in self {
            write!(f, "{milestone}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ProjectFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.path, self.label())?;
        writeln!(f)?;
        let fence = self
            .language
            .clone()
            .or_else(|| self.extension())
            .unwrap_or_default();
        writeln!(f, "```{fence}")?;
        write!(f, "{}", self.content)?;
        if !self.content.ends_with('\n') {
            writeln!(f)?;
        }
        writeln!(f, "```")
    }
}

impl fmt::Display for Visual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.title, self.kind)?;
        writeln!(f)?;
        writeln!(f, "{}", self.content)
    }
}

/// `[HH:MM:SS] AGENT: message`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            LocalTime(&self.timestamp),
            self.agent.to_uppercase(),
            self.message
        )
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prompt.is_empty() {
            writeln!(f, "# Untitled project")?;
        } else {
            writeln!(f, "# {}", self.prompt)?;
        }
        writeln!(f)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Files: {}", self.files.len())?;
        writeln!(f, "- Visuals: {}", self.visuals.len())?;
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            return writeln!(f, "Every milestone is already done.");
        }
        writeln!(
            f,
            "Executed {} milestone(s), {} artifact(s) generated.",
            self.executed.len(),
            self.artifacts
        )?;
        if !self.skipped.is_empty() {
            writeln!(f, "- Skipped (already done): {}", self.skipped.join(", "))?;
        }
        if !self.corrected.is_empty() {
            writeln!(f, "- Self-corrected: {}", self.corrected.join(", "))?;
        }
        if self.visual {
            writeln!(f, "- Blueprint rendered")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_display() {
        let plan = Plan::from(vec![
            Milestone::new("a", "Scaffold").with_status(MilestoneStatus::Done),
            Milestone::new("b", "Wire API")
                .with_description("REST endpoints")
                .with_dependencies(["a"]),
        ]);
        let output = plan.to_string();

        assert!(output.starts_with("## Roadmap (1/2 done, 50%)"));
        assert!(output.contains("### a. Scaffold (✓ Done)"));
        assert!(output.contains("### b. Wire API (○ Pending)"));
        assert!(output.contains("REST endpoints"));
        assert!(output.contains("- Depends on: a"));
    }

    #[test]
    fn test_empty_plan_display() {
        assert_eq!(Plan::new().to_string(), "No milestones in this plan.\n");
    }

    #[test]
    fn test_log_entry_display() {
        let entry = LogEntry::new("Coder", "Synthesizing API...", Severity::Info);
        let output = entry.to_string();
        assert!(output.starts_with('['));
        assert!(output.ends_with("] CODER: Synthesizing API..."));
    }

    #[test]
    fn test_file_display_fences_content() {
        let file = ProjectFile::new("src/app.ts", "export {}");
        let output = file.to_string();
        assert!(output.starts_with("## src/app.ts (JS)"));
        assert!(output.contains("```ts\nexport {}\n```"));
    }

    #[test]
    fn test_run_report_display() {
        let report = RunReport {
            executed: vec!["b".into()],
            skipped: vec!["a".into()],
            corrected: vec!["b".into()],
            artifacts: 2,
            visual: true,
        };
        let output = report.to_string();
        assert!(output.contains("Executed 1 milestone(s), 2 artifact(s) generated."));
        assert!(output.contains("Skipped (already done): a"));
        assert!(output.contains("Self-corrected: b"));
        assert_eq!(RunReport::default().to_string(), "Every milestone is already done.\n");
    }
}
