//! Terminal rendering module for rich markdown output
//!
//! Uses termimad for markdown display, with a plain-text fallback.

use anyhow::Result;
use nova_core::{LogEntry, Severity};
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.code_block.set_bg(Color::AnsiValue(236));
        skin.inline_code.set_bg(Color::AnsiValue(236));
        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            // Headers keep their hash marks
            for line in markdown.lines() {
                if line.starts_with('#') {
                    println!("\x1b[36m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
        }
        Ok(())
    }

    /// Prints one log entry, colored by severity.
    pub fn log_entry(&self, entry: &LogEntry) {
        if !self.rich_enabled {
            println!("{entry}");
            return;
        }
        let color = match entry.severity {
            Severity::Info => "37",
            Severity::Success => "32",
            Severity::Warning => "33",
            Severity::Error => "31",
        };
        println!("\x1b[{color}m{entry}\x1b[0m");
    }

    /// Prints raw content (HTML, SVG) without markdown processing.
    pub fn raw(&self, content: &str) {
        println!("{content}");
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        assert!(renderer.render("# Title\n").is_ok());
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }
}
