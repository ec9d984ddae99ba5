//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper handles the empty case itself so front ends can print it
//! unconditionally.

use std::{fmt, ops::Index};

use crate::models::{LogEntry, ProjectFile, Visual};

/// Listing of generated files, one line per artifact.
///
/// Later artifacts with an already-listed path are marked as revisions, the
/// way the file tree shows repeated synthesis output.
///
/// # Examples
///
/// ```rust
/// use nova_core::{display::Files, models::ProjectFile};
///
/// let files = Files(vec![
///     ProjectFile::new("index.html", "<html></html>"),
///     ProjectFile::new("index.html", "<html>v2</html>"),
/// ]);
/// let output = files.to_string();
/// assert!(output.contains("`index.html`"));
/// assert!(output.contains("(revision 2)"));
/// ```
pub struct Files(pub Vec<ProjectFile>);

impl Files {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectFile> {
        self.0.iter()
    }
}

impl Index<usize> for Files {
    type Output = ProjectFile;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Files {
    type Item = &'a ProjectFile;
    type IntoIter = std::slice::Iter<'a, ProjectFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Files {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No files generated yet.");
        }
        for (index, file) in self.0.iter().enumerate() {
            let revision = self.0[..index].iter().filter(|p| p.path == file.path).count();
            write!(f, "- [{}] `{}` ({} chars)", file.label(), file.path, file.content.len())?;
            if revision > 0 {
                write!(f, " (revision {})", revision + 1)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The log feed, newest first.
pub struct Logs(pub Vec<LogEntry>);

impl Logs {
    /// Keeps at most `limit` of the newest entries.
    pub fn latest(mut self, limit: usize) -> Self {
        self.0.truncate(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Logs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No activity yet.");
        }
        for entry in &self.0 {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Titles of the rendered visuals.
pub struct Visuals(pub Vec<Visual>);

impl fmt::Display for Visuals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No visuals rendered yet.");
        }
        for (index, visual) in self.0.iter().enumerate() {
            writeln!(f, "{}. {} ({})", index + 1, visual.title, visual.kind)?;
        }
        Ok(())
    }
}
