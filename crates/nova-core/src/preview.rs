//! Live preview assembly.
//!
//! Stitches the generated artifacts into one self-contained HTML document:
//! the entry page with every stylesheet inlined as `<style>` and every script
//! inlined as `<script>`.
//!
//! Artifacts are append-only, so a path can appear several times. Only the
//! newest revision of each path takes part, in order of first appearance.

use log::debug;

use crate::models::{ProjectFile, ProjectState};

const ENTRY_PAGE: &str = "index.html";
const HEAD_CLOSE: &str = "</head>";
const BODY_CLOSE: &str = "</body>";

/// Builds the preview document, or `None` when no HTML file exists.
///
/// # Examples
///
/// ```rust
/// use nova_core::{models::ProjectFile, preview};
///
/// let files = vec![
///     ProjectFile::new("index.html", "<html><head></head><body></body></html>"),
///     ProjectFile::new("style.css", "body { margin: 0 }"),
/// ];
/// let html = preview::assemble(&files).unwrap();
/// assert!(html.contains("<style>\nbody { margin: 0 }\n</style>\n</head>"));
///
/// assert!(preview::assemble(&[ProjectFile::new("app.ts", "")]).is_none());
/// ```
pub fn assemble(files: &[ProjectFile]) -> Option<String> {
    let files = latest_revisions(files);
    let page = files
        .iter()
        .find(|f| f.path.ends_with(ENTRY_PAGE))
        .or_else(|| files.iter().find(|f| f.path.ends_with(".html")))?;
    debug!("Assembling preview from {}", page.path);

    let mut content = page.content.clone();
    for file in files.iter().filter(|f| f.path.ends_with(".css")) {
        let style = format!("<style>\n{}\n</style>", file.content);
        content = insert_before(content, HEAD_CLOSE, &style, Placement::Prepend);
    }
    for file in files.iter().filter(|f| is_inline_script(&f.path)) {
        let script = format!("<script>\n{}\n</script>", file.content);
        content = insert_before(content, BODY_CLOSE, &script, Placement::Append);
    }
    Some(content)
}

impl ProjectState {
    /// The assembled preview of the current artifacts.
    pub fn preview(&self) -> Option<String> {
        assemble(&self.files)
    }
}

/// Where a fragment goes when its anchor tag is missing.
enum Placement {
    Prepend,
    Append,
}

fn insert_before(content: String, anchor: &str, fragment: &str, fallback: Placement) -> String {
    if content.contains(anchor) {
        return content.replacen(anchor, &format!("{fragment}\n{anchor}"), 1);
    }
    match fallback {
        Placement::Prepend => format!("{fragment}{content}"),
        Placement::Append => format!("{content}{fragment}"),
    }
}

/// Plain scripts and TSX modules, except the application root component.
fn is_inline_script(path: &str) -> bool {
    path.ends_with(".js") || (path.ends_with(".tsx") && !path.contains("App.tsx"))
}

fn latest_revisions(files: &[ProjectFile]) -> Vec<&ProjectFile> {
    let mut latest: Vec<&ProjectFile> = Vec::new();
    for file in files {
        match latest.iter_mut().find(|kept| kept.path == file.path) {
            Some(kept) => *kept = file,
            None => latest.push(file),
        }
    }
    latest
}
