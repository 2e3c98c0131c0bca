//! Output naming: group folder, leaf names, on-disk paths and public URLs.
//!
//! Every function here is pure. The group is derived from the *name* the
//! caller supplied, never from file content, so re-running a conversion of
//! the same document always lands in the same folder.

use crate::output::OutputFile;
use crate::workspace::WorkspaceContext;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static PDF_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.pdf$").expect("static regex is valid"));

/// File name of the assembled Markdown document inside the group folder.
pub const MARKDOWN_LEAF: &str = "result.md";

/// `true` when `name` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(name: &str) -> bool {
    PDF_EXTENSION.is_match(name)
}

/// Derive the group (output folder / display name) from a file name.
///
/// Directory components (`/` or `\`) are dropped and a trailing `.pdf` is
/// removed case-insensitively. Anything else, including non-Latin text and
/// inner dots, is kept verbatim. A bare `.pdf` is left as-is rather than
/// collapsing to an empty name.
pub fn group_of(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stripped = PDF_EXTENSION.replace(base, "");
    if stripped.is_empty() {
        base.to_string()
    } else {
        stripped.into_owned()
    }
}

/// `page-<n>.png` for a 1-indexed page number.
pub fn image_leaf(page_num: usize) -> String {
    format!("page-{page_num}.png")
}

/// `result.md`.
pub fn markdown_leaf() -> &'static str {
    MARKDOWN_LEAF
}

/// `volume/group/leaf`.
pub fn output_path(volume: &Path, group: &str, leaf: &str) -> PathBuf {
    volume.join(group).join(leaf)
}

/// `group/leaf`, relative to the workspace volume.
pub fn relative_name(group: &str, leaf: &str) -> String {
    Path::new(group).join(leaf).to_string_lossy().into_owned()
}

/// Join `base_url` with `group/leaf` using URL path semantics.
///
/// Exactly one `/` separates each segment and nothing is percent-encoded, so
/// a group like `入门指南` appears in the URL unchanged.
pub fn output_url(base_url: &str, group: &str, leaf: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let group = group.trim_matches('/');
    let leaf = leaf.trim_start_matches('/');
    if base.is_empty() {
        format!("{group}/{leaf}")
    } else {
        format!("{base}/{group}/{leaf}")
    }
}

/// Describe `leaf` inside the group folder of `workspace`.
pub fn output_file(workspace: &WorkspaceContext, group: &str, leaf: &str) -> OutputFile {
    OutputFile {
        file_path: output_path(&workspace.volume, group, leaf)
            .to_string_lossy()
            .into_owned(),
        file_name: relative_name(group, leaf),
        file_url: output_url(&workspace.base_url, group, leaf),
    }
}
