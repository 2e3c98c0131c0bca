//! Per-page processing: text, render, normalise, persist.
//!
//! A page either produces its text and its image or fails the whole
//! conversion; skipping a page would shift every later page number and break
//! the one-image-per-page contract of the result.

use crate::error::Pdf2MdError;
use crate::naming::{image_leaf, output_file, output_path};
use crate::output::PageResult;
use crate::pipeline::engine::DocumentHandle;
use crate::pipeline::{encode, pixels};
use crate::workspace::WorkspaceContext;
use tracing::debug;

/// Text used for pages without an extractable text layer (scans, figures).
pub const NO_TEXT_FALLBACK: &str = "No extractable text on this page.";

/// Where a page's outputs go and how it is rendered.
#[derive(Debug, Clone, Copy)]
pub struct PageTarget<'a> {
    pub workspace: &'a WorkspaceContext,
    pub group: &'a str,
    pub scale: f32,
}

/// Trim `raw` at both ends, substituting [`NO_TEXT_FALLBACK`] when nothing
/// is left. Inner whitespace and newlines are kept.
pub fn page_text_or_fallback(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NO_TEXT_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Process page `index` (0-based) of `document`.
pub fn process_page<D: DocumentHandle>(
    document: &D,
    index: usize,
    target: PageTarget<'_>,
) -> Result<PageResult, Pdf2MdError> {
    let page_num = index + 1;

    let text = page_text_or_fallback(&document.page_text(index)?);

    let rendered = document.render_page(index, target.scale)?;
    let image = pixels::normalize(&rendered)?;

    let leaf = image_leaf(page_num);
    let path = output_path(&target.workspace.volume, target.group, &leaf);
    encode::write_png(&image, &path, page_num)?;
    debug!("Page {} image written to {}", page_num, path.display());

    Ok(PageResult {
        page: page_num,
        text,
        image: output_file(target.workspace, target.group, &leaf),
    })
}
