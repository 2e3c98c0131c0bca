//! Result types produced by a conversion.
//!
//! Field names serialise in camelCase because the JSON payload is consumed by
//! a host that expects `filePath` / `fileName` / `fileUrl`.

use serde::{Deserialize, Serialize};

/// One file written into the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    /// Absolute path on disk.
    pub file_path: String,
    /// Path relative to the workspace volume, e.g. `sample/page-1.png`.
    pub file_name: String,
    /// Public URL: the workspace base URL joined with `file_name`.
    pub file_url: String,
}

/// The outcome of processing a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page: usize,
    /// Extracted text, trimmed at both ends. Holds
    /// [`crate::pipeline::page::NO_TEXT_FALLBACK`] when the page had none.
    pub text: String,
    /// The rendered page image.
    pub image: OutputFile,
}

/// Entry of [`ConversionResult::images`]: the page number plus the image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    pub page: usize,
    #[serde(flatten)]
    pub file: OutputFile,
}

impl From<&PageResult> for PageImage {
    fn from(result: &PageResult) -> Self {
        Self {
            page: result.page,
            file: result.image.clone(),
        }
    }
}

/// Everything a successful conversion produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Page count of the opened document.
    pub pages: usize,
    /// Output directory / display name derived from the input file name.
    pub group: String,
    /// The assembled Markdown document.
    pub markdown: OutputFile,
    /// One image per page, in page order.
    pub images: Vec<PageImage>,
}
