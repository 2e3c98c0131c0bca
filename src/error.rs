//! Error types for the pdfium-markdown library.
//!
//! A conversion either produces every page or nothing at all, so a single
//! fatal error type covers the whole pipeline. [`Pdf2MdError`] is returned
//! from the `convert*` functions; the tool entry point turns it into a
//! textual `"Error: …"` payload instead of letting it cross the tool boundary.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfium-markdown library.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The request carried no file path.
    #[error("No PDF file provided")]
    MissingInput,

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The engine could not read the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Pixel errors ──────────────────────────────────────────────────────
    /// The renderer reported a channel order we do not know how to convert.
    #[error("Unsupported pixel format '{format}' (expected BGRA or RGBA)")]
    UnsupportedPixelFormat { format: String },

    /// The pixel buffer does not hold exactly `width × height × 4` bytes.
    #[error("Pixel buffer for a {width}x{height} page has {actual} bytes, expected {expected}")]
    InvalidPixelBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// PNG encoding of a normalised page failed.
    #[error("PNG encoding failed for page {page}: {source}")]
    ImageEncodeFailed {
        page: usize,
        #[source]
        source: image::ImageError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file (Markdown or page image).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The execution context did not supply a usable workspace.
    #[error("Workspace unavailable: {0}")]
    WorkspaceUnavailable(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or request validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib) to point at an\n\
existing copy, or place the library in ./lib next to the executable.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
