//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its own
//! and the render backend can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ engine ──▶ page ──▶ pixels ──▶ encode
//! (path)    (pdfium)   (text)   (BGRA→RGBA) (PNG file)
//! ```
//!
//! 1. [`input`]  — anchor relative paths, pick `path.pdf` or `path`, check access
//! 2. [`engine`] — collaborator traits plus the PDFium implementation
//! 3. [`page`]   — text with fallback, render, normalise and persist one page
//! 4. [`pixels`] — map the renderer's channel order to RGBA
//! 5. [`encode`] — PNG-encode and write files into the workspace

pub mod encode;
pub mod engine;
pub mod input;
pub mod page;
pub mod pixels;
