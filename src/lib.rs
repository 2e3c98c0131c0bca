//! # pdfium-markdown
//!
//! Convert a PDF into a Markdown document plus one PNG image per page.
//!
//! Text comes from the PDF's own text layer (no OCR); images are rendered
//! with PDFium. Every output of one document lands in a single folder of the
//! caller's workspace, named after the document, and the result lists each
//! file with its absolute path, workspace-relative name and public URL.
//!
//! ## Pipeline Overview
//!
//! ```text
//! request
//!  │
//!  ├─ 1. Validate  file path present, scale sane, group name derived
//!  ├─ 2. Open      bind pdfium, resolve `<path>[.pdf]`, load the document
//!  ├─ 3. Pages     per page: text (with fallback) → render → RGBA → PNG
//!  ├─ 4. Assemble  `# title` + `## Page n` + text, per page
//!  ├─ 5. Write     <volume>/<group>/result.md
//!  └─ 6. Release   document, then engine (always, success or failure)
//! ```
//!
//! ## Output layout
//!
//! ```text
//! <volume>/<group>/result.md
//! <volume>/<group>/page-1.png
//! <volume>/<group>/page-2.png
//! …
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfium_markdown::{PdfToMarkdownTool, PdfiumFactory, WorkspaceContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let workspace = WorkspaceContext::new("/srv/ws", "http://localhost/workspace/");
//!     let tool = PdfToMarkdownTool::new(PdfiumFactory::default(), Arc::new(workspace));
//!     let payload = tool
//!         .invoke_json(&serde_json::json!({ "filePath": "/data/sample.pdf" }))
//!         .await;
//!     println!("{payload}");
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod tool;
pub mod workspace;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_TITLE};
pub use convert::{assemble_markdown, convert, convert_blocking, ConversionRequest};
pub use error::Pdf2MdError;
pub use output::{ConversionResult, OutputFile, PageImage, PageResult};
pub use pipeline::engine::{
    DocumentHandle, EngineFactory, PdfiumFactory, RenderEngine, RenderedPage,
};
pub use pipeline::page::NO_TEXT_FALLBACK;
pub use pipeline::pixels::PixelFormat;
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, ProgressCallback, TeardownStage,
};
pub use tool::{PdfToMarkdownTool, NO_INPUT_MESSAGE, TOOL_DESCRIPTION, TOOL_LABEL, TOOL_NAME};
pub use workspace::{EnvWorkspace, TaskInput, WorkspaceContext, WorkspaceSource};
