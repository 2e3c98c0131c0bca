//! Render-engine collaborator: open a document, read page text, rasterise.
//!
//! The pipeline only ever talks to the three traits below, so the PDFium
//! binding can be swapped for a scripted engine in tests. Release is explicit
//! (`destroy(self)`) rather than left to `Drop` so the pipeline can observe
//! and report teardown failures.
//!
//! The document type borrows its engine (`Document<'a>`), which makes it
//! impossible to destroy the engine while a document is still open.

use crate::error::Pdf2MdError;
use crate::pipeline::input;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Raw output of rasterising one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub width: u32,
    pub height: u32,
    /// Channel order as reported by the renderer, e.g. `"BGRA"`.
    pub format: String,
    /// `width × height × 4` bytes, row-major, no padding.
    pub data: Vec<u8>,
}

/// Creates a fresh engine for one conversion.
pub trait EngineFactory {
    type Engine: RenderEngine;

    fn init(&self) -> Result<Self::Engine, Pdf2MdError>;
}

/// An initialised render engine.
pub trait RenderEngine {
    type Document<'a>: DocumentHandle
    where
        Self: 'a;

    fn load_document<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self::Document<'a>, Pdf2MdError>;

    fn destroy(self) -> Result<(), Pdf2MdError>
    where
        Self: Sized;
}

/// An open document. Page indices are 0-based.
pub trait DocumentHandle {
    fn page_count(&self) -> usize;

    fn page_text(&self, index: usize) -> Result<String, Pdf2MdError>;

    fn render_page(&self, index: usize, scale: f32) -> Result<RenderedPage, Pdf2MdError>;

    fn destroy(self) -> Result<(), Pdf2MdError>
    where
        Self: Sized;
}

// ── PDFium ───────────────────────────────────────────────────────────────

/// Binds the PDFium shared library on [`EngineFactory::init`].
///
/// Lookup order:
/// 1. `library_path`, when set
/// 2. `PDFIUM_LIB_PATH`
/// 3. `lib/` under the working directory, then next to the executable
/// 4. the system library search path
#[derive(Debug, Clone, Default)]
pub struct PdfiumFactory {
    pub library_path: Option<PathBuf>,
}

impl PdfiumFactory {
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(ref p) = self.library_path {
            paths.push(p.clone());
        }
        if let Ok(p) = std::env::var("PDFIUM_LIB_PATH") {
            if !p.is_empty() {
                paths.push(PathBuf::from(p));
            }
        }
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(Pdfium::pdfium_platform_library_name_at_path(&cwd.join("lib")));
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                paths.push(Pdfium::pdfium_platform_library_name_at_path(dir));
                paths.push(Pdfium::pdfium_platform_library_name_at_path(&dir.join("lib")));
            }
        }
        paths
    }
}

impl EngineFactory for PdfiumFactory {
    type Engine = PdfiumEngine;

    fn init(&self) -> Result<PdfiumEngine, Pdf2MdError> {
        for path in self.search_paths() {
            if !path.exists() {
                continue;
            }
            match Pdfium::bind_to_library(&path) {
                Ok(bindings) => {
                    info!("Bound pdfium from {}", path.display());
                    return Ok(PdfiumEngine {
                        pdfium: Pdfium::new(bindings),
                    });
                }
                Err(e) => debug!("pdfium at {} unusable: {:?}", path.display(), e),
            }
        }

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| Pdf2MdError::PdfiumBindingFailed(format!("{e:?}")))?;
        info!("Bound system pdfium library");
        Ok(PdfiumEngine {
            pdfium: Pdfium::new(bindings),
        })
    }
}

/// A bound PDFium library.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl RenderEngine for PdfiumEngine {
    type Document<'a> = PdfiumDocument<'a>;

    fn load_document<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<PdfiumDocument<'a>, Pdf2MdError> {
        input::check_pdf_magic(path)?;
        let document = self.pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    Pdf2MdError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    Pdf2MdError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                Pdf2MdError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;
        Ok(PdfiumDocument { document })
    }

    fn destroy(self) -> Result<(), Pdf2MdError> {
        // Unbinding happens when the bindings are dropped.
        drop(self.pdfium);
        debug!("pdfium engine released");
        Ok(())
    }
}

/// A document opened by [`PdfiumEngine`].
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    fn page(&self, index: usize) -> Result<PdfPage<'a>, PdfiumError> {
        self.document.pages().get(index as u16)
    }
}

impl DocumentHandle for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, Pdf2MdError> {
        let page = self
            .page(index)
            .map_err(|e| Pdf2MdError::TextExtractionFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;
        let text = page.text().map_err(|e| Pdf2MdError::TextExtractionFailed {
            page: index + 1,
            detail: format!("{:?}", e),
        })?;
        Ok(text.all())
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<RenderedPage, Pdf2MdError> {
        let fail = |detail: String| Pdf2MdError::RasterisationFailed {
            page: index + 1,
            detail,
        };

        let page = self.page(index).map_err(|e| fail(format!("{:?}", e)))?;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| fail(format!("{:?}", e)))?;

        let format = match bitmap.format().map_err(|e| fail(format!("{:?}", e)))? {
            PdfBitmapFormat::BGRA => "BGRA".to_string(),
            other => format!("{:?}", other),
        };
        let width = u32::try_from(bitmap.width()).map_err(|e| fail(e.to_string()))?;
        let height = u32::try_from(bitmap.height()).map_err(|e| fail(e.to_string()))?;
        let data = bitmap.as_raw_bytes().to_vec();

        debug!(
            "Rendered page {} → {}x{} px ({})",
            index + 1,
            width,
            height,
            format
        );

        Ok(RenderedPage {
            width,
            height,
            format,
            data,
        })
    }

    fn destroy(self) -> Result<(), Pdf2MdError> {
        // pdfium-render closes the document handle on drop.
        drop(self.document);
        debug!("pdfium document released");
        Ok(())
    }
}
