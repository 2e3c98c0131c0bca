//! Scripted render engine shared by the integration tests.
//!
//! Every engine/document lifecycle event is counted so tests can assert that
//! handles are released exactly once, in the right order, on every path.

#![allow(dead_code)]

use pdfium_markdown::{
    ConversionProgressCallback, DocumentHandle, EngineFactory, Pdf2MdError, RenderEngine,
    RenderedPage, TeardownStage,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Counters and the order of release events.
#[derive(Debug, Default)]
pub struct Lifecycle {
    pub inits: AtomicUsize,
    pub loads: AtomicUsize,
    pub document_destroys: AtomicUsize,
    pub engine_destroys: AtomicUsize,
    pub order: Mutex<Vec<&'static str>>,
    pub loaded_path: Mutex<Option<PathBuf>>,
    pub password_seen: Mutex<Option<String>>,
    pub scales_seen: Mutex<Vec<f32>>,
}

impl Lifecycle {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn order(&self) -> Vec<&'static str> {
        self.order.lock().unwrap().clone()
    }
}

/// One scripted page.
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    pub text: Result<String, String>,
    pub format: String,
    /// RGBA-ish pixel repeated `width × height` times, in `format` order.
    pub pixel: [u8; 4],
    pub width: u32,
    pub height: u32,
}

impl ScriptedPage {
    pub fn text(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
            format: "BGRA".into(),
            // Blue, green, red, alpha: opaque red once normalised.
            pixel: [0, 0, 255, 255],
            width: 2,
            height: 2,
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    pub fn failing_text(detail: &str) -> Self {
        Self {
            text: Err(detail.to_string()),
            ..Self::text("")
        }
    }
}

/// Factory producing [`ScriptedEngine`]s over a fixed page script.
#[derive(Clone)]
pub struct ScriptedFactory {
    pub pages: Vec<ScriptedPage>,
    pub lifecycle: Arc<Lifecycle>,
    pub fail_init: bool,
    pub fail_load: bool,
    pub fail_document_destroy: bool,
    pub fail_engine_destroy: bool,
}

impl ScriptedFactory {
    pub fn new(pages: Vec<ScriptedPage>) -> Self {
        Self {
            pages,
            lifecycle: Arc::new(Lifecycle::default()),
            fail_init: false,
            fail_load: false,
            fail_document_destroy: false,
            fail_engine_destroy: false,
        }
    }
}

impl EngineFactory for ScriptedFactory {
    type Engine = ScriptedEngine;

    fn init(&self) -> Result<ScriptedEngine, Pdf2MdError> {
        self.lifecycle.inits.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(Pdf2MdError::PdfiumBindingFailed("scripted init failure".into()));
        }
        Ok(ScriptedEngine {
            script: self.clone(),
        })
    }
}

pub struct ScriptedEngine {
    script: ScriptedFactory,
}

impl RenderEngine for ScriptedEngine {
    type Document<'a> = ScriptedDocument<'a>;

    fn load_document<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<ScriptedDocument<'a>, Pdf2MdError> {
        let lc = &self.script.lifecycle;
        lc.loads.fetch_add(1, Ordering::SeqCst);
        *lc.loaded_path.lock().unwrap() = Some(path.to_path_buf());
        *lc.password_seen.lock().unwrap() = password.map(str::to_string);
        if self.script.fail_load {
            return Err(Pdf2MdError::CorruptPdf {
                path: path.to_path_buf(),
                detail: "scripted load failure".into(),
            });
        }
        Ok(ScriptedDocument {
            engine: self,
        })
    }

    fn destroy(self) -> Result<(), Pdf2MdError> {
        let lc = &self.script.lifecycle;
        lc.engine_destroys.fetch_add(1, Ordering::SeqCst);
        lc.order.lock().unwrap().push("engine");
        if self.script.fail_engine_destroy {
            return Err(Pdf2MdError::Internal("engine refused to close".into()));
        }
        Ok(())
    }
}

pub struct ScriptedDocument<'a> {
    engine: &'a ScriptedEngine,
}

impl ScriptedDocument<'_> {
    fn page(&self, index: usize) -> &ScriptedPage {
        &self.engine.script.pages[index]
    }
}

impl DocumentHandle for ScriptedDocument<'_> {
    fn page_count(&self) -> usize {
        self.engine.script.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, Pdf2MdError> {
        self.page(index)
            .text
            .clone()
            .map_err(|detail| Pdf2MdError::TextExtractionFailed {
                page: index + 1,
                detail,
            })
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<RenderedPage, Pdf2MdError> {
        self.engine
            .script
            .lifecycle
            .scales_seen
            .lock()
            .unwrap()
            .push(scale);
        let page = self.page(index);
        let pixels = (page.width * page.height) as usize;
        Ok(RenderedPage {
            width: page.width,
            height: page.height,
            format: page.format.clone(),
            data: page.pixel.repeat(pixels),
        })
    }

    fn destroy(self) -> Result<(), Pdf2MdError> {
        let lc = &self.engine.script.lifecycle;
        lc.document_destroys.fetch_add(1, Ordering::SeqCst);
        lc.order.lock().unwrap().push("document");
        if self.engine.script.fail_document_destroy {
            return Err(Pdf2MdError::Internal("document refused to close".into()));
        }
        Ok(())
    }
}

/// Writes a file that passes the `%PDF` magic check.
pub fn write_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.7\n% scripted fixture\n").unwrap();
    path
}

/// Records every progress event as a line of text.
#[derive(Default)]
pub struct RecordingCallback {
    pub events: Mutex<Vec<String>>,
}

impl RecordingCallback {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ConversionProgressCallback for RecordingCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.push(format!("start {total_pages}"));
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        self.push(format!("page-start {page_num}/{total_pages}"));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        self.push(format!("page-done {page_num}/{total_pages} {text_len}"));
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.push(format!("complete {total_pages}"));
    }

    fn on_teardown_error(&self, stage: TeardownStage, error: &str) {
        self.push(format!("teardown {stage}: {error}"));
    }
}
