//! Whole-document conversion: validate, open, process every page, assemble.
//!
//! The run moves through Validating → Opening → Processing → Assembling →
//! Writing and either returns a complete [`ConversionResult`] or an error;
//! there is no partial result. Whatever native handles were acquired are
//! released on the way out, document first and engine second, whether the
//! run succeeded or not. A failure while releasing is logged and reported to
//! the progress callback but never replaces the run's own outcome.

use crate::config::{validate_scale, ConversionConfig};
use crate::error::Pdf2MdError;
use crate::naming::{group_of, markdown_leaf, output_file, output_path};
use crate::output::{ConversionResult, PageImage, PageResult};
use crate::pipeline::engine::{DocumentHandle, EngineFactory, RenderEngine};
use crate::pipeline::page::{self, PageTarget};
use crate::pipeline::{encode, input};
use crate::progress::TeardownStage;
use crate::workspace::WorkspaceContext;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What the caller asked to convert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Absolute or workspace-relative path to the source PDF.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Display name used for grouping. Defaults to the base name of `file_path`.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Render scale; falls back to [`ConversionConfig::scale`].
    #[serde(default)]
    pub scale: Option<f32>,
}

impl ConversionRequest {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// The file path, if one was given and is not blank.
    pub fn source(&self) -> Option<&str> {
        self.file_path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Everything decided before the engine is touched.
#[derive(Debug, Clone, PartialEq)]
struct Plan {
    group: String,
    source: PathBuf,
    scale: f32,
}

fn plan(
    request: &ConversionRequest,
    workspace: &WorkspaceContext,
    config: &ConversionConfig,
) -> Result<Plan, Pdf2MdError> {
    let file_path = request.source().ok_or(Pdf2MdError::MissingInput)?;
    workspace.validate()?;
    let scale = validate_scale(request.scale.unwrap_or(config.scale))?;

    let display_name = request
        .file_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(file_path);
    let group = group_of(display_name);
    if group.trim().is_empty() {
        return Err(Pdf2MdError::InvalidConfig(format!(
            "cannot derive an output folder name from '{display_name}'"
        )));
    }

    Ok(Plan {
        group,
        source: input::source_path(file_path, &workspace.volume),
        scale,
    })
}

/// Convert a PDF into `workspace/<group>/`: one PNG per page plus `result.md`.
///
/// PDFium is not async-safe, so the run happens on tokio's blocking pool.
///
/// # Example
/// ```rust,no_run
/// use pdfium_markdown::{convert, ConversionConfig, ConversionRequest, PdfiumFactory, WorkspaceContext};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = ConversionRequest::new("/data/report.pdf").with_scale(2.0);
/// let workspace = WorkspaceContext::new("/srv/ws", "https://files.example/ws/");
/// let result = convert(request, workspace, PdfiumFactory::default(), ConversionConfig::default()).await?;
/// println!("{} pages → {}", result.pages, result.markdown.file_url);
/// # Ok(())
/// # }
/// ```
pub async fn convert<F>(
    request: ConversionRequest,
    workspace: WorkspaceContext,
    factory: F,
    config: ConversionConfig,
) -> Result<ConversionResult, Pdf2MdError>
where
    F: EngineFactory + Send + 'static,
{
    tokio::task::spawn_blocking(move || convert_blocking(&request, &workspace, &factory, &config))
        .await
        .map_err(|e| Pdf2MdError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Blocking implementation of [`convert`].
pub fn convert_blocking<F: EngineFactory>(
    request: &ConversionRequest,
    workspace: &WorkspaceContext,
    factory: &F,
    config: &ConversionConfig,
) -> Result<ConversionResult, Pdf2MdError> {
    let start = Instant::now();

    // ── Validating ───────────────────────────────────────────────────────
    let plan = plan(request, workspace, config)?;
    info!(
        "Starting conversion: {} → group '{}' (scale {})",
        plan.source.display(),
        plan.group,
        plan.scale
    );

    // ── Opening ──────────────────────────────────────────────────────────
    let engine = factory.init()?;
    let outcome = run_with_engine(&engine, &plan, workspace, config);
    if let Err(e) = engine.destroy() {
        report_teardown(config, TeardownStage::Engine, &e);
    }

    match &outcome {
        Ok(result) => info!(
            "Conversion complete: {} pages in {}ms → {}",
            result.pages,
            start.elapsed().as_millis(),
            result.markdown.file_path
        ),
        Err(e) => warn!("Conversion failed after {}ms: {}", start.elapsed().as_millis(), e),
    }
    outcome
}

fn run_with_engine<E: RenderEngine>(
    engine: &E,
    plan: &Plan,
    workspace: &WorkspaceContext,
    config: &ConversionConfig,
) -> Result<ConversionResult, Pdf2MdError> {
    let source = input::resolve_source(&plan.source)?;
    let document = engine.load_document(&source, config.password.as_deref())?;
    let outcome = run_with_document(&document, plan, workspace, config);
    if let Err(e) = document.destroy() {
        report_teardown(config, TeardownStage::Document, &e);
    }
    outcome
}

fn run_with_document<D: DocumentHandle>(
    document: &D,
    plan: &Plan,
    workspace: &WorkspaceContext,
    config: &ConversionConfig,
) -> Result<ConversionResult, Pdf2MdError> {
    let total_pages = document.page_count();
    info!("PDF has {} pages", total_pages);
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Processing ───────────────────────────────────────────────────────
    let target = PageTarget {
        workspace,
        group: &plan.group,
        scale: plan.scale,
    };
    let mut pages = Vec::with_capacity(total_pages);
    for index in 0..total_pages {
        let page_num = index + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }
        let result = page::process_page(document, index, target)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total_pages, result.text.len());
        }
        pages.push(result);
    }

    // ── Assembling ───────────────────────────────────────────────────────
    let markdown = assemble_markdown(&config.title, &pages);

    // ── Writing ──────────────────────────────────────────────────────────
    let leaf = markdown_leaf();
    let md_path = output_path(&workspace.volume, &plan.group, leaf);
    encode::write_output(&md_path, markdown.as_bytes())?;
    debug!("Markdown written to {} ({} bytes)", md_path.display(), markdown.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_pages);
    }

    Ok(ConversionResult {
        pages: total_pages,
        group: plan.group.clone(),
        markdown: output_file(workspace, &plan.group, leaf),
        images: pages.iter().map(PageImage::from).collect(),
    })
}

fn report_teardown(config: &ConversionConfig, stage: TeardownStage, error: &Pdf2MdError) {
    warn!("Failed to release pdfium {}: {}", stage, error);
    if let Some(ref cb) = config.progress_callback {
        cb.on_teardown_error(stage, &error.to_string());
    }
}

/// Assemble the Markdown document: a title, then a heading and a paragraph
/// per page.
pub fn assemble_markdown(title: &str, pages: &[PageResult]) -> String {
    let mut md = format!("# {}\n", title.trim());
    for page in pages {
        md.push_str(&format!("\n## Page {}\n\n{}\n", page.page, page.text));
    }
    md
}
