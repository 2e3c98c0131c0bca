//! CLI binary for pdfium-markdown.
//!
//! A thin shim over the library's tool entry point: maps CLI flags to a
//! request, a workspace and a `ConversionConfig`, then prints the tool's
//! payload.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfium_markdown::{
    ConversionConfig, ConversionProgressCallback, ConversionRequest, PdfToMarkdownTool,
    PdfiumFactory, ProgressCallback, TeardownStage, WorkspaceContext, NO_INPUT_MESSAGE,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar starts as a spinner; `on_conversion_start` gives it a length.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Stop the spinner and erase the bar when the run ends in an error.
    fn finish_on_failure(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages converted",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }

    fn on_teardown_error(&self, stage: TeardownStage, error: &str) {
        self.bar
            .println(format!("  {} releasing {stage}: {}", red("⚠"), dim(error)));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert into ./sample/ (result.md + page-N.png)
  pdf2md sample.pdf

  # Write into a workspace volume with public URLs
  pdf2md --volume /srv/ws --base-url https://files.example/ws/ upload-42 --file-name report.pdf

  # Sharper page images
  pdf2md --scale 2 slides.pdf

ENVIRONMENT VARIABLES:
  PDF2MD_VOLUME           Default for --volume
  PDF2MD_WORKSPACE_URL    Default for --base-url
  PDFIUM_LIB_PATH         Path to an existing libpdfium
"#;

/// Convert a PDF into Markdown plus one PNG per page.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md",
    version,
    about = "Convert a PDF into Markdown plus one PNG per page",
    long_about = "Convert a PDF into a Markdown document (one section per page, text taken from \
the PDF's text layer) and one rendered PNG per page. Outputs go to <volume>/<group>/, where the \
group is the file name without its .pdf extension. Prints a JSON summary to stdout.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF, relative to the current directory. Without an
    /// extension, `<input>.pdf` is opened when it exists.
    input: String,

    /// Display name used to name the output folder (default: input's base name).
    #[arg(long)]
    file_name: Option<String>,

    /// Render scale factor (1.0 = 72 DPI).
    #[arg(long, env = "PDF2MD_SCALE", default_value_t = 1.0)]
    scale: f32,

    /// Workspace directory that receives the output folder (default: current directory).
    #[arg(long, env = "PDF2MD_VOLUME")]
    volume: Option<PathBuf>,

    /// Public URL prefix of the workspace (default: file:// URL of the volume).
    #[arg(long, env = "PDF2MD_WORKSPACE_URL")]
    base_url: Option<String>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2MD_PASSWORD")]
    password: Option<String>,

    /// Title line of the Markdown document.
    #[arg(long, env = "PDF2MD_TITLE")]
    title: Option<String>,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Disable progress bar.
    #[arg(long, env = "PDF2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Workspace ────────────────────────────────────────────────────────
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let volume = match cli.volume.clone() {
        Some(v) if v.is_absolute() => v,
        Some(v) => cwd.join(v),
        None => cwd.clone(),
    };
    let workspace = match cli.base_url.clone() {
        Some(url) => WorkspaceContext::new(volume, url),
        None => WorkspaceContext::local(volume),
    };

    // ── Config ───────────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new_dynamic);
    let progress_cb = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn ConversionProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    let factory = match cli.pdfium_lib.clone() {
        Some(path) => PdfiumFactory::with_library(path),
        None => PdfiumFactory::default(),
    };

    // ── Run ──────────────────────────────────────────────────────────────
    // The library anchors relative paths at the volume; the shell user means cwd.
    let input = cwd.join(&cli.input).to_string_lossy().into_owned();
    let mut request = ConversionRequest::new(input).with_scale(cli.scale);
    if let Some(ref name) = cli.file_name {
        request = request.with_file_name(name.clone());
    }

    let tool = PdfToMarkdownTool::new(factory, Arc::new(workspace)).with_config(config);
    let payload = tool.invoke(Some(request)).await;

    if payload == NO_INPUT_MESSAGE || payload.starts_with("Error:") {
        if let Some(ref cb) = cli_progress {
            cb.finish_on_failure();
        }
        eprintln!("{}", red(&payload));
        std::process::exit(1);
    }
    println!("{payload}");
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().scale(cli.scale);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}
