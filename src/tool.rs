//! Tool entry point: the operation an agent host invokes.
//!
//! A tool call never fails at the boundary. Whatever happens, the caller gets
//! a string back: the JSON [`ConversionResult`] on success, or a line
//! starting with `Error:` otherwise. A call without a file path is answered
//! with [`NO_INPUT_MESSAGE`] before any workspace lookup or engine start-up.

use crate::config::ConversionConfig;
use crate::convert::{convert, ConversionRequest};
use crate::error::Pdf2MdError;
use crate::output::ConversionResult;
use crate::pipeline::engine::EngineFactory;
use crate::workspace::WorkspaceSource;
use std::sync::Arc;
use tracing::{info, warn};

/// Registered tool name.
pub const TOOL_NAME: &str = "pdf_to_markdown";

/// Human-readable label of the toolset.
pub const TOOL_LABEL: &str = "PDF to Markdown";

/// Description shown to the model choosing tools.
pub const TOOL_DESCRIPTION: &str = "Convert a PDF file to markdown with extracted text and \
rendered page images. Input: filePath (required), fileName (optional), scale (optional, \
default 1.0). Returns JSON with the page count, the output group and the URLs of result.md \
and of one PNG per page.";

/// Exact reply for a call without a file path.
pub const NO_INPUT_MESSAGE: &str = "Error: No PDF file provided";

/// The PDF-to-Markdown tool, bound to an engine and a workspace source.
pub struct PdfToMarkdownTool<F> {
    factory: F,
    workspace: Arc<dyn WorkspaceSource>,
    config: ConversionConfig,
}

impl<F> PdfToMarkdownTool<F>
where
    F: EngineFactory + Clone + Send + 'static,
{
    pub fn new(factory: F, workspace: Arc<dyn WorkspaceSource>) -> Self {
        Self {
            factory,
            workspace,
            config: ConversionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConversionConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the tool and return its textual payload.
    pub async fn invoke(&self, request: Option<ConversionRequest>) -> String {
        let Some(request) = request.filter(|r| r.source().is_some()) else {
            warn!("{} called without a file path", TOOL_NAME);
            return NO_INPUT_MESSAGE.to_string();
        };

        match self.run(request).await.and_then(|result| {
            serde_json::to_string_pretty(&result)
                .map_err(|e| Pdf2MdError::Internal(format!("Failed to serialise result: {e}")))
        }) {
            Ok(json) => json,
            Err(e) => {
                warn!("{} failed: {}", TOOL_NAME, e);
                format!("Error: {e}")
            }
        }
    }

    /// Run the tool on loosely-shaped JSON input.
    ///
    /// `null`, `{}`, non-objects and a null or blank `filePath` are all
    /// "no file provided". Input that names a file but has a mistyped field
    /// is an invalid-argument error.
    pub async fn invoke_json(&self, input: &serde_json::Value) -> String {
        use serde_json::Value;

        let names_a_file = match input.get("filePath") {
            None | Some(Value::Null) => false,
            Some(Value::String(path)) => !path.trim().is_empty(),
            Some(_) => true,
        };
        if !names_a_file {
            return self.invoke(None).await;
        }

        match serde_json::from_value::<ConversionRequest>(input.clone()) {
            Ok(request) => self.invoke(Some(request)).await,
            Err(e) => {
                let e = Pdf2MdError::InvalidConfig(format!("bad {} input: {e}", TOOL_NAME));
                warn!("{}", e);
                format!("Error: {e}")
            }
        }
    }

    async fn run(&self, request: ConversionRequest) -> Result<ConversionResult, Pdf2MdError> {
        let workspace = self.workspace.current()?;
        info!(
            "{}: {} → {}",
            TOOL_NAME,
            request.source().unwrap_or_default(),
            workspace.volume.display()
        );
        convert(
            request,
            workspace,
            self.factory.clone(),
            self.config.clone(),
        )
        .await
    }
}
