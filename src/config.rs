//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Per-request values (the render scale
//! in a [`crate::ConversionRequest`]) override the config's defaults.

use crate::error::Pdf2MdError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Title line written at the top of every assembled Markdown document.
pub const DEFAULT_TITLE: &str = "PDF Converted to Markdown";

/// Configuration for a PDF-to-Markdown conversion.
///
/// # Example
/// ```rust
/// use pdfium_markdown::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .scale(2.0)
///     .title("Quarterly report")
///     .build()
///     .unwrap();
/// assert_eq!(config.scale, 2.0);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Render scale factor applied to each page's natural size. Default: 1.0.
    ///
    /// At 1.0 one PDF point becomes one pixel (72 DPI). Requests may override
    /// this per call.
    pub scale: f32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Top-level heading of the Markdown document. Default: [`DEFAULT_TITLE`].
    pub title: String,

    /// Receives per-page progress and teardown diagnostics.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            password: None,
            title: DEFAULT_TITLE.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("scale", &self.scale)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("title", &self.title)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Check that a render scale is usable.
pub fn validate_scale(scale: f32) -> Result<f32, Pdf2MdError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(Pdf2MdError::InvalidConfig(format!(
            "scale must be a positive number, got {scale}"
        )))
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2MdError> {
        validate_scale(self.config.scale)?;
        if self.config.title.trim().is_empty() {
            return Err(Pdf2MdError::InvalidConfig("title must not be empty".into()));
        }
        Ok(self.config)
    }
}
