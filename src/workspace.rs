//! Workspace context: where outputs go and how they are addressed publicly.
//!
//! The context is supplied by whatever hosts the tool. [`WorkspaceSource`] is
//! the seam: a fixed context for library callers and the CLI, the host's task
//! state (`{"sys": {"volume": …, "workspace_url": …}}`) for agent runtimes,
//! or environment variables.

use crate::error::Pdf2MdError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Output location for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    /// Absolute directory under which every output is written.
    pub volume: PathBuf,
    /// Prefix for public URLs of output files.
    pub base_url: String,
}

impl WorkspaceContext {
    pub fn new(volume: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            base_url: base_url.into(),
        }
    }

    /// A context whose URLs are `file://` URLs into `volume`.
    pub fn local(volume: impl Into<PathBuf>) -> Self {
        let volume = volume.into();
        let base_url = format!("file://{}/", volume.display());
        Self { volume, base_url }
    }

    /// Reject contexts the pipeline cannot write into.
    pub fn validate(&self) -> Result<(), Pdf2MdError> {
        if self.volume.as_os_str().is_empty() {
            return Err(Pdf2MdError::WorkspaceUnavailable(
                "workspace volume is empty".into(),
            ));
        }
        if !self.volume.is_absolute() {
            return Err(Pdf2MdError::WorkspaceUnavailable(format!(
                "workspace volume must be an absolute path, got '{}'",
                self.volume.display()
            )));
        }
        Ok(())
    }
}

/// Supplies the workspace for the current invocation.
pub trait WorkspaceSource: Send + Sync {
    fn current(&self) -> Result<WorkspaceContext, Pdf2MdError>;
}

impl WorkspaceSource for WorkspaceContext {
    fn current(&self) -> Result<WorkspaceContext, Pdf2MdError> {
        Ok(self.clone())
    }
}

/// The host's task state, as handed to a tool call.
///
/// Only `sys.volume` is required; a missing `sys.workspace_url` yields URLs
/// relative to the workspace root.
#[derive(Debug, Clone)]
pub struct TaskInput(pub serde_json::Value);

#[derive(Deserialize)]
struct TaskState {
    sys: Option<SysState>,
}

#[derive(Deserialize)]
struct SysState {
    volume: Option<PathBuf>,
    workspace_url: Option<String>,
}

impl WorkspaceSource for TaskInput {
    fn current(&self) -> Result<WorkspaceContext, Pdf2MdError> {
        let state: TaskState = serde_json::from_value(self.0.clone())
            .map_err(|e| Pdf2MdError::WorkspaceUnavailable(format!("bad task state: {e}")))?;
        let sys = state.sys.ok_or_else(|| {
            Pdf2MdError::WorkspaceUnavailable("task state has no 'sys' section".into())
        })?;
        let volume = sys.volume.ok_or_else(|| {
            Pdf2MdError::WorkspaceUnavailable("task state has no 'sys.volume'".into())
        })?;
        Ok(WorkspaceContext {
            volume,
            base_url: sys.workspace_url.unwrap_or_default(),
        })
    }
}

/// Reads the workspace from environment variables at call time.
#[derive(Debug, Clone)]
pub struct EnvWorkspace {
    pub volume_var: String,
    pub url_var: String,
}

impl Default for EnvWorkspace {
    fn default() -> Self {
        Self {
            volume_var: "PDF2MD_VOLUME".into(),
            url_var: "PDF2MD_WORKSPACE_URL".into(),
        }
    }
}

impl WorkspaceSource for EnvWorkspace {
    fn current(&self) -> Result<WorkspaceContext, Pdf2MdError> {
        let volume = std::env::var_os(&self.volume_var)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Pdf2MdError::WorkspaceUnavailable(format!("{} is not set", self.volume_var))
            })?;
        let volume = Path::new(&volume).to_path_buf();
        Ok(match std::env::var(&self.url_var) {
            Ok(url) if !url.is_empty() => WorkspaceContext::new(volume, url),
            _ => WorkspaceContext::local(volume),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_input_reads_sys_section() {
        let input = TaskInput(json!({
            "sys": { "volume": "/tmp/ws", "workspace_url": "http://localhost/workspace/" }
        }));
        let ctx = input.current().unwrap();
        assert_eq!(ctx.volume, PathBuf::from("/tmp/ws"));
        assert_eq!(ctx.base_url, "http://localhost/workspace/");
    }

    #[test]
    fn task_input_without_url_defaults_to_empty() {
        let ctx = TaskInput(json!({ "sys": { "volume": "/tmp/ws" } }))
            .current()
            .unwrap();
        assert_eq!(ctx.base_url, "");
    }

    #[test]
    fn task_input_without_volume_is_an_error() {
        let err = TaskInput(json!({ "sys": {} })).current().unwrap_err();
        assert!(matches!(err, Pdf2MdError::WorkspaceUnavailable(_)));

        let err = TaskInput(json!({ "other": 1 })).current().unwrap_err();
        assert!(matches!(err, Pdf2MdError::WorkspaceUnavailable(_)));
    }

    #[test]
    fn local_context_uses_file_urls() {
        let ctx = WorkspaceContext::local("/srv/out");
        assert_eq!(ctx.base_url, "file:///srv/out/");
    }

    #[test]
    fn relative_volume_fails_validation() {
        assert!(WorkspaceContext::new("relative/dir", "").validate().is_err());
        assert!(WorkspaceContext::new("", "").validate().is_err());
        assert!(WorkspaceContext::new("/abs/dir", "").validate().is_ok());
    }

    #[test]
    fn env_workspace_reads_configured_vars() {
        let source = EnvWorkspace {
            volume_var: "PDFIUM_MARKDOWN_TEST_VOLUME".into(),
            url_var: "PDFIUM_MARKDOWN_TEST_URL".into(),
        };
        std::env::set_var("PDFIUM_MARKDOWN_TEST_VOLUME", "/tmp/env-ws");
        std::env::set_var("PDFIUM_MARKDOWN_TEST_URL", "https://files.example/ws");
        let ctx = source.current().unwrap();
        std::env::remove_var("PDFIUM_MARKDOWN_TEST_VOLUME");
        std::env::remove_var("PDFIUM_MARKDOWN_TEST_URL");

        assert_eq!(ctx.volume, PathBuf::from("/tmp/env-ws"));
        assert_eq!(ctx.base_url, "https://files.example/ws");
    }

    #[test]
    fn env_workspace_without_volume_is_an_error() {
        let source = EnvWorkspace {
            volume_var: "PDFIUM_MARKDOWN_TEST_UNSET_VOLUME".into(),
            url_var: "PDFIUM_MARKDOWN_TEST_UNSET_URL".into(),
        };
        assert!(source.current().is_err());
    }
}
