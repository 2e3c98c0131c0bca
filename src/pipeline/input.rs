//! Input resolution: turn the requested path into the file PDFium will open.
//!
//! A relative request path is taken relative to the workspace volume, not the
//! process working directory.
//!
//! Callers sometimes hand over a path without its `.pdf` extension (upload
//! stores often strip it from the display name). `path.pdf` is opened when it
//! exists, otherwise the path as supplied; the output *naming* is unaffected
//! and keeps using the name as supplied.
//!
//! Existence and permissions are checked before the engine sees the file so
//! callers get a meaningful error rather than an opaque engine code. Whether
//! the bytes are a PDF is the engine's call; PDFium uses [`check_pdf_magic`].

use crate::error::Pdf2MdError;
use crate::naming::has_pdf_extension;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The requested path, anchored at `volume` when it is relative.
pub fn source_path(file_path: &str, volume: &Path) -> PathBuf {
    let path = Path::new(file_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        volume.join(path)
    }
}

/// `path.pdf` when `path` lacks the extension and that file exists, else `path`.
pub fn open_path(path: &Path) -> PathBuf {
    if has_pdf_extension(&path.to_string_lossy()) {
        return path.to_path_buf();
    }
    let mut with_ext = path.as_os_str().to_owned();
    with_ext.push(".pdf");
    let with_ext = PathBuf::from(with_ext);
    if with_ext.is_file() {
        with_ext
    } else {
        path.to_path_buf()
    }
}

/// Pick the file to open for `path` and check that it exists and is readable.
pub fn resolve_source(path: &Path) -> Result<PathBuf, Pdf2MdError> {
    let path = open_path(path);
    if !path.exists() {
        return Err(Pdf2MdError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2MdError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2MdError::FileNotFound { path }),
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Reject files that do not start with `%PDF`. Files shorter than four bytes
/// are left for the parser to report.
pub fn check_pdf_magic(path: &Path) -> Result<(), Pdf2MdError> {
    let mut file = std::fs::File::open(path).map_err(|_| Pdf2MdError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
        return Err(Pdf2MdError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
