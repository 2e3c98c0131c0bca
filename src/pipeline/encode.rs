//! Image encoding: RGBA page image → PNG file in the workspace.
//!
//! PNG is lossless, so rendered text stays crisp for whoever views or OCRs
//! the page image later.

use crate::error::Pdf2MdError;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), Pdf2MdError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Pdf2MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, bytes).map_err(|e| Pdf2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Encode `img` as PNG and persist it at `path`.
pub fn write_png(img: &RgbaImage, path: &Path, page_num: usize) -> Result<(), Pdf2MdError> {
    let png = encode_png(img).map_err(|e| Pdf2MdError::ImageEncodeFailed {
        page: page_num,
        source: e,
    })?;
    write_output(path, &png)
}
