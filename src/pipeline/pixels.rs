//! Pixel normalisation: renderer bitmap → canonical RGBA image.
//!
//! PDFium hands back BGRA bitmaps by default, while PNG (and the `image`
//! crate) expect RGBA. The renderer's channel-order tag is parsed into the
//! closed [`PixelFormat`] enum; unknown tags are rejected instead of guessed,
//! because a wrong guess silently produces blue-tinted pages.

use crate::error::Pdf2MdError;
use crate::pipeline::engine::RenderedPage;
use image::RgbaImage;
use std::str::FromStr;

/// Byte order of a 4-byte pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Bgra,
    Rgba,
}

impl FromStr for PixelFormat {
    type Err = Pdf2MdError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_uppercase().as_str() {
            "BGRA" => Ok(PixelFormat::Bgra),
            "RGBA" => Ok(PixelFormat::Rgba),
            _ => Err(Pdf2MdError::UnsupportedPixelFormat {
                format: tag.to_string(),
            }),
        }
    }
}

/// Convert a rendered page into an RGBA image of the same dimensions.
pub fn normalize(page: &RenderedPage) -> Result<RgbaImage, Pdf2MdError> {
    let format: PixelFormat = page.format.parse()?;

    let expected = (page.width as usize)
        .checked_mul(page.height as usize)
        .and_then(|px| px.checked_mul(4));
    if expected != Some(page.data.len()) {
        return Err(Pdf2MdError::InvalidPixelBuffer {
            width: page.width,
            height: page.height,
            // Saturates when the reported size does not fit in memory at all.
            expected: expected.unwrap_or(usize::MAX),
            actual: page.data.len(),
        });
    }

    let mut data = page.data.clone();
    if format == PixelFormat::Bgra {
        for px in data.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }

    RgbaImage::from_raw(page.width, page.height, data).ok_or_else(|| {
        Pdf2MdError::Internal(format!(
            "RGBA buffer rejected for {}x{} image",
            page.width, page.height
        ))
    })
}
