//! Source image decoding.
//!
//! The image is decoded once per run into raw 8-bit RGB samples plus an
//! optional alpha channel, then shared read-only by every worker.

use std::path::{Path, PathBuf};

use crate::config::ImageSize;
use crate::error::{RepeatError, Result};

/// A decoded raster image ready to be embedded as a PDF image XObject.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Where the image was read from.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGB samples, `width * height * 3` bytes.
    pub rgb: Vec<u8>,
    /// Alpha samples, `width * height` bytes, when the source has an alpha
    /// channel.
    pub alpha: Option<Vec<u8>>,
}

impl SourceImage {
    /// Decode the image at `path`.
    ///
    /// The format is guessed from the file contents, not the extension.
    ///
    /// # Errors
    ///
    /// Returns [`RepeatError::ImageNotFound`] if the file does not exist and
    /// [`RepeatError::ImageDecode`] if it cannot be decoded.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(RepeatError::ImageNotFound {
                path: path.to_path_buf(),
            });
        }

        let decode_err = |reason: String| RepeatError::ImageDecode {
            path: path.to_path_buf(),
            reason,
        };

        let decoded = image::ImageReader::open(path)
            .map_err(|e| decode_err(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_err(e.to_string()))?
            .decode()
            .map_err(|e| decode_err(e.to_string()))?;

        Ok(Self::from_dynamic(path.to_path_buf(), decoded))
    }

    /// Build from an already decoded image.
    pub fn from_dynamic(path: PathBuf, decoded: image::DynamicImage) -> Self {
        let (width, height) = (decoded.width(), decoded.height());

        if decoded.color().has_alpha() {
            let rgba = decoded.to_rgba8();
            let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
            let mut alpha = Vec::with_capacity(rgba.len() / 4);
            for px in rgba.pixels() {
                rgb.extend_from_slice(&px.0[..3]);
                alpha.push(px.0[3]);
            }

            // Fully opaque alpha carries no information.
            let alpha = alpha.iter().any(|&a| a != u8::MAX).then_some(alpha);

            Self {
                path,
                width,
                height,
                rgb,
                alpha,
            }
        } else {
            Self {
                path,
                width,
                height,
                rgb: decoded.to_rgb8().into_raw(),
                alpha: None,
            }
        }
    }

    /// Pixel dimensions as a nominal size for placement.
    pub fn nominal_size(&self) -> ImageSize {
        ImageSize::new(f64::from(self.width), f64::from(self.height))
    }
}
