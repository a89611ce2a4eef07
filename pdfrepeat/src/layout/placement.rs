//! Image placement on a page.
//!
//! The image is scaled uniformly until it touches the page on one axis and
//! centered on the other, so it never overflows the page whatever the two
//! aspect ratios are. Every page of a run uses the same placement.

use serde::Serialize;

use crate::config::{ImageSize, PageSize};

/// Destination rectangle of the image on a page, in PDF points.
///
/// `x` and `y` are the offsets of the rectangle from the page's lower-left
/// corner. Because the rectangle is centered, the same offsets hold when
/// measured from the upper-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Horizontal offset of the rectangle.
    pub x: f64,
    /// Vertical offset of the rectangle.
    pub y: f64,
    /// Rendered image width.
    pub width: f64,
    /// Rendered image height.
    pub height: f64,
    /// Uniform scale applied to the nominal image size.
    pub scale: f64,
}

impl Placement {
    /// The `cm` operands that map the unit square onto this rectangle.
    pub fn transform(&self) -> [f64; 6] {
        [self.width, 0.0, 0.0, self.height, self.x, self.y]
    }
}

/// Fit `image` inside `page`, preserving its aspect ratio, and center it.
///
/// Both sizes must be positive; [`Config::validate`](crate::Config::validate)
/// rejects anything else before the pipeline reaches this point.
pub fn place_image(page: PageSize, image: ImageSize) -> Placement {
    let scale = (page.width / image.width).min(page.height / image.height);

    let width = image.width * scale;
    let height = image.height * scale;

    Placement {
        x: (page.width - width) / 2.0,
        y: (page.height - height) / 2.0,
        width,
        height,
        scale,
    }
}
