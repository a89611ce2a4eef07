//! Image XObject creation.
//!
//! The decoded image becomes one `/Subtype /Image` stream per partial
//! document. Pages reference it by name from their resources, so the
//! pixels are stored once however many pages show them.

use lopdf::{Document, ObjectId, Stream, dictionary};
use std::sync::Arc;

use crate::error::Result;
use crate::io::SourceImage;

/// Embeds the source image into a document under construction.
///
/// Called once for every page a worker renders. `embedded` is the id this
/// embedder returned for an earlier page of the same document, if any, so
/// implementations can reuse it instead of storing the pixels again.
pub trait ImageEmbedder: Send + Sync {
    /// Make the image available to page `page` (a global page index) and
    /// return the id of its XObject.
    fn embed(&self, doc: &mut Document, page: usize, embedded: Option<ObjectId>)
    -> Result<ObjectId>;
}

/// Embeds a decoded [`SourceImage`] as a DeviceRGB image XObject, with a
/// DeviceGray soft mask when the image has transparency.
#[derive(Debug, Clone)]
pub struct XObjectEmbedder {
    image: Arc<SourceImage>,
}

impl XObjectEmbedder {
    /// Create an embedder for `image`.
    pub fn new(image: Arc<SourceImage>) -> Self {
        Self { image }
    }
}

impl ImageEmbedder for XObjectEmbedder {
    fn embed(
        &self,
        doc: &mut Document,
        _page: usize,
        embedded: Option<ObjectId>,
    ) -> Result<ObjectId> {
        match embedded {
            Some(id) => Ok(id),
            None => Ok(add_image_xobject(doc, &self.image)),
        }
    }
}

/// Add `image` to `doc` as an image XObject and return its id.
pub fn add_image_xobject(doc: &mut Document, image: &SourceImage) -> ObjectId {
    let width = i64::from(image.width);
    let height = i64::from(image.height);

    let smask_id = image.alpha.as_ref().map(|alpha| {
        let mask = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        };
        doc.add_object(Stream::new(mask, alpha.clone()))
    });

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };
    if let Some(id) = smask_id {
        dict.set("SMask", id);
    }

    doc.add_object(Stream::new(dict, image.rgb.clone()))
}
