//! Page tree construction for a single partial document.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::config::PageSize;
use crate::error::Result;
use crate::layout::Placement;

/// Resource name the image XObject is registered under on every page.
pub const IMAGE_RESOURCE: &str = "Im0";

/// A document being filled with identically sized pages.
///
/// Pages are appended to a single flat `/Pages` node. [`finish`](Self::finish)
/// writes the `/Kids` array and `/Count` and hands the document back.
#[derive(Debug)]
pub struct PageCanvas {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    size: PageSize,
}

impl PageCanvas {
    /// Start an empty document whose pages will all be `size`.
    pub fn new(size: PageSize) -> Self {
        let (doc, pages_id) = crate::utils::empty_document();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            size,
        }
    }

    /// Mutable access to the underlying document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Append a blank page and return its id.
    pub fn add_page(&mut self) -> ObjectId {
        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            Object::Real(self.size.width as _),
            Object::Real(self.size.height as _),
        ];

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box,
        });
        self.kids.push(page_id.into());
        page_id
    }

    /// Draw `xobject` on `page_id` inside the `placement` rectangle.
    pub fn draw_image(
        &mut self,
        page_id: ObjectId,
        xobject: ObjectId,
        placement: &Placement,
    ) -> Result<()> {
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    placement
                        .transform()
                        .iter()
                        .map(|&v| Object::Real(v as _))
                        .collect(),
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let resources = dictionary! {
            "XObject" => dictionary! {
                IMAGE_RESOURCE => xobject,
            },
        };

        let page = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.set("Resources", resources);
        page.set("Contents", content_id);
        Ok(())
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Close the page tree and return the finished document.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        if let Ok(Object::Dictionary(pages)) = self.doc.get_object_mut(self.pages_id) {
            pages.set("Kids", self.kids);
            pages.set("Count", count);
        }
        self.doc
    }
}
