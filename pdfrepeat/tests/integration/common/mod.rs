//! Shared helpers for the pipeline integration tests.

use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pdfrepeat::config::Config;
use pdfrepeat::io::SourceImage;
use pdfrepeat::render::ImageEmbedder;
use pdfrepeat::render::xobject::add_image_xobject;
use pdfrepeat::{RepeatError, Result};

/// Dictionary key carrying the global page index in test XObjects.
pub const INDEX_KEY: &str = "PageIndex";

/// A scratch directory holding the source image, the partials and the
/// final document.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a `width` x `height` PNG and return its path.
    pub fn image(&self, width: u32, height: u32) -> PathBuf {
        let path = self.path("tile.png");
        image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]))
            .save(&path)
            .expect("Failed to write test image");
        path
    }

    /// A config writing everything inside the workspace.
    pub fn config(&self, repetitions: usize) -> Config {
        let mut config = Config::new(self.image(50, 50), repetitions, self.path("final.pdf"));
        config.partial_dir = self.dir.path().to_path_buf();
        config.quiet = true;
        config
    }
}

/// Number of pages in the PDF at `path`.
pub fn page_count(path: &Path) -> usize {
    Document::load(path)
        .expect("Failed to load PDF")
        .get_pages()
        .len()
}

/// Global page index stamped by [`IndexedEmbedder`] on every page, in
/// document order.
pub fn page_indices(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
            let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();
            stream.dict.get(INDEX_KEY.as_bytes()).unwrap().as_i64().unwrap()
        })
        .collect()
}

/// Embeds a fresh XObject per page, tagged with the page's global index,
/// and fails on the pages listed in `fail_on`.
pub struct IndexedEmbedder {
    image: SourceImage,
    fail_on: Vec<usize>,
}

impl IndexedEmbedder {
    pub fn new() -> Arc<Self> {
        Self::failing_on(&[])
    }

    pub fn failing_on(pages: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            image: SourceImage {
                path: PathBuf::from("indexed.png"),
                width: 1,
                height: 1,
                rgb: vec![0, 0, 0],
                alpha: None,
            },
            fail_on: pages.to_vec(),
        })
    }
}

impl ImageEmbedder for IndexedEmbedder {
    fn embed(&self, doc: &mut Document, page: usize, _: Option<ObjectId>) -> Result<ObjectId> {
        if self.fail_on.contains(&page) {
            return Err(RepeatError::other(format!("refusing page {page}")));
        }

        let id = add_image_xobject(doc, &self.image);
        if let Ok(Object::Stream(stream)) = doc.get_object_mut(id) {
            stream.dict.set(INDEX_KEY, page as i64);
        }
        Ok(id)
    }
}
