//! Document information dictionary for the final document.

use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::config::Metadata;
use crate::error::{RepeatError, Result};

/// Creator and Producer written into every final document.
pub const PRODUCER: &str = "pdfrepeat";

/// Reads and writes the `/Info` dictionary.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Stamp Creator and Producer on `doc` and set whichever of title and
    /// author `metadata` carries.
    pub fn set_metadata(&self, doc: &mut Document, metadata: &Metadata) -> Result<()> {
        let info_id = match doc.trailer.get(b"Info").and_then(Object::as_reference) {
            Ok(id) => id,
            Err(_) => {
                let id = doc.add_object(Dictionary::new());
                doc.trailer.set("Info", id);
                id
            }
        };

        let info = match doc.get_object_mut(info_id) {
            Ok(Object::Dictionary(dict)) => dict,
            _ => {
                return Err(RepeatError::merge_failed(
                    "Info entry is not a dictionary",
                ));
            }
        };

        if let Some(title) = &metadata.title {
            info.set("Title", text(title));
        }
        if let Some(author) = &metadata.author {
            info.set("Author", text(author));
        }
        info.set("Creator", text(PRODUCER));
        info.set("Producer", text(PRODUCER));

        Ok(())
    }

    /// Read title and author back from `doc`.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok()
        else {
            return Metadata::default();
        };

        Metadata::new(string_field(info, b"Title"), string_field(info, b"Author"))
    }
}

fn text(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

fn string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}
