use crate::model::image::ImageRecord;
use crate::refresh::Generation;
use crate::tag_index::{TagIndex, build_index};

/// Immutable catalog state produced by one successful list read.
///
/// A refreshed read never edits an existing snapshot; it builds a new one and
/// the owning view binding swaps it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    generation: Generation,
    images: Vec<ImageRecord>,
    index: TagIndex,
}

impl CatalogSnapshot {
    pub fn new(generation: Generation, images: Vec<ImageRecord>) -> Self {
        let index = build_index(&images);
        Self {
            generation,
            images,
            index,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn index(&self) -> &TagIndex {
        &self.index
    }

    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}
