//! Tag relations derived from a catalog snapshot.
//!
//! The index is always rebuilt from a complete image sequence. Tag order is
//! the order in which tags are first seen while walking the images, and image
//! ids under each tag keep the image order.

use crate::model::image::ImageRecord;
use crate::model::tag::TagRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    entries: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
    image_tags: HashMap<String, Vec<String>>,
}

/// Builds the tag → image ids and image id → tags relations.
pub fn build_index(images: &[ImageRecord]) -> TagIndex {
    let mut index = TagIndex::default();

    for image in images {
        let mut seen: Vec<&str> = Vec::with_capacity(image.tags.len());
        for tag in &image.tags {
            if seen.contains(&tag.as_str()) {
                continue;
            }
            seen.push(tag);

            let position = match index.positions.get(tag) {
                Some(&position) => position,
                None => {
                    index.entries.push((tag.clone(), Vec::new()));
                    index.positions.insert(tag.clone(), index.entries.len() - 1);
                    index.entries.len() - 1
                }
            };
            index.entries[position].1.push(image.id.clone());
        }
        index.image_tags.insert(
            image.id.clone(),
            seen.into_iter().map(str::to_string).collect(),
        );
    }

    index
}

impl TagIndex {
    /// Ids of the images carrying `tag`, matched exactly.
    pub fn images_for(&self, tag: &str) -> &[String] {
        self.positions
            .get(tag)
            .map(|&position| self.entries[position].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn tags_for(&self, image_id: &str) -> &[String] {
        self.image_tags
            .get(image_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(tag, ids)| (tag.as_str(), ids.as_slice()))
    }

    /// Tag list for backends that have no tag endpoint of their own.
    pub fn tag_records(&self) -> Vec<TagRecord> {
        self.tags().map(TagRecord::named).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str, tags: &[&str]) -> ImageRecord {
        let mut record = ImageRecord::new(id, format!("{id}.png"), format!("http://img/{id}.png"));
        record.tags = tags.iter().map(|t| t.to_string()).collect();
        record
    }

    #[test]
    fn tags_follow_first_seen_order() {
        let index = build_index(&[
            image("1", &["sea", "sun"]),
            image("2", &["cat", "sea"]),
            image("3", &["sun"]),
        ]);

        let tags: Vec<&str> = index.tags().collect();
        assert_eq!(tags, vec!["sea", "sun", "cat"]);
        assert_eq!(index.images_for("sea"), ["1".to_string(), "2".to_string()]);
        assert_eq!(index.images_for("sun"), ["1".to_string(), "3".to_string()]);
    }

    #[test]
    fn duplicate_tags_on_one_image_are_indexed_once() {
        let index = build_index(&[image("1", &["cat", "cat", "pet"])]);

        assert_eq!(index.images_for("cat"), ["1".to_string()]);
        assert_eq!(index.tags_for("1"), ["cat".to_string(), "pet".to_string()]);
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let index = build_index(&[image("1", &["Cat"])]);

        assert!(index.images_for("cat").is_empty());
        assert_eq!(index.images_for("Cat").len(), 1);
    }

    #[test]
    fn untagged_catalog_has_empty_index() {
        let index = build_index(&[image("1", &[]), image("2", &[])]);

        assert!(index.is_empty());
        assert!(index.tag_records().is_empty());
        assert!(index.tags_for("1").is_empty());
        assert!(index.tags_for("missing").is_empty());
    }

    #[test]
    fn tag_records_carry_no_surrogate_id() {
        let index = build_index(&[image("1", &["a", "b"])]);

        assert_eq!(
            index.tag_records(),
            vec![TagRecord::named("a"), TagRecord::named("b")]
        );
    }
}
