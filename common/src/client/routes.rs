// Request paths per dialect. Dynamic segments are percent-encoded so ids,
// tags and file names containing `/`, `?` or spaces stay one segment.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

pub(crate) mod structured {
    use super::segment;

    pub const IMAGES: &str = "/images";
    pub const TAGS: &str = "/tags";

    pub fn image(id: &str) -> String {
        format!("/images/{}", segment(id))
    }

    pub fn images_by_tag(tag: &str) -> String {
        format!("/images/tags/{}", segment(tag))
    }

    pub fn image_tags(id: &str) -> String {
        format!("/images/{}/tags", segment(id))
    }
}

pub(crate) mod markup {
    use super::segment;

    pub const UPLOAD: &str = "/";
    pub const GALLERY: &str = "/images";

    pub fn view(filename: &str) -> String {
        format!("/view/{}", segment(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(structured::image("a/b c"), "/images/a%2Fb%20c");
        assert_eq!(structured::images_by_tag("sea?"), "/images/tags/sea%3F");
        assert_eq!(markup::view("my photo.png"), "/view/my%20photo.png");
    }

    #[test]
    fn plain_ids_are_untouched() {
        assert_eq!(structured::image_tags("img-42"), "/images/img-42/tags");
    }
}
