use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Body of `POST /images/{id}/tags` on the structured backend.
pub struct AddTagsRequest {
    pub tags: Vec<String>,
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Multipart upload payload: the binary under the `image` field and, when
/// present, the already-canonicalized tag string under `tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file: UploadFile,
    pub tags: Option<String>,
}

/// Acknowledgement returned by the markup backend's `POST /`.
///
/// That server has been seen spelling the flag `seccess`; both spellings are
/// accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadAck {
    #[serde(default, alias = "seccess")]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Splits a comma-separated tag string, trimming every segment and dropping
/// empty segments and repeats.
///
/// `" a, b ,,c "` becomes `["a", "b", "c"]`.
pub fn split_tags(csv: &str) -> Vec<String> {
    canonical_tags(csv.split(','))
}

/// Trims each tag, keeping the first occurrence of every non-empty name.
pub fn canonical_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|seen| seen == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_segments_are_trimmed_and_empties_dropped() {
        assert_eq!(split_tags(" a, b ,,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_csv_yields_no_tags() {
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , ,").is_empty());
    }

    #[test]
    fn repeated_tags_keep_first_occurrence() {
        assert_eq!(split_tags("cat, pet,cat"), vec!["cat", "pet"]);
        assert_eq!(split_tags("Cat,cat"), vec!["Cat", "cat"]);
    }

    #[test]
    fn ack_accepts_misspelled_success_flag() {
        let ack: UploadAck =
            serde_json::from_str(r#"{"seccess": true, "url": "http://h/b/x.png"}"#).unwrap();
        assert!(ack.success);
        assert_eq!(ack.url.as_deref(), Some("http://h/b/x.png"));
    }
}
