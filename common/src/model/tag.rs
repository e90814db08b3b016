use serde::{Deserialize, Serialize};

/// A tag known to the catalog. `name` is the key used for filtering and
/// navigation; it is case-sensitive and stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    /// Surrogate key, only supplied by the structured backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl TagRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }
}
