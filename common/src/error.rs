//! Error taxonomy shared by the normalizer and the catalog client.
//!
//! Read-many operations never return these; they record them on the
//! `client::Listing` they hand back. Read-one and mutating operations return
//! them directly.

use crate::config::Dialect;
use thiserror::Error;

/// Failure to complete a round-trip with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("could not reach the server: {0}")]
    Connection(String),
    #[error("server answered with status {status}")]
    Status { status: u16 },
}

/// The payload did not have a shape the normalizer recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("expected a single image object")]
    NotAnObject,
    #[error("image has no url")]
    MissingUrl,
    #[error("page has no primary image element")]
    MissingImageElement,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{what} not found")]
    NotFound { what: String },
    #[error(transparent)]
    Parse(#[from] NormalizeError),
    #[error("{0}")]
    Validation(String),
    #[error("server rejected the request: {0}")]
    Rejected(String),
    #[error("{operation} is not supported by the {dialect} backend")]
    Unsupported {
        operation: &'static str,
        dialect: Dialect,
    },
}

impl CatalogError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CatalogError::NotFound { what: what.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// True for failures where retrying later may succeed.
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Transport(_))
    }

    /// Text suitable for showing next to a retry control.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Transport(_) => {
                format!("{self}. Check your connection and try again.")
            }
            CatalogError::Validation(message) => message.clone(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_convert_into_catalog_errors() {
        let err: CatalogError = TransportError::Status { status: 502 }.into();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "server answered with status 502");
    }

    #[test]
    fn user_message_suggests_retry_for_transport_failures() {
        let err = CatalogError::from(TransportError::Connection("refused".into()));
        assert!(err.user_message().ends_with("try again."));
    }

    #[test]
    fn unsupported_names_the_dialect() {
        let err = CatalogError::Unsupported {
            operation: "delete",
            dialect: Dialect::Markup,
        };
        assert_eq!(
            err.to_string(),
            "delete is not supported by the markup backend"
        );
    }
}
