//! Shared model and logic for the image gallery client.
//!
//! Nothing in this crate touches the browser: the front-end supplies a
//! `client::Transport` and drives the `refresh` protocol from its views.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod refresh;
pub mod requests;
pub mod tag_index;

pub use client::{CatalogClient, DeleteOutcome, Listing, Transport};
pub use config::{CatalogConfig, Dialect};
pub use error::{CatalogError, NormalizeError, TransportError};
