pub mod image;
pub mod snapshot;
pub mod tag;
