//! The homework page: an in-memory document, its handlers and a sample layout.

pub mod demo;
pub mod document;
pub mod handlers;

use thiserror::Error;

pub use document::{Document, Host, RecordingHost};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("No element with id '{0}' in the page")]
    MissingElement(String),
}
