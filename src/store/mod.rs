//! Book catalog storage
//!
//! The catalog is accessed through the `BookStore` trait so the web layer
//! never depends on a concrete backing store. The default implementation is
//! the in-memory store in [`memory`].

mod memory;

pub use memory::InMemoryBookStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Book {
    /// Unique id, assigned once and never reassigned.
    pub id: u32,
    pub name: String,
    /// Set at creation, immutable afterwards.
    pub published: DateTime<Utc>,
}

/// Incoming book payload for create/update requests.
///
/// `id` is optional on create (the store assigns the next one) and is only
/// used for the path/body mismatch check on update. A missing `published`
/// timestamp defaults to now.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BookDraft {
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

/// Storage errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no book exists with id {0}")]
    NotFound(u32),

    #[error("a book with id {0} already exists")]
    Conflict(u32),
}

/// Catalog storage contract.
///
/// Implementations must keep insertion order for `list` and guarantee that
/// ids assigned to id-less creates never collide, even under concurrent
/// callers.
pub trait BookStore: Send + Sync {
    /// All books in insertion order. Never fails.
    fn list(&self) -> Vec<Book>;

    /// The book with the given id.
    fn get(&self, id: u32) -> Result<Book, StoreError>;

    /// Store a new book. Assigns the next counter value when the draft
    /// carries no id; rejects an explicit id that is already taken.
    fn create(&self, draft: BookDraft) -> Result<Book, StoreError>;

    /// Replace the name of an existing book, leaving id and published
    /// timestamp untouched.
    fn update(&self, id: u32, name: &str) -> Result<Book, StoreError>;
}
