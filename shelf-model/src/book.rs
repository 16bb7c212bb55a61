use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_types::BookId;

/// Reading status of a catalog book. Newly created rows default to
/// [`ReadingStatus::Unread`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    #[default]
    Unread,
    Reading,
    Finished,
}

/// A book row in the catalog.
///
/// Identity attributes are `isbn` (may be empty), `title`, and `author`;
/// `publisher`, `publish_date`, and `cover_url` are mutable metadata that
/// field-level merges operate on. Status, categories, and tags are catalog
/// bookkeeping the import engine only touches as creation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub status: ReadingStatus,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Creates a book with the given identity attributes and default
    /// metadata (empty strings, unread, no categories/tags).
    #[must_use]
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            isbn: String::new(),
            title: title.into(),
            author: author.into(),
            publisher: String::new(),
            publish_date: String::new(),
            cover_url: String::new(),
            status: ReadingStatus::Unread,
            categories: Vec::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The deduplication key for this book. See [`identity_key`].
    #[must_use]
    pub fn identity_key(&self) -> String {
        identity_key(&self.isbn, &self.title, &self.author)
    }
}

/// Derives the deduplication key for a book: the ISBN when non-empty,
/// otherwise `title|author`.
///
/// Every place that matches an imported book against the catalog (conflict
/// detection, strategy validation, the executor's run-scoped dedup table)
/// must go through this function.
#[must_use]
pub fn identity_key(isbn: &str, title: &str, author: &str) -> String {
    if isbn.is_empty() {
        format!("{title}|{author}")
    } else {
        isbn.to_string()
    }
}
