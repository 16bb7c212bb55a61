use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_types::{BookId, ListId};

/// One membership entry in a list: which book, an optional comment
/// (empty string when absent), and when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub book_id: BookId,
    #[serde(default)]
    pub comment: String,
    pub added_at: DateTime<Utc>,
}

impl ListEntry {
    #[must_use]
    pub fn new(book_id: BookId, comment: impl Into<String>) -> Self {
        Self {
            book_id,
            comment: comment.into(),
            added_at: Utc::now(),
        }
    }
}

/// A named, ordered collection of books.
///
/// The name is the conflict key for imports — exact string match, no
/// normalization. Entry order is significant and preserved by restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entries: Vec<ListEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookList {
    /// Creates an empty list with the given name.
    #[must_use]
    pub fn new(id: ListId, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: description.into(),
            entries: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the entry for `book_id`, if the book is a member.
    #[must_use]
    pub fn entry(&self, book_id: BookId) -> Option<&ListEntry> {
        self.entries.iter().find(|e| e.book_id == book_id)
    }

    /// Whether `book_id` is a member of this list.
    #[must_use]
    pub fn contains(&self, book_id: BookId) -> bool {
        self.entry(book_id).is_some()
    }
}
