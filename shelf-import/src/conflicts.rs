//! Conflict detection.
//!
//! A pure read-only pass comparing a parsed payload against the current
//! catalog. Produces list-name conflicts (exact name collision, with a
//! deterministic alternate-name suggestion) and book-identity conflicts
//! (ISBN match first, then exact title+author). Calling it repeatedly is
//! safe; it never writes.

use crate::error::EngineResult;
use crate::payload::{ImportPayload, ImportedBook};
use serde::{Deserialize, Serialize};
use shelf_model::Book;
use shelf_store::CatalogStore;
use shelf_types::ListId;
use std::collections::HashSet;

/// How an imported book was matched against an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    Isbn,
    TitleAuthor,
}

/// An imported list whose name collides with a stored list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListNameConflict {
    pub imported_name: String,
    pub existing_list_id: ListId,
    /// The first free `"name (n)"` among stored list names.
    pub suggested_name: String,
}

/// An imported book that matches an existing catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookConflict {
    /// Identity key of the imported book, also the `book_resolutions`
    /// strategy map key.
    pub key: String,
    pub imported: ImportedBook,
    pub existing: Book,
    pub match_kind: MatchKind,
}

/// Everything the detector found, fresh per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub list_conflicts: Vec<ListNameConflict>,
    pub book_conflicts: Vec<BookConflict>,
}

impl ConflictReport {
    /// Whether the import would touch nothing that already exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list_conflicts.is_empty() && self.book_conflicts.is_empty()
    }
}

/// Generates the alternate name for a colliding list: `"{base} (2)"`,
/// `"{base} (3)"`, … until a name not in `taken` is found.
///
/// Detection and execution both use this function against the set of
/// stored names, so a suggestion shown in the UI is the name the executor
/// will actually create under the `rename` action.
#[must_use]
pub fn alternate_name(base: &str, taken: &HashSet<String>) -> String {
    let mut n = 2u32;
    loop {
        let candidate = format!("{base} ({n})");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Looks up an existing book matching the imported one: by exact ISBN when
/// the imported ISBN is non-empty, otherwise by exact (title, author).
pub(crate) fn match_existing<'a>(
    books: &'a [Book],
    imported: &ImportedBook,
) -> Option<(&'a Book, MatchKind)> {
    if imported.isbn.is_empty() {
        books
            .iter()
            .find(|b| b.title == imported.title && b.author == imported.author)
            .map(|b| (b, MatchKind::TitleAuthor))
    } else {
        books
            .iter()
            .find(|b| b.isbn == imported.isbn)
            .map(|b| (b, MatchKind::Isbn))
    }
}

/// Compares the payload against the catalog and reports every collision.
///
/// Books are deduplicated across the whole payload by identity key,
/// first occurrence wins: a book referenced by two imported lists yields
/// at most one conflict.
pub async fn detect_conflicts(
    payload: &ImportPayload,
    store: &dyn CatalogStore,
) -> EngineResult<ConflictReport> {
    let existing_lists = store.list_lists().await?;
    let existing_books = store.list_books().await?;

    let taken: HashSet<String> = existing_lists.iter().map(|l| l.name.clone()).collect();

    let mut report = ConflictReport::default();

    for ilist in &payload.lists {
        if let Some(existing) = existing_lists.iter().find(|l| l.name == ilist.name) {
            report.list_conflicts.push(ListNameConflict {
                imported_name: ilist.name.clone(),
                existing_list_id: existing.id,
                suggested_name: alternate_name(&ilist.name, &taken),
            });
        }
    }

    let mut seen = HashSet::new();
    for ilist in &payload.lists {
        for ibook in &ilist.books {
            let key = ibook.identity_key();
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some((existing, match_kind)) = match_existing(&existing_books, ibook) {
                report.book_conflicts.push(BookConflict {
                    key,
                    imported: ibook.clone(),
                    existing: existing.clone(),
                    match_kind,
                });
            }
        }
    }

    Ok(report)
}
