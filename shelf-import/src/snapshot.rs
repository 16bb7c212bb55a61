//! Snapshot capture — the reversible record of an import.
//!
//! A snapshot is created before any mutation and appended to during
//! execution. Pre-state (lists that will be replaced or merged into) is
//! captured up front by value; created-entity ids and pre-patch book
//! fields are only known mid-run and recorded by the executor through the
//! append operations below. Every append is idempotent for an
//! already-recorded id, so the executor never has to track what it has
//! captured.

use crate::error::EngineResult;
use crate::payload::ImportPayload;
use crate::strategy::{ImportStrategy, ListAction};
use serde::{Deserialize, Serialize};
use shelf_model::{BookList, ListEntry};
use shelf_store::{BookPatch, CatalogStore};
use shelf_types::{BookId, ListId};

/// Prior membership of a list that an import merged into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedList {
    pub list_id: ListId,
    /// Exact pre-import entries: order, comments, added-at stamps.
    pub entries: Vec<ListEntry>,
}

/// Prior merge-field values of a book an import patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedBook {
    pub book_id: BookId,
    pub fields: BookPatch,
}

/// The accumulated reversible record of one import attempt.
///
/// Consumed exactly once by [`crate::restore_snapshot`]; that is a
/// documented precondition, not an enforced one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSnapshot {
    pub added_list_ids: Vec<ListId>,
    pub added_book_ids: Vec<BookId>,
    /// Full prior records of lists deleted under the `replace` action.
    pub replaced_lists: Vec<BookList>,
    /// Prior memberships of lists merged into.
    pub modified_lists: Vec<ModifiedList>,
    /// Prior field values of merged books, captured before their first
    /// patch in the run.
    pub modified_books: Vec<ModifiedBook>,
}

impl ImportSnapshot {
    /// Records a list id created by this import.
    pub fn record_added_list(&mut self, id: ListId) {
        if !self.added_list_ids.contains(&id) {
            self.added_list_ids.push(id);
        }
    }

    /// Records a book id created by this import.
    pub fn record_added_book(&mut self, id: BookId) {
        if !self.added_book_ids.contains(&id) {
            self.added_book_ids.push(id);
        }
    }

    /// Records the full prior record of a list about to be replaced.
    pub fn record_replaced_list(&mut self, list: BookList) {
        if !self.replaced_lists.iter().any(|l| l.id == list.id) {
            self.replaced_lists.push(list);
        }
    }

    /// Records the prior membership of a list about to be merged into.
    pub fn record_modified_list(&mut self, list_id: ListId, entries: Vec<ListEntry>) {
        if !self.modified_lists.iter().any(|m| m.list_id == list_id) {
            self.modified_lists.push(ModifiedList { list_id, entries });
        }
    }

    /// Records a book's pre-patch field values. The first capture for a
    /// given book wins; later calls for the same id are ignored.
    pub fn record_modified_book_fields(&mut self, book_id: BookId, fields: BookPatch) {
        if !self.modified_books.iter().any(|m| m.book_id == book_id) {
            self.modified_books.push(ModifiedBook { book_id, fields });
        }
    }

    /// Whether nothing has been captured or created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_list_ids.is_empty()
            && self.added_book_ids.is_empty()
            && self.replaced_lists.is_empty()
            && self.modified_lists.is_empty()
            && self.modified_books.is_empty()
    }
}

/// Captures the pre-import state of every stored list this import may
/// replace or merge into.
///
/// Must run before any mutation. Lists resolved to `replace` are captured
/// as full records; lists resolved to `merge` capture their membership by
/// value. `skip` and `rename` leave existing lists untouched and need no
/// capture. Created-entity tracking starts empty and is filled by the
/// executor.
pub async fn create_snapshot(
    payload: &ImportPayload,
    strategy: &ImportStrategy,
    store: &dyn CatalogStore,
) -> EngineResult<ImportSnapshot> {
    let existing_lists = store.list_lists().await?;
    let mut snapshot = ImportSnapshot::default();

    for ilist in &payload.lists {
        let Some(existing) = existing_lists.iter().find(|l| l.name == ilist.name) else {
            continue;
        };
        match strategy.list_action(&ilist.name) {
            ListAction::Replace => snapshot.record_replaced_list(existing.clone()),
            ListAction::Merge => {
                snapshot.record_modified_list(existing.id, existing.entries.clone());
            }
            ListAction::Skip | ListAction::Rename => {}
        }
    }

    Ok(snapshot)
}
