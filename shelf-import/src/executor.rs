//! Import execution.
//!
//! Applies the payload against the catalog under the resolved strategy,
//! in strict payload order, deduplicating books by identity key across
//! the whole run. There is no transaction underneath: on the first store
//! error the loop stops, the error lands in `ImportResult::errors`, and
//! the snapshot accumulated so far is returned intact so the partial
//! import stays undoable.

use crate::conflicts::{alternate_name, match_existing};
use crate::error::EngineResult;
use crate::payload::{ImportPayload, ImportedBook};
use crate::snapshot::ImportSnapshot;
use crate::strategy::{
    BookAction, BookField, CommentMerge, FieldChoice, FieldMerge, ImportStrategy, ListAction,
};
use serde::{Deserialize, Serialize};
use shelf_model::Book;
use shelf_store::{BookPatch, CatalogStore, StoreError};
use shelf_types::{BookId, ListId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// What an import run touched, by count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    /// Non-skipped lists processed.
    pub lists: u32,
    /// New book rows created.
    pub books_added: u32,
    /// Existing book rows reused (merged).
    pub books_merged: u32,
}

/// Outcome of one import run.
#[derive(Debug)]
pub struct ImportResult {
    /// False when the run halted on a store error.
    pub success: bool,
    pub imported: ImportCounts,
    /// Messages for the errors that halted the run; empty on success.
    pub errors: Vec<String>,
    /// The undo record, valid even after a partial failure.
    pub snapshot: ImportSnapshot,
}

/// Executes the import.
///
/// Preconditions: `snapshot` was produced by
/// [`crate::create_snapshot`] with the same payload and strategy, before
/// any mutation; under detailed field merge,
/// [`crate::unresolved_conflicts`] returned zero. Neither is re-checked
/// here.
///
/// Books inside skipped lists are not registered in the run-scoped dedup
/// table: a book appearing only in a skipped list and again in a later
/// list is treated as if the skipped list never existed.
pub async fn execute_import(
    payload: &ImportPayload,
    strategy: &ImportStrategy,
    mut snapshot: ImportSnapshot,
    store: &dyn CatalogStore,
) -> ImportResult {
    let mut counts = ImportCounts::default();

    match run(payload, strategy, &mut snapshot, &mut counts, store).await {
        Ok(()) => ImportResult {
            success: true,
            imported: counts,
            errors: Vec::new(),
            snapshot,
        },
        Err(e) => {
            warn!(error = %e, "import halted; partial snapshot retained for undo");
            ImportResult {
                success: false,
                imported: counts,
                errors: vec![e.to_string()],
                snapshot,
            }
        }
    }
}

async fn run(
    payload: &ImportPayload,
    strategy: &ImportStrategy,
    snapshot: &mut ImportSnapshot,
    counts: &mut ImportCounts,
    store: &dyn CatalogStore,
) -> EngineResult<()> {
    let existing_lists = store.list_lists().await?;
    let existing_books = store.list_books().await?;
    // Stored names at run start; names created by this run are not probed,
    // matching detection.
    let taken_names: HashSet<String> = existing_lists.iter().map(|l| l.name.clone()).collect();

    // Run-scoped dedup: identity key -> the row this run resolved it to.
    let mut resolved: HashMap<String, BookId> = HashMap::new();

    for ilist in &payload.lists {
        let action = strategy.list_action(&ilist.name);
        if action == ListAction::Skip {
            debug!(list = %ilist.name, "skipping list");
            continue;
        }

        let existing = existing_lists.iter().find(|l| l.name == ilist.name);
        let (target_id, merging) = resolve_list(
            ilist.name.as_str(),
            ilist.description.as_str(),
            action,
            existing.map(|l| l.id),
            &taken_names,
            snapshot,
            store,
        )
        .await?;
        counts.lists += 1;

        for ibook in &ilist.books {
            let key = ibook.identity_key();
            let book_id = match resolved.get(&key) {
                Some(&id) => id,
                None => {
                    let id = resolve_book(ibook, &key, strategy, &existing_books, snapshot, counts, store)
                        .await?;
                    resolved.insert(key, id);
                    id
                }
            };

            register_membership(target_id, book_id, ibook, merging, strategy, store).await?;
        }
    }

    Ok(())
}

/// Resolves the target list for one imported list, creating or deleting
/// as the action dictates. Returns the target id and whether books are
/// being merged into a pre-existing membership.
async fn resolve_list(
    name: &str,
    description: &str,
    action: ListAction,
    existing: Option<ListId>,
    taken_names: &HashSet<String>,
    snapshot: &mut ImportSnapshot,
    store: &dyn CatalogStore,
) -> EngineResult<(ListId, bool)> {
    match (action, existing) {
        (ListAction::Merge, Some(id)) => {
            debug!(list = name, %id, "merging into existing list");
            Ok((id, true))
        }
        (ListAction::Replace, Some(id)) => {
            // Pre-state was captured at snapshot time.
            store.delete_list(id).await?;
            let new_id = store.create_list(name, description).await?;
            snapshot.record_added_list(new_id);
            debug!(list = name, %new_id, "replaced existing list");
            Ok((new_id, false))
        }
        (ListAction::Rename, Some(_)) => {
            let alt = alternate_name(name, taken_names);
            let new_id = store.create_list(&alt, description).await?;
            snapshot.record_added_list(new_id);
            debug!(list = name, renamed = %alt, %new_id, "created list under alternate name");
            Ok((new_id, false))
        }
        // No same-named list exists: every remaining action creates fresh
        // under the original name.
        (_, _) => {
            let new_id = store.create_list(name, description).await?;
            snapshot.record_added_list(new_id);
            debug!(list = name, %new_id, "created list");
            Ok((new_id, false))
        }
    }
}

/// Resolves one not-yet-seen imported book to a catalog row, creating or
/// merging per the strategy.
async fn resolve_book(
    ibook: &ImportedBook,
    key: &str,
    strategy: &ImportStrategy,
    existing_books: &[Book],
    snapshot: &mut ImportSnapshot,
    counts: &mut ImportCounts,
    store: &dyn CatalogStore,
) -> EngineResult<BookId> {
    let matched = match_existing(existing_books, ibook);

    if let (Some((existing, _)), BookAction::Merge) = (matched, strategy.book_action(key)) {
        // Re-read the row: an earlier merge in this run may have patched
        // it under a different identity key, and merging against the
        // run-start values would clobber that write.
        let current = store
            .get_book(existing.id)
            .await?
            .ok_or_else(|| StoreError::BookNotFound(existing.id.to_string()))?;
        let mode = strategy.field_merge(key);
        let patch = build_patch(&current, ibook, mode, strategy, key);
        if !patch.is_empty() {
            snapshot
                .record_modified_book_fields(current.id, BookPatch::prior_values(&current, &patch));
            store.update_book_fields(current.id, patch).await?;
        }
        counts.books_merged += 1;
        debug!(book = %ibook.title, id = %current.id, ?mode, "merged into existing book");
        return Ok(current.id);
    }

    // Duplicate action, or no existing match regardless of action.
    let book = book_from_import(ibook);
    let id = book.id;
    store.create_book(book).await?;
    snapshot.record_added_book(id);
    counts.books_added += 1;
    debug!(book = %ibook.title, %id, "created book");
    Ok(id)
}

/// Adds the book to the target list, merging membership comments when the
/// list action was `merge` and an entry already exists.
async fn register_membership(
    list_id: ListId,
    book_id: BookId,
    ibook: &ImportedBook,
    merging: bool,
    strategy: &ImportStrategy,
    store: &dyn CatalogStore,
) -> EngineResult<()> {
    let list = store
        .get_list(list_id)
        .await?
        .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;

    match list.entry(book_id) {
        None => {
            store
                .add_book_to_list(list_id, book_id, &ibook.comment)
                .await?;
        }
        Some(entry) if merging => {
            let merged =
                merge_comments(&entry.comment, &ibook.comment, strategy.default_comment_merge);
            if merged != entry.comment {
                store.set_entry_comment(list_id, book_id, &merged).await?;
            }
        }
        // Already registered earlier in this run; leave it alone.
        Some(_) => {}
    }

    Ok(())
}

/// Builds the partial patch for merging `ibook` into `existing` under the
/// given mode. Only fields whose resolved value differs from the stored
/// value are included, keeping the patch (and the modified-book snapshot)
/// minimal.
fn build_patch(
    existing: &Book,
    ibook: &ImportedBook,
    mode: FieldMerge,
    strategy: &ImportStrategy,
    key: &str,
) -> BookPatch {
    let mut patch = BookPatch::default();
    for field in BookField::ALL {
        let (current, imported) = field_values(existing, ibook, field);
        let resolved = match mode {
            FieldMerge::Local => current,
            FieldMerge::Import => imported,
            FieldMerge::NonEmpty => {
                if current.is_empty() && !imported.is_empty() {
                    imported
                } else {
                    current
                }
            }
            FieldMerge::Detailed => match strategy.field_choice(key, field) {
                FieldChoice::Import => imported,
                FieldChoice::Local | FieldChoice::Unresolved => current,
            },
        };
        if resolved != current {
            let value = Some(resolved.to_string());
            match field {
                BookField::Isbn => patch.isbn = value,
                BookField::Publisher => patch.publisher = value,
                BookField::PublishDate => patch.publish_date = value,
                BookField::Cover => patch.cover_url = value,
            }
        }
    }
    patch
}

fn field_values<'a>(
    existing: &'a Book,
    ibook: &'a ImportedBook,
    field: BookField,
) -> (&'a str, &'a str) {
    match field {
        BookField::Isbn => (existing.isbn.as_str(), ibook.isbn.as_str()),
        BookField::Publisher => (existing.publisher.as_str(), ibook.publisher.as_str()),
        BookField::PublishDate => (existing.publish_date.as_str(), ibook.publish_date.as_str()),
        BookField::Cover => (existing.cover_url.as_str(), ibook.cover_url.as_str()),
    }
}

/// Combines an existing membership comment with the imported one.
fn merge_comments(local: &str, imported: &str, mode: CommentMerge) -> String {
    match mode {
        CommentMerge::Local => local.to_string(),
        CommentMerge::Import => imported.to_string(),
        CommentMerge::Both => {
            if local.is_empty() {
                imported.to_string()
            } else if imported.is_empty() {
                local.to_string()
            } else {
                format!("{local}\n\n{imported}")
            }
        }
    }
}

/// A fresh catalog row from an imported book: public fields copied,
/// catalog-only fields at their creation defaults.
fn book_from_import(ibook: &ImportedBook) -> Book {
    let mut book = Book::new(BookId::new(), ibook.title.clone(), ibook.author.clone());
    book.isbn = ibook.isbn.clone();
    book.publisher = ibook.publisher.clone();
    book.publish_date = ibook.publish_date.clone();
    book.cover_url = ibook.cover_url.clone();
    book
}
