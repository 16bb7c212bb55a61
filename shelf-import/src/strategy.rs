//! The import strategy model.
//!
//! A strategy is configuration, not behavior: global defaults plus
//! per-list and per-book (and per-field) overrides, consumed by the
//! executor. Override precedence is per-book-per-field, then per-book,
//! then the global default; per-list overrides beat the global list
//! action.

use crate::conflicts::ConflictReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with an imported list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListAction {
    /// Leave the list and all of its books untouched.
    Skip,
    /// Delete the same-named existing list and recreate it from the import.
    Replace,
    /// Create the list under a deterministic alternate name on collision.
    Rename,
    /// Fold the imported membership into the existing same-named list.
    Merge,
}

/// What to do with an imported book that matches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookAction {
    /// Always create a new catalog row.
    Duplicate,
    /// Reuse the existing row, merging fields per the field-merge mode.
    Merge,
}

/// How membership comments combine when merging into an existing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentMerge {
    /// Keep the existing comment.
    Local,
    /// Overwrite with the imported comment.
    Import,
    /// Concatenate existing then imported, blank line between, when both
    /// are non-empty; otherwise whichever side is present.
    Both,
}

/// How conflicting scalar fields of a merged book are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldMerge {
    /// No field is changed.
    Local,
    /// Every differing field takes the imported value.
    Import,
    /// Only empty existing values are filled from the import.
    NonEmpty,
    /// Apply the explicit per-field choices in the strategy. Every
    /// genuinely differing field must carry a non-unresolved choice
    /// before execution.
    Detailed,
}

/// The fixed field set that field-level merging operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookField {
    Isbn,
    Publisher,
    PublishDate,
    Cover,
}

impl BookField {
    /// All patchable fields, in canonical order.
    pub const ALL: [BookField; 4] = [
        BookField::Isbn,
        BookField::Publisher,
        BookField::PublishDate,
        BookField::Cover,
    ];
}

/// A per-field decision under [`FieldMerge::Detailed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldChoice {
    /// No decision yet. Blocks execution while any differing field is in
    /// this state.
    #[default]
    Unresolved,
    /// Keep the existing value.
    Local,
    /// Take the imported value.
    Import,
}

/// Per-book overrides, keyed by identity key in
/// [`ImportStrategy::book_resolutions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookResolution {
    /// Overrides the default book action for this book.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<BookAction>,
    /// Overrides the default field-merge mode for this book.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_merge: Option<FieldMerge>,
    /// Per-field choices, consulted under [`FieldMerge::Detailed`].
    #[serde(default)]
    pub fields: HashMap<BookField, FieldChoice>,
}

/// The full strategy for one import attempt, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStrategy {
    pub default_list_action: ListAction,
    pub default_book_action: BookAction,
    pub default_comment_merge: CommentMerge,
    pub default_field_merge: FieldMerge,
    /// Keyed by imported list name.
    #[serde(default)]
    pub list_overrides: HashMap<String, ListAction>,
    /// Keyed by identity key.
    #[serde(default)]
    pub book_resolutions: HashMap<String, BookResolution>,
}

impl Default for ImportStrategy {
    /// Non-destructive defaults: rename colliding lists, merge matching
    /// books filling only empty fields, keep both comments.
    fn default() -> Self {
        Self {
            default_list_action: ListAction::Rename,
            default_book_action: BookAction::Merge,
            default_comment_merge: CommentMerge::Both,
            default_field_merge: FieldMerge::NonEmpty,
            list_overrides: HashMap::new(),
            book_resolutions: HashMap::new(),
        }
    }
}

impl ImportStrategy {
    /// Resolved action for the imported list with this name.
    #[must_use]
    pub fn list_action(&self, name: &str) -> ListAction {
        self.list_overrides
            .get(name)
            .copied()
            .unwrap_or(self.default_list_action)
    }

    /// Resolved action for the book with this identity key.
    #[must_use]
    pub fn book_action(&self, key: &str) -> BookAction {
        self.book_resolutions
            .get(key)
            .and_then(|r| r.action)
            .unwrap_or(self.default_book_action)
    }

    /// Resolved field-merge mode for the book with this identity key.
    #[must_use]
    pub fn field_merge(&self, key: &str) -> FieldMerge {
        self.book_resolutions
            .get(key)
            .and_then(|r| r.field_merge)
            .unwrap_or(self.default_field_merge)
    }

    /// Per-field choice for this book and field under detailed mode.
    #[must_use]
    pub fn field_choice(&self, key: &str, field: BookField) -> FieldChoice {
        self.book_resolutions
            .get(key)
            .and_then(|r| r.fields.get(&field).copied())
            .unwrap_or_default()
    }
}

/// Counts the field conflicts still lacking an explicit choice.
///
/// Only books that will actually be merged under [`FieldMerge::Detailed`]
/// contribute; a field counts when its existing and imported values
/// genuinely differ and the strategy holds no choice (or
/// [`FieldChoice::Unresolved`]) for it. Execution must be refused by the
/// caller while this is non-zero — this is a blocking validation, not a
/// runtime error.
#[must_use]
pub fn unresolved_conflicts(strategy: &ImportStrategy, report: &ConflictReport) -> usize {
    let mut count = 0;
    for conflict in &report.book_conflicts {
        if strategy.book_action(&conflict.key) != BookAction::Merge {
            continue;
        }
        if strategy.field_merge(&conflict.key) != FieldMerge::Detailed {
            continue;
        }
        for field in BookField::ALL {
            let (existing, imported) = match field {
                BookField::Isbn => (&conflict.existing.isbn, &conflict.imported.isbn),
                BookField::Publisher => (&conflict.existing.publisher, &conflict.imported.publisher),
                BookField::PublishDate => {
                    (&conflict.existing.publish_date, &conflict.imported.publish_date)
                }
                BookField::Cover => (&conflict.existing.cover_url, &conflict.imported.cover_url),
            };
            if existing != imported
                && strategy.field_choice(&conflict.key, field) == FieldChoice::Unresolved
            {
                count += 1;
            }
        }
    }
    count
}
