//! The `CatalogStore` trait — the surface the import engine consumes.

use crate::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shelf_model::{Book, BookList};
use shelf_types::{BookId, ListId};

/// A partial update over the fixed merge field set of a book.
///
/// `None` means "leave unchanged"; `Some` overwrites, including with an
/// empty string. Restricting patches to these four fields is what lets
/// restore write back prior values without clobbering unrelated local
/// edits made after an import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub cover_url: Option<String>,
}

impl BookPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.isbn.is_none()
            && self.publisher.is_none()
            && self.publish_date.is_none()
            && self.cover_url.is_none()
    }

    /// A patch capturing `book`'s current values for exactly the fields
    /// `patch` sets. Applying the result after `patch` undoes it, without
    /// touching fields the patch never wrote.
    #[must_use]
    pub fn prior_values(book: &Book, patch: &BookPatch) -> Self {
        Self {
            isbn: patch.isbn.as_ref().map(|_| book.isbn.clone()),
            publisher: patch.publisher.as_ref().map(|_| book.publisher.clone()),
            publish_date: patch.publish_date.as_ref().map(|_| book.publish_date.clone()),
            cover_url: patch.cover_url.as_ref().map(|_| book.cover_url.clone()),
        }
    }
}

/// Async catalog store surface.
///
/// Implementations persist books and lists however they like; the import
/// engine only relies on these operations and on deletion of a book
/// implicitly removing it from every list membership.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns every book in the catalog.
    async fn list_books(&self) -> StoreResult<Vec<Book>>;

    /// Returns one book by id, or `None`.
    async fn get_book(&self, id: BookId) -> StoreResult<Option<Book>>;

    /// Inserts a new book row. The caller supplies the id.
    async fn create_book(&self, book: Book) -> StoreResult<()>;

    /// Applies a partial field patch to a book. Errors if the book does
    /// not exist.
    async fn update_book_fields(&self, id: BookId, patch: BookPatch) -> StoreResult<()>;

    /// Deletes a book and removes it from every list membership.
    /// Deleting an unknown id is a no-op.
    async fn delete_book(&self, id: BookId) -> StoreResult<()>;

    /// Returns every list in the catalog.
    async fn list_lists(&self) -> StoreResult<Vec<BookList>>;

    /// Returns one list by id, or `None`.
    async fn get_list(&self, id: ListId) -> StoreResult<Option<BookList>>;

    /// Creates an empty list and returns its generated id.
    async fn create_list(&self, name: &str, description: &str) -> StoreResult<ListId>;

    /// Deletes a list. Deleting an unknown id is a no-op.
    async fn delete_list(&self, id: ListId) -> StoreResult<()>;

    /// Appends a membership entry. Adding a book that is already a member
    /// leaves the existing entry untouched.
    async fn add_book_to_list(
        &self,
        list_id: ListId,
        book_id: BookId,
        comment: &str,
    ) -> StoreResult<()>;

    /// Removes a membership entry. Errors if the list does not exist.
    async fn remove_book_from_list(&self, list_id: ListId, book_id: BookId) -> StoreResult<()>;

    /// Replaces the membership comment for a book in a list. Errors if the
    /// list or the entry does not exist.
    async fn set_entry_comment(
        &self,
        list_id: ListId,
        book_id: BookId,
        comment: &str,
    ) -> StoreResult<()>;

    /// Writes a full list record verbatim, inserting or replacing by id.
    /// Low-level operation used only by snapshot restore; timestamps and
    /// entry order are stored exactly as given.
    async fn put_list(&self, list: BookList) -> StoreResult<()>;
}
