//! In-memory catalog store.
//!
//! The reference [`CatalogStore`] implementation: insertion-ordered,
//! `RwLock`-guarded vectors. Backs the desktop app shell in development
//! and every test in the workspace.

use crate::{BookPatch, CatalogStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use shelf_model::{Book, BookList, ListEntry};
use shelf_types::{BookId, ListId};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Inner {
    books: Vec<Book>,
    lists: Vec<BookList>,
}

/// An in-memory catalog. Cheap to create, insertion-ordered listing.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<Inner>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of books currently stored. Test convenience.
    pub async fn book_count(&self) -> usize {
        self.inner.read().await.books.len()
    }

    /// Number of lists currently stored. Test convenience.
    pub async fn list_count(&self) -> usize {
        self.inner.read().await.lists.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        Ok(self.inner.read().await.books.clone())
    }

    async fn get_book(&self, id: BookId) -> StoreResult<Option<Book>> {
        Ok(self
            .inner
            .read()
            .await
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn create_book(&self, book: Book) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.books.iter().any(|b| b.id == book.id) {
            return Err(StoreError::InvalidData(format!(
                "duplicate book id: {}",
                book.id
            )));
        }
        debug!(book_id = %book.id, title = %book.title, "created book");
        inner.books.push(book);
        Ok(())
    }

    async fn update_book_fields(&self, id: BookId, patch: BookPatch) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let book = inner
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::BookNotFound(id.to_string()))?;
        if let Some(isbn) = patch.isbn {
            book.isbn = isbn;
        }
        if let Some(publisher) = patch.publisher {
            book.publisher = publisher;
        }
        if let Some(publish_date) = patch.publish_date {
            book.publish_date = publish_date;
        }
        if let Some(cover_url) = patch.cover_url {
            book.cover_url = cover_url;
        }
        book.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_book(&self, id: BookId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.books.retain(|b| b.id != id);
        // Deletion semantics: drop the book from every membership too.
        for list in &mut inner.lists {
            list.entries.retain(|e| e.book_id != id);
        }
        Ok(())
    }

    async fn list_lists(&self) -> StoreResult<Vec<BookList>> {
        Ok(self.inner.read().await.lists.clone())
    }

    async fn get_list(&self, id: ListId) -> StoreResult<Option<BookList>> {
        Ok(self
            .inner
            .read()
            .await
            .lists
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn create_list(&self, name: &str, description: &str) -> StoreResult<ListId> {
        let id = ListId::new();
        let list = BookList::new(id, name, description);
        debug!(list_id = %id, name, "created list");
        self.inner.write().await.lists.push(list);
        Ok(id)
    }

    async fn delete_list(&self, id: ListId) -> StoreResult<()> {
        self.inner.write().await.lists.retain(|l| l.id != id);
        Ok(())
    }

    async fn add_book_to_list(
        &self,
        list_id: ListId,
        book_id: BookId,
        comment: &str,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let list = inner
            .lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
        if list.contains(book_id) {
            return Ok(());
        }
        list.entries.push(ListEntry::new(book_id, comment));
        list.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_book_from_list(&self, list_id: ListId, book_id: BookId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let list = inner
            .lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
        list.entries.retain(|e| e.book_id != book_id);
        list.updated_at = Utc::now();
        Ok(())
    }

    async fn set_entry_comment(
        &self,
        list_id: ListId,
        book_id: BookId,
        comment: &str,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let list = inner
            .lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
        let entry = list
            .entries
            .iter_mut()
            .find(|e| e.book_id == book_id)
            .ok_or_else(|| StoreError::BookNotFound(book_id.to_string()))?;
        entry.comment = comment.to_string();
        list.updated_at = Utc::now();
        Ok(())
    }

    async fn put_list(&self, list: BookList) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match inner.lists.iter_mut().find(|l| l.id == list.id) {
            Some(existing) => *existing = list,
            None => inner.lists.push(list),
        }
        Ok(())
    }
}
