#![allow(dead_code)]

use chrono::Utc;
use shelf_import::{ImportPayload, ImportedBook, ImportedList};
use shelf_model::Book;
use shelf_store::{CatalogStore, MemoryCatalog};
use shelf_types::{BookId, ListId};

pub fn make_payload(lists: Vec<ImportedList>) -> ImportPayload {
    ImportPayload {
        version: 3,
        exported_at: Utc::now(),
        lists,
    }
}

pub fn make_ilist(name: &str, books: Vec<ImportedBook>) -> ImportedList {
    ImportedList {
        id: format!("export-{name}"),
        name: name.to_string(),
        description: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        books,
    }
}

pub fn make_ibook(isbn: &str, title: &str, author: &str) -> ImportedBook {
    ImportedBook {
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        publisher: String::new(),
        publish_date: String::new(),
        cover_url: String::new(),
        comment: String::new(),
        added_at: Utc::now(),
    }
}

pub async fn seed_book(store: &MemoryCatalog, isbn: &str, title: &str, author: &str) -> BookId {
    let mut book = Book::new(BookId::new(), title, author);
    book.isbn = isbn.to_string();
    let id = book.id;
    store.create_book(book).await.unwrap();
    id
}

pub async fn seed_list(store: &MemoryCatalog, name: &str) -> ListId {
    store.create_list(name, "").await.unwrap()
}
