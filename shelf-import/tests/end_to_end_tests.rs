//! Full pipeline: parse → detect → validate → snapshot → execute → restore.

mod common;

use common::{seed_book, seed_list};
use pretty_assertions::assert_eq;
use shelf_import::{
    create_snapshot, detect_conflicts, execute_import, parse_import_file, restore_snapshot,
    unresolved_conflicts, BookAction, CommentMerge, FieldMerge, ImportStrategy, ListAction,
    MatchKind,
};
use shelf_store::{BookPatch, CatalogStore, MemoryCatalog};
use std::collections::HashMap;

const EXPORT: &str = r#"{
    "version": 3,
    "exportedAt": "2026-05-10T08:00:00Z",
    "lists": [
        {
            "id": "remote-1",
            "name": "Reading",
            "description": "from my other device",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-05-01T00:00:00Z",
            "books": [
                {
                    "title": "Dune",
                    "author": "Frank Herbert",
                    "isbn": "111",
                    "publisher": "Ace",
                    "addedAt": "2026-02-01T12:00:00Z",
                    "comment": "B"
                }
            ]
        }
    ]
}"#;

#[tokio::test]
async fn rename_merge_non_empty_both_scenario() {
    let store = MemoryCatalog::new();
    let existing_list = seed_list(&store, "Reading").await;
    let existing_book = seed_book(&store, "111", "Dune", "Frank Herbert").await;
    store
        .update_book_fields(
            existing_book,
            BookPatch {
                publisher: Some("Chilton".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let payload = parse_import_file(EXPORT).unwrap();

    let report = detect_conflicts(&payload, &store).await.unwrap();
    assert_eq!(report.list_conflicts.len(), 1);
    assert_eq!(report.list_conflicts[0].suggested_name, "Reading (2)");
    assert_eq!(report.book_conflicts.len(), 1);
    assert_eq!(report.book_conflicts[0].match_kind, MatchKind::Isbn);

    let strategy = ImportStrategy {
        default_list_action: ListAction::Rename,
        default_book_action: BookAction::Merge,
        default_comment_merge: CommentMerge::Both,
        default_field_merge: FieldMerge::NonEmpty,
        list_overrides: HashMap::new(),
        book_resolutions: HashMap::new(),
    };
    assert_eq!(unresolved_conflicts(&strategy, &report), 0);

    let snapshot = create_snapshot(&payload, &strategy, &store).await.unwrap();
    let result = execute_import(&payload, &strategy, snapshot, &store).await;

    assert!(result.success);
    assert_eq!(result.imported.lists, 1);
    assert_eq!(result.imported.books_added, 0);
    assert_eq!(result.imported.books_merged, 1);

    // A new list under the alternate name, the original untouched.
    let names: Vec<String> = store
        .list_lists()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert!(names.contains(&"Reading".to_string()));
    assert!(names.contains(&"Reading (2)".to_string()));

    // No new book row; non-empty publisher kept.
    assert_eq!(store.book_count().await, 1);
    let book = store.get_book(existing_book).await.unwrap().unwrap();
    assert_eq!(book.publisher, "Chilton");

    // The existing book landed in the new list with the imported comment.
    let new_list = store
        .list_lists()
        .await
        .unwrap()
        .into_iter()
        .find(|l| l.name == "Reading (2)")
        .unwrap();
    assert_eq!(new_list.entries.len(), 1);
    assert_eq!(new_list.entries[0].book_id, existing_book);
    assert_eq!(new_list.entries[0].comment, "B");

    // Undo: back to exactly one list and one book.
    restore_snapshot(result.snapshot, &store).await.unwrap();
    assert_eq!(store.list_count().await, 1);
    assert_eq!(store.book_count().await, 1);
    assert!(store.get_list(existing_list).await.unwrap().is_some());
}

#[tokio::test]
async fn detailed_mode_blocks_until_choices_exist() {
    let store = MemoryCatalog::new();
    let existing_book = seed_book(&store, "111", "Dune", "Frank Herbert").await;
    store
        .update_book_fields(
            existing_book,
            BookPatch {
                publisher: Some("Chilton".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let payload = parse_import_file(EXPORT).unwrap();
    let report = detect_conflicts(&payload, &store).await.unwrap();

    let mut strategy = ImportStrategy {
        default_field_merge: FieldMerge::Detailed,
        ..Default::default()
    };

    // Publisher differs (Chilton vs Ace) and carries no choice yet.
    assert_eq!(unresolved_conflicts(&strategy, &report), 1);

    let key = report.book_conflicts[0].key.clone();
    let mut fields = HashMap::new();
    fields.insert(
        shelf_import::BookField::Publisher,
        shelf_import::FieldChoice::Import,
    );
    strategy.book_resolutions.insert(
        key,
        shelf_import::BookResolution {
            fields,
            ..Default::default()
        },
    );

    assert_eq!(unresolved_conflicts(&strategy, &report), 0);

    let snapshot = create_snapshot(&payload, &strategy, &store).await.unwrap();
    let result = execute_import(&payload, &strategy, snapshot, &store).await;
    assert!(result.success);

    let book = store.get_book(existing_book).await.unwrap().unwrap();
    assert_eq!(book.publisher, "Ace");
}
