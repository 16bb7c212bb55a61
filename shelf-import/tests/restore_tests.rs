mod common;

use common::{make_ibook, make_ilist, make_payload, seed_book, seed_list};
use pretty_assertions::assert_eq;
use shelf_import::{
    create_snapshot, execute_import, restore_snapshot, BookAction, CommentMerge, FieldMerge,
    ImportStrategy, ListAction,
};
use shelf_store::{BookPatch, CatalogStore, MemoryCatalog};
use std::collections::HashMap;

fn strategy(list: ListAction, book: BookAction, field: FieldMerge) -> ImportStrategy {
    ImportStrategy {
        default_list_action: list,
        default_book_action: book,
        default_comment_merge: CommentMerge::Both,
        default_field_merge: field,
        list_overrides: HashMap::new(),
        book_resolutions: HashMap::new(),
    }
}

// ── Created entities ──────────────────────────────────────────────

#[tokio::test]
async fn restore_after_rename_removes_everything_created() {
    let store = MemoryCatalog::new();
    seed_list(&store, "Reading").await;
    seed_book(&store, "999", "Existing", "Author").await;
    let books_before = store.book_count().await;
    let lists_before = store.list_count().await;

    let payload = make_payload(vec![make_ilist(
        "Reading",
        vec![
            make_ibook("111", "Dune", "Herbert"),
            make_ibook("", "Hyperion", "Simmons"),
        ],
    )]);
    let s = strategy(ListAction::Rename, BookAction::Merge, FieldMerge::NonEmpty);

    let snapshot = create_snapshot(&payload, &s, &store).await.unwrap();
    let result = execute_import(&payload, &s, snapshot, &store).await;
    assert!(result.success);
    assert_eq!(store.book_count().await, books_before + 2);
    assert_eq!(store.list_count().await, lists_before + 1);

    restore_snapshot(result.snapshot, &store).await.unwrap();

    assert_eq!(store.book_count().await, books_before);
    assert_eq!(store.list_count().await, lists_before);
    assert!(store
        .list_lists()
        .await
        .unwrap()
        .iter()
        .all(|l| l.name != "Reading (2)"));
}

// ── Merged-into lists ─────────────────────────────────────────────

#[tokio::test]
async fn restore_after_merge_reinstates_exact_membership() {
    let store = MemoryCatalog::new();
    let first = seed_book(&store, "aaa", "First", "A").await;
    let second = seed_book(&store, "bbb", "Second", "B").await;
    let list_id = seed_list(&store, "Reading").await;
    store.add_book_to_list(list_id, first, "one").await.unwrap();
    store.add_book_to_list(list_id, second, "two").await.unwrap();
    let prior = store.get_list(list_id).await.unwrap().unwrap();

    let mut ibook = make_ibook("aaa", "First", "A");
    ibook.comment = "imported note".to_string();
    let payload = make_payload(vec![make_ilist(
        "Reading",
        vec![ibook, make_ibook("ccc", "Third", "C")],
    )]);
    let s = strategy(ListAction::Merge, BookAction::Merge, FieldMerge::NonEmpty);

    let snapshot = create_snapshot(&payload, &s, &store).await.unwrap();
    let result = execute_import(&payload, &s, snapshot, &store).await;
    assert!(result.success);
    // Sanity: membership and comment changed during the import.
    let merged = store.get_list(list_id).await.unwrap().unwrap();
    assert_eq!(merged.entries.len(), 3);
    assert_eq!(merged.entry(first).unwrap().comment, "one\n\nimported note");

    restore_snapshot(result.snapshot, &store).await.unwrap();

    let restored = store.get_list(list_id).await.unwrap().unwrap();
    assert_eq!(restored.entries, prior.entries);
}

// ── Replaced lists ────────────────────────────────────────────────

#[tokio::test]
async fn restore_after_replace_reinstates_full_record() {
    let store = MemoryCatalog::new();
    let book_id = seed_book(&store, "111", "Dune", "Herbert").await;
    let list_id = store.create_list("Reading", "my description").await.unwrap();
    store
        .add_book_to_list(list_id, book_id, "halfway")
        .await
        .unwrap();
    let prior = store.get_list(list_id).await.unwrap().unwrap();

    let payload = make_payload(vec![make_ilist("Reading", vec![])]);
    let s = strategy(ListAction::Replace, BookAction::Merge, FieldMerge::NonEmpty);

    let snapshot = create_snapshot(&payload, &s, &store).await.unwrap();
    let result = execute_import(&payload, &s, snapshot, &store).await;
    assert!(result.success);
    assert!(store.get_list(list_id).await.unwrap().is_none());

    restore_snapshot(result.snapshot, &store).await.unwrap();

    let restored = store.get_list(list_id).await.unwrap().unwrap();
    assert_eq!(restored, prior);
    assert_eq!(store.list_count().await, 1);
}

// ── Merged books ──────────────────────────────────────────────────

#[tokio::test]
async fn restore_patches_back_prior_field_values() {
    let store = MemoryCatalog::new();
    let id = seed_book(&store, "111", "Dune", "Herbert").await;

    let mut ibook = make_ibook("111", "Dune", "Herbert");
    ibook.publisher = "Ace".to_string();
    ibook.publish_date = "1965".to_string();
    let payload = make_payload(vec![make_ilist("L", vec![ibook])]);
    let s = strategy(ListAction::Rename, BookAction::Merge, FieldMerge::Import);

    let snapshot = create_snapshot(&payload, &s, &store).await.unwrap();
    let result = execute_import(&payload, &s, snapshot, &store).await;
    assert!(result.success);
    assert_eq!(
        store.get_book(id).await.unwrap().unwrap().publisher,
        "Ace"
    );

    restore_snapshot(result.snapshot, &store).await.unwrap();

    let restored = store.get_book(id).await.unwrap().unwrap();
    assert_eq!(restored.publisher, "");
    assert_eq!(restored.publish_date, "");
    assert_eq!(restored.isbn, "111");
}

#[tokio::test]
async fn restore_is_a_targeted_patch_not_an_overwrite() {
    // A post-import edit to a field the import never touched survives
    // the undo.
    let store = MemoryCatalog::new();
    let id = seed_book(&store, "111", "Dune", "Herbert").await;

    let mut ibook = make_ibook("111", "Dune", "Herbert");
    ibook.publisher = "Ace".to_string();
    let payload = make_payload(vec![make_ilist("L", vec![ibook])]);
    let s = strategy(ListAction::Rename, BookAction::Merge, FieldMerge::Import);

    let snapshot = create_snapshot(&payload, &s, &store).await.unwrap();
    let result = execute_import(&payload, &s, snapshot, &store).await;
    assert!(result.success);

    // User edit after the import, before the undo.
    store
        .update_book_fields(
            id,
            BookPatch {
                cover_url: Some("https://covers.example/mine.jpg".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    restore_snapshot(result.snapshot, &store).await.unwrap();

    let restored = store.get_book(id).await.unwrap().unwrap();
    assert_eq!(restored.publisher, "");
    // The import never patched the cover, so the undo leaves the user's
    // edit in place.
    assert_eq!(restored.cover_url, "https://covers.example/mine.jpg");
}

// ── Empty snapshot ────────────────────────────────────────────────

#[tokio::test]
async fn restoring_an_empty_snapshot_is_a_noop() {
    let store = MemoryCatalog::new();
    seed_book(&store, "111", "Dune", "Herbert").await;
    let before = store.list_books().await.unwrap();

    restore_snapshot(Default::default(), &store).await.unwrap();

    assert_eq!(store.list_books().await.unwrap(), before);
}
