//! Snapshot-based undo.
//!
//! Consumes an [`ImportSnapshot`] and returns the catalog to its
//! pre-import state: created entities are deleted, replaced lists are
//! reinstated verbatim, merged-into memberships are swapped back, and
//! merged books get their prior field values patched back. Targeted
//! patches mean local edits made after the import to fields the import
//! never touched survive the undo.

use crate::error::EngineResult;
use crate::snapshot::ImportSnapshot;
use shelf_store::CatalogStore;
use tracing::{debug, warn};

/// Restores the catalog from a snapshot.
///
/// Must be invoked at most once per snapshot, against the same store the
/// import ran on; the snapshot is consumed. Behavior of a second
/// invocation is unspecified.
pub async fn restore_snapshot(
    snapshot: ImportSnapshot,
    store: &dyn CatalogStore,
) -> EngineResult<()> {
    for id in &snapshot.added_book_ids {
        // Deletion also drops the book from any list membership.
        store.delete_book(*id).await?;
    }
    debug!(count = snapshot.added_book_ids.len(), "deleted imported books");

    for id in &snapshot.added_list_ids {
        store.delete_list(*id).await?;
    }
    debug!(count = snapshot.added_list_ids.len(), "deleted imported lists");

    for list in snapshot.replaced_lists {
        debug!(list_id = %list.id, name = %list.name, "reinstating replaced list");
        store.put_list(list).await?;
    }

    for modified in snapshot.modified_lists {
        match store.get_list(modified.list_id).await? {
            Some(mut current) => {
                current.entries = modified.entries;
                store.put_list(current).await?;
            }
            None => {
                warn!(list_id = %modified.list_id, "merged-into list no longer exists; skipping membership restore");
            }
        }
    }

    for modified in snapshot.modified_books {
        store
            .update_book_fields(modified.book_id, modified.fields)
            .await?;
    }

    Ok(())
}
