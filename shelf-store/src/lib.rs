//! Catalog store seam for Shelf.
//!
//! The import engine never talks to persistent storage directly; it goes
//! through the [`CatalogStore`] trait, which captures exactly the surface
//! the engine needs: book CRUD with partial field patches, list CRUD,
//! membership management, and a low-level full-record list write used only
//! by snapshot restore.
//!
//! [`MemoryCatalog`] is the in-process implementation backing the desktop
//! app shell and every test in this workspace. Every operation is an await
//! point; nothing in this crate provides locking or transactions across
//! calls — a sequence of store calls is not atomic.

mod catalog;
mod error;
mod memory;

pub use catalog::{BookPatch, CatalogStore};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryCatalog;
