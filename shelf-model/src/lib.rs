//! Domain model for the Shelf catalog.
//!
//! Defines the types that the store and the import engine both depend on:
//! - [`Book`] — a catalog row with identity attributes and mutable metadata
//! - [`BookList`] — a named, ordered collection of membership entries
//! - [`ListEntry`] — one list membership (book id, comment, added-at stamp)
//! - [`identity_key`] — the deduplication key derivation shared by conflict
//!   detection, strategy validation, and import execution
//!
//! The identity key must be computed identically everywhere a book is
//! matched; keeping the derivation in one place is what guarantees that.

mod book;
mod list;

pub use book::{identity_key, Book, ReadingStatus};
pub use list::{BookList, ListEntry};
