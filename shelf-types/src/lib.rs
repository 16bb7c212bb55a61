//! Core type definitions for Shelf.
//!
//! Defines the identifier newtypes ([`BookId`], [`ListId`]) used
//! throughout the catalog engine. Domain types (books, lists, import
//! payloads) live in `shelf-model` and `shelf-import`, not here.

mod ids;

pub use ids::{BookId, ListId};
