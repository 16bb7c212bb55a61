//! Import reconciliation engine for Shelf.
//!
//! Merges an externally produced export of book lists into the local
//! catalog without corrupting existing data. The flow, each step an
//! explicit operation the UI drives:
//!
//! 1. [`parse_import_file`] — decode and validate the export text
//! 2. [`detect_conflicts`] — read-only comparison against the catalog
//! 3. caller builds an [`ImportStrategy`]; [`unresolved_conflicts`] must
//!    reach zero before execution under detailed field merge
//! 4. [`create_snapshot`] — capture the pre-import state
//! 5. [`execute_import`] — apply, finalizing the snapshot as it goes
//! 6. [`restore_snapshot`] — optional, undoes the whole run
//!
//! There are no transactions underneath: execution halts on the first
//! store error and the returned snapshot remains the only (and complete)
//! unwind mechanism. Detection and snapshot capture are read-only and
//! safely repeatable; execution and restore are not.

mod conflicts;
mod error;
mod executor;
mod payload;
mod restore;
mod snapshot;
mod strategy;

pub use conflicts::{
    alternate_name, detect_conflicts, BookConflict, ConflictReport, ListNameConflict, MatchKind,
};
pub use error::{EngineResult, ImportError, ParseError};
pub use executor::{execute_import, ImportCounts, ImportResult};
pub use payload::{
    parse_import_file, ImportPayload, ImportedBook, ImportedList, MAX_SUPPORTED_VERSION,
    MIN_SUPPORTED_VERSION,
};
pub use restore::restore_snapshot;
pub use snapshot::{create_snapshot, ImportSnapshot, ModifiedBook, ModifiedList};
pub use strategy::{
    unresolved_conflicts, BookAction, BookField, BookResolution, CommentMerge, FieldChoice,
    FieldMerge, ImportStrategy, ListAction,
};
