//! Export payload parsing and validation.
//!
//! Decodes the raw export text into a typed [`ImportPayload`], rejecting
//! malformed JSON, files that are not export files, and unsupported schema
//! versions. Parsing has no side effects; the payload is immutable input
//! for every downstream step.

use crate::error::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_model::identity_key;

/// Oldest export schema version this engine accepts.
pub const MIN_SUPPORTED_VERSION: u64 = 2;
/// Newest export schema version this engine accepts.
pub const MAX_SUPPORTED_VERSION: u64 = 3;

/// A parsed export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    pub version: u64,
    pub exported_at: DateTime<Utc>,
    pub lists: Vec<ImportedList>,
}

/// One exported list. The `id` is the exporter's id and never reused on
/// this side; lists created by an import always get fresh ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub books: Vec<ImportedBook>,
}

/// One exported book together with its membership comment.
///
/// Carries only the public subset of book fields — the exporter strips
/// private notes and recommendations by contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub comment: String,
    pub added_at: DateTime<Utc>,
}

impl ImportedBook {
    /// The deduplication key for this imported book. Same derivation as
    /// [`shelf_model::identity_key`].
    #[must_use]
    pub fn identity_key(&self) -> String {
        identity_key(&self.isbn, &self.title, &self.author)
    }
}

/// Parses raw export text into a typed payload.
///
/// Validation runs in three stages: JSON decode, top-level structure
/// (`version`, `exportedAt`, `lists` must be present with the right
/// shapes), then the supported version range. Each stage maps to its own
/// [`ParseError`] variant so the UI can tell the user what is wrong with
/// the file.
pub fn parse_import_file(text: &str) -> Result<ImportPayload, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let obj = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidStructure("export must be a JSON object".into()))?;

    let version = obj
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| ParseError::InvalidStructure("missing integer field: version".into()))?;
    if !obj.contains_key("exportedAt") {
        return Err(ParseError::InvalidStructure(
            "missing field: exportedAt".into(),
        ));
    }
    if !obj.get("lists").is_some_and(serde_json::Value::is_array) {
        return Err(ParseError::InvalidStructure(
            "missing array field: lists".into(),
        ));
    }

    if !(MIN_SUPPORTED_VERSION..=MAX_SUPPORTED_VERSION).contains(&version) {
        return Err(ParseError::UnsupportedVersion(version));
    }

    serde_json::from_value(value).map_err(|e| ParseError::InvalidStructure(e.to_string()))
}
