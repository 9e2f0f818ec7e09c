//! The export bundle document.
//!
//! One JSON object carries the whole exportable state: every inventory
//! bucket keyed by date, the predefined catalog, and the opaque config
//! blobs. The shape matches what older builds emitted, so bundles made by
//! them still import.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use stockbook_core::CatalogEntry;

use crate::error::{BackupError, Result};

/// Bundle format version written by exports.
pub const BUNDLE_VERSION: &str = "1.0";

/// Whole-state backup document.
///
/// Every field carries a serde default so partial or older bundles still
/// decode; `version` defaults to the empty string precisely so a missing
/// field is detectable instead of silently assumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    #[serde(default)]
    pub version: String,
    /// RFC 3339 time of the export.
    #[serde(default)]
    pub export_date: String,
    /// Date key (`YYYY-MM-DD`) to raw bucket value. Values are validated
    /// per entry at import time, so one malformed bucket cannot stop the
    /// rest of the bundle from decoding.
    #[serde(default)]
    pub inventory: BTreeMap<String, Value>,
    #[serde(default)]
    pub predefined_items: Vec<CatalogEntry>,
    /// Opaque config blobs, round-tripped verbatim. Absent blobs are
    /// omitted from the JSON and leave stored values untouched on import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_types: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<Value>,
}

impl ExportBundle {
    /// Parse a bundle from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| BackupError::InvalidFormat(e.to_string()))
    }

    /// Render the bundle as pretty-printed JSON for writing to a file.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("bundle serializes to JSON")
    }

    /// Whether the version field is present and non-blank.
    pub fn has_version(&self) -> bool {
        !self.version.trim().is_empty()
    }
}
