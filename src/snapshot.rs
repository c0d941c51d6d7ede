// 💾 Snapshot Codec - portable backup of tickets + dictionary
//
// Export serializes the full state to one JSON document; import validates
// it before anything touches the stores. Both top-level collections are
// required — a dictionary-only or tickets-only file is rejected outright,
// never partially imported. Applying an accepted snapshot to the stores
// is the pipeline's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::{Dictionary, Ticket};

/// Schema identifier stamped on every export.
pub const SCHEMA_ID: &str = "gastoscan-backup-v1";

// ============================================================================
// DOCUMENT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tickets: Vec<Ticket>,
    pub dictionary: Dictionary,
    pub exported_at: DateTime<Utc>,
    /// Exports from before the schema id existed default to the current
    /// one on read.
    #[serde(default = "default_schema_id")]
    pub schema_id: String,
}

fn default_schema_id() -> String {
    SCHEMA_ID.to_string()
}

/// Capture the current state pair as an exportable document.
pub fn export_snapshot(tickets: &[Ticket], dictionary: &Dictionary) -> Snapshot {
    Snapshot {
        tickets: tickets.to_vec(),
        dictionary: dictionary.clone(),
        exported_at: Utc::now(),
        schema_id: SCHEMA_ID.to_string(),
    }
}

// ============================================================================
// CODEC
// ============================================================================

pub fn encode(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| EngineError::SnapshotFormat(e.to_string()))
}

/// Parse and validate a portable snapshot document.
///
/// The `tickets` and `dictionary` keys must both be present before we
/// even try to deserialize the full shape, so the error names the missing
/// collection rather than whatever serde trips over first.
pub fn decode(text: &str) -> Result<Snapshot> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| EngineError::SnapshotFormat(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| EngineError::SnapshotFormat("not a JSON object".to_string()))?;
    for key in ["tickets", "dictionary"] {
        if !object.contains_key(key) {
            return Err(EngineError::SnapshotFormat(format!("missing `{key}` key")));
        }
    }

    serde_json::from_value(value).map_err(|e| EngineError::SnapshotFormat(e.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
