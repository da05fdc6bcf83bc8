//! Document version migration
//!
//! Persisted songs carry a schema version under `version` (or the legacy `v`).
//! Upgraders are pure functions over raw JSON, each lifting a document exactly one
//! version; they are chained until the document reaches [`CURRENT_VERSION`].

use serde_json::{Map, Value};

use crate::error::MigrationError;
use crate::models::{retag_barlines, Song, CURRENT_VERSION};

type Upgrader = fn(Map<String, Value>) -> Result<Map<String, Value>, MigrationError>;

/// Upgraders keyed by the version they upgrade from
const UPGRADERS: &[(u32, Upgrader)] = &[(1, v1_to_v2)];

/// The signature overlay used to be called `between`
fn v1_to_v2(mut song: Map<String, Value>) -> Result<Map<String, Value>, MigrationError> {
    let global = song
        .get_mut("global")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| MigrationError::Malformed("missing global section".to_string()))?;

    if let Some(between) = global.remove("between") {
        global.insert("signatures".to_string(), between);
    }
    Ok(song)
}

/// Read the schema version tag of a raw document
pub fn document_version(raw: &Value) -> Result<u32, MigrationError> {
    let tag = raw
        .get("version")
        .or_else(|| raw.get("v"))
        .ok_or(MigrationError::MissingVersion)?;

    let version = match tag {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) if s == "0.1.0" => Some(1),
        Value::String(s) => s.parse::<u32>().ok(),
        _ => None,
    };

    match version {
        Some(v) if (1..=CURRENT_VERSION).contains(&v) => Ok(v),
        _ => Err(MigrationError::UnsupportedVersion(tag.to_string())),
    }
}

/// Run the upgrade chain on a raw document, leaving it tagged with the current version
pub fn upgrade(raw: Value) -> Result<Value, MigrationError> {
    let mut version = document_version(&raw)?;
    let Value::Object(mut song) = raw else {
        return Err(MigrationError::Malformed("document is not an object".to_string()));
    };

    while version < CURRENT_VERSION {
        let (_, upgrader) = UPGRADERS
            .iter()
            .find(|(from, _)| *from == version)
            .ok_or_else(|| MigrationError::UnsupportedVersion(version.to_string()))?;
        song = upgrader(song)?;
        version += 1;
        log::debug!("upgraded document to version {}", version);
    }

    song.remove("v");
    song.insert("version".to_string(), Value::from(CURRENT_VERSION));
    Ok(Value::Object(song))
}

/// Bring a persisted song of any supported version up to date
///
/// Notes are re-sorted by start time and barlines re-derived, so a hand-edited
/// document still satisfies the model's invariants.
pub fn migrate(raw: Value) -> Result<Song, MigrationError> {
    let mut song: Song = serde_json::from_value(upgrade(raw)?)
        .map_err(|e| MigrationError::Malformed(e.to_string()))?;

    if song.part.bars.is_empty() {
        return Err(MigrationError::Malformed("song has no bars".to_string()));
    }
    for bar in &mut song.part.bars {
        bar.notes.sort_by_key(|note| note.start_time);
    }
    retag_barlines(&mut song.part.bars);
    Ok(song)
}

pub fn migrate_str(json: &str) -> Result<Song, MigrationError> {
    migrate(serde_json::from_str(json)?)
}
