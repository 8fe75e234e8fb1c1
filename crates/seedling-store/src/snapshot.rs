//! The persisted state document.
//!
//! The whole [`AppState`] is stored as one JSON blob under a single key.
//! Loading never fails: an absent key yields the empty state, and a blob
//! that cannot be read is logged and replaced by the empty state. Older
//! documents are upgraded in place by the ordered steps in [`MIGRATIONS`]
//! before decoding.

use seedling_api::{AppState, COLLECTION_THRESHOLD, CURRENT_SCHEMA_VERSION, MAX_FAMILIARITY, MAX_STREAK_LEVEL};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{PersistenceBackend, StoreError, StoreResult};

/// Version assumed for documents written before versioning existed
const LEGACY_SCHEMA_VERSION: u32 = 1;

type Migration = fn(&mut Map<String, Value>);

/// Upgrade steps, keyed by the version they produce, in ascending order
pub const MIGRATIONS: &[(u32, Migration)] = &[(2, ensure_water_claims)];

/// v2 added per-day water claims to the garden
fn ensure_water_claims(doc: &mut Map<String, Value>) {
    let Some(Value::Object(garden)) = doc.get_mut("garden") else {
        return;
    };
    if !matches!(garden.get("waterClaims"), Some(Value::Array(_))) {
        garden.insert("waterClaims".into(), Value::Array(Vec::new()));
    }
}

/// Load the state stored under `key`, falling back to the empty state
pub fn load_state(backend: &dyn PersistenceBackend, key: &str) -> AppState {
    match try_load_state(backend, key) {
        Ok(Some(state)) => state,
        Ok(None) => {
            debug!(key, "No stored state, starting empty");
            AppState::default()
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to load stored state, starting empty");
            AppState::default()
        }
    }
}

/// Load the state stored under `key`; `Ok(None)` when nothing is stored
pub fn try_load_state(backend: &dyn PersistenceBackend, key: &str) -> StoreResult<Option<AppState>> {
    match backend.get(key)? {
        Some(bytes) => decode_state(&bytes).map(Some),
        None => Ok(None),
    }
}

/// Decode a stored document, migrating and repairing it as needed
pub fn decode_state(bytes: &[u8]) -> StoreResult<AppState> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(mut doc) = value else {
        return Err(StoreError::Serialization(
            "stored state is not a JSON object".into(),
        ));
    };

    let stored_version = doc
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .map(|v| v.min(u32::MAX as u64) as u32)
        .unwrap_or(LEGACY_SCHEMA_VERSION);

    if stored_version > CURRENT_SCHEMA_VERSION {
        warn!(
            stored_version,
            current = CURRENT_SCHEMA_VERSION,
            "Stored state is newer than this build, reading what is understood"
        );
    }

    for (target, migrate) in MIGRATIONS {
        if *target > stored_version {
            migrate(&mut doc);
        }
    }

    if stored_version < CURRENT_SCHEMA_VERSION {
        info!(
            from = stored_version,
            to = CURRENT_SCHEMA_VERSION,
            "Migrated stored state"
        );
    }

    doc.insert("schemaVersion".into(), Value::from(CURRENT_SCHEMA_VERSION));
    fill_garden_defaults(&mut doc);
    clamp_item_levels(&mut doc);

    let mut state: AppState = serde_json::from_value(Value::Object(doc))?;
    settle_water_level(&mut state);
    Ok(state)
}

/// Serialize the full document
pub fn encode_state(state: &AppState) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(state)?)
}

/// Write the full document under `key`
pub fn save_state(backend: &dyn PersistenceBackend, key: &str, state: &AppState) -> StoreResult<()> {
    let bytes = encode_state(state)?;
    backend.put(key, &bytes)?;
    debug!(key, items = state.items.len(), "State saved");
    Ok(())
}

fn fill_garden_defaults(doc: &mut Map<String, Value>) {
    let Some(Value::Object(garden)) = doc.get_mut("garden") else {
        return;
    };
    for field in ["waterLevel", "collectedCount"] {
        garden.entry(field).or_insert_with(|| Value::from(0u32));
    }
}

fn clamp_item_levels(doc: &mut Map<String, Value>) {
    let Some(Value::Array(items)) = doc.get_mut("items") else {
        return;
    };
    for item in items.iter_mut().filter_map(Value::as_object_mut) {
        clamp_field(item, "streakLevel", MAX_STREAK_LEVEL);
        clamp_field(item, "familiarity", MAX_FAMILIARITY);
    }
}

fn clamp_field(item: &mut Map<String, Value>, field: &str, max: u8) {
    let Some(raw) = item.get(field).and_then(Value::as_f64) else {
        return;
    };
    let clamped = raw.clamp(0.0, max as f64) as u8;
    if raw != clamped as f64 {
        warn!(field, raw, clamped, "Repaired out-of-range item level");
        item.insert(field.into(), Value::from(clamped));
    }
}

/// Turn any overflowing water into collected plants
fn settle_water_level(state: &mut AppState) {
    let garden = &mut state.garden;
    if garden.water_level >= COLLECTION_THRESHOLD {
        garden.collected_count = garden
            .collected_count
            .saturating_add(garden.water_level / COLLECTION_THRESHOLD);
        garden.water_level %= COLLECTION_THRESHOLD;
    }
}
