//! Moveset override records: previously recorded resolution decisions,
//! loaded as the predefined layer and persisted back after a session merges
//! in the newly chosen ones.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::{normalize_move_code, normalize_species_id, LoadError};

/// One recorded decision. Fields are independent: a record may override
/// only the fast move, only the charged moves, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRecord {
    pub species_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_move: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charged_moves: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl OverrideRecord {
    pub fn new(species_id: impl Into<String>) -> Self {
        Self {
            species_id: species_id.into(),
            fast_move: None,
            charged_moves: None,
            weight: None,
        }
    }
}

/// The predefined override layer, keyed by normalized species id.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    records: HashMap<String, OverrideRecord>,
}

impl OverrideStore {
    /// Builds the store from already-normalized records. A later record for
    /// the same id replaces the earlier one.
    pub fn from_records(records: Vec<OverrideRecord>) -> Self {
        let mut map = HashMap::new();
        for record in records {
            map.insert(record.species_id.clone(), record);
        }
        Self { records: map }
    }

    pub fn get(&self, species_id: &str) -> Option<&OverrideRecord> {
        self.records.get(species_id)
    }

    /// Weight carried through resolution: the predefined record's weight if
    /// present, else 1. Resolution never alters it.
    pub fn weight(&self, species_id: &str) -> u32 {
        self.get(species_id).and_then(|record| record.weight).unwrap_or(1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Merges newly chosen records over the predefined layer. Overwrite is
    /// per whole record, not per field: a newly chosen record replaces the
    /// predefined record sharing its id entirely. The result is sorted
    /// ascending by species id, ready for persistence.
    pub fn merge(&self, newly_chosen: &HashMap<String, OverrideRecord>) -> Vec<OverrideRecord> {
        let mut merged = self.records.clone();
        for (species_id, record) in newly_chosen {
            merged.insert(species_id.clone(), record.clone());
        }
        let mut records: Vec<OverrideRecord> = merged.into_values().collect();
        records.sort_by(|a, b| a.species_id.cmp(&b.species_id));
        records
    }
}

/// Loads an override file into the predefined layer, normalizing ids and
/// move codes. A missing file is an empty store, not an error.
pub fn load_override_file(path: impl AsRef<Path>) -> Result<OverrideStore, LoadError> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(OverrideStore::default());
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut records: Vec<OverrideRecord> =
        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    for record in &mut records {
        record.species_id = normalize_species_id(&record.species_id);
        if let Some(fast_move) = &mut record.fast_move {
            *fast_move = normalize_move_code(fast_move);
        }
        if let Some(charged_moves) = &mut record.charged_moves {
            for code in charged_moves {
                *code = normalize_move_code(code);
            }
        }
    }

    Ok(OverrideStore::from_records(records))
}

#[derive(Debug)]
pub enum SaveError {
    Serialize(serde_json::Error),
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize overrides: {err}"),
            Self::Write { path, source } => {
                write!(f, "failed to write '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SaveError {}

/// Writes an override file. Callers pass the merged, sorted record list.
pub fn save_override_file(path: impl AsRef<Path>, records: &[OverrideRecord]) -> Result<(), SaveError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SaveError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let serialized = serde_json::to_string_pretty(records).map_err(SaveError::Serialize)?;
    fs::write(path, serialized).map_err(|source| SaveError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_path(name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("cupsmith-{name}-{stamp}.json"))
    }

    fn record(species_id: &str, fast: Option<&str>, charged: Option<&[&str]>) -> OverrideRecord {
        OverrideRecord {
            species_id: species_id.to_string(),
            fast_move: fast.map(str::to_string),
            charged_moves: charged.map(|codes| codes.iter().map(|c| c.to_string()).collect()),
            weight: None,
        }
    }

    #[test]
    fn merge_with_nothing_new_reproduces_predefined_sorted() {
        let store = OverrideStore::from_records(vec![
            record("medicham", Some("COUNTER"), None),
            record("azumarill", None, Some(&["ICE_BEAM", "PLAY_ROUGH"])),
        ]);

        let merged = store.merge(&HashMap::new());
        let ids: Vec<&str> = merged.iter().map(|r| r.species_id.as_str()).collect();
        assert_eq!(ids, vec!["azumarill", "medicham"]);
        assert_eq!(merged[1].fast_move.as_deref(), Some("COUNTER"));
    }

    #[test]
    fn merge_overwrites_whole_records_per_id() {
        let mut old = record("medicham", Some("COUNTER"), Some(&["ICE_PUNCH", "PSYCHIC"]));
        old.weight = Some(4);
        let store = OverrideStore::from_records(vec![old]);

        let mut newly_chosen = HashMap::new();
        newly_chosen.insert(
            "medicham".to_string(),
            record("medicham", Some("PSYCHO_CUT"), None),
        );

        let merged = store.merge(&newly_chosen);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].fast_move.as_deref(), Some("PSYCHO_CUT"));
        assert_eq!(merged[0].charged_moves, None);
        assert_eq!(merged[0].weight, None);
    }

    #[test]
    fn merge_is_idempotent_per_id() {
        let store = OverrideStore::from_records(vec![record("azumarill", Some("BUBBLE"), None)]);
        let mut newly_chosen = HashMap::new();
        newly_chosen.insert(
            "medicham".to_string(),
            record("medicham", Some("PSYCHO_CUT"), None),
        );

        let first = store.merge(&newly_chosen);
        let remerged = OverrideStore::from_records(first.clone()).merge(&newly_chosen);
        assert_eq!(first, remerged);
    }

    #[test]
    fn missing_override_file_is_an_empty_store() {
        let store = load_override_file(unique_temp_path("absent")).expect("missing file is fine");
        assert!(store.is_empty());
    }

    #[test]
    fn loaded_records_are_normalized_and_keyed_by_id() {
        let path = unique_temp_path("overrides");
        fs::write(
            &path,
            r#"[{"speciesId": "Medicham", "fastMove": "psycho_cut", "chargedMoves": ["ice_punch"], "weight": 2}]"#,
        )
        .expect("fixture should be written");

        let store = load_override_file(&path).expect("overrides should load");
        let record = store.get("medicham").expect("record should be keyed by normalized id");
        assert_eq!(record.fast_move.as_deref(), Some("PSYCHO_CUT"));
        assert_eq!(
            record.charged_moves.as_deref(),
            Some(["ICE_PUNCH".to_string()].as_slice())
        );
        assert_eq!(store.weight("medicham"), 2);
        assert_eq!(store.weight("azumarill"), 1);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_creates_parent_directories_and_omits_empty_fields() {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("cupsmith-save-{stamp}"));
        let path = dir.join("great.json");
        let records = vec![record("azumarill", None, Some(&["ICE_BEAM", "PLAY_ROUGH"]))];

        save_override_file(&path, &records).expect("save should succeed");
        let raw = fs::read_to_string(&path).expect("file should exist");
        assert!(raw.contains("\"speciesId\": \"azumarill\""));
        assert!(!raw.contains("fastMove"));
        assert!(!raw.contains("weight"));

        let _ = fs::remove_dir_all(dir);
    }
}
