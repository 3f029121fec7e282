//! Document models and loaders for the PvPoke source tree: gamemaster,
//! cups, rankings, and moveset override files. All ingestion goes through
//! the normalization helpers here so internal comparisons never re-normalize.

use std::fmt;
use std::io;
use std::path::PathBuf;

pub mod cup;
pub mod gamemaster;
pub mod overrides;
pub mod paths;
pub mod rankings;

pub use cup::{derive_rule_set, load_cup, CupDefinition, CupRuleSet, Exclusion};
pub use gamemaster::{
    load_gamemaster, load_moves_list, load_pokemon_list, move_id_set, move_name_index,
    released_shadow_forms, species_id_set, species_name_index, CatalogEntry, GameMaster,
    MoveCatalog, MoveEntry, PokemonEntry,
};
pub use overrides::{load_override_file, save_override_file, OverrideRecord, OverrideStore};
pub use rankings::{load_csv_rankings, load_rankings, CsvRankingRow, CsvRankings, RankingEntry};

/// Normalize an entity identifier for lookup and storage: trimmed, lower-case.
pub fn normalize_species_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn load_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Normalize a move code: trimmed, upper-case. Ban sets, catalog pools, and
/// override moves all pass through here exactly once, at load time.
pub fn normalize_move_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Failure to read or parse one of the source documents. Fatal to the
/// operation that needed the document; nothing is resolved on top of a
/// missing or malformed input.
#[derive(Debug)]
pub enum LoadError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Csv { path: PathBuf, source: csv::Error },
    Malformed { path: PathBuf, detail: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse JSON '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "failed to read CSV '{}': {source}", path.display())
            }
            Self::Malformed { path, detail } => {
                write!(f, "malformed document '{}': {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}
