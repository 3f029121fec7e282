//! Ranked preference lists: the per-cup JSON rankings that drive moveset
//! resolution, and the CSV rankings exports the sanity check reviews.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::data::{load_json, normalize_move_code, normalize_species_id, LoadError};

pub const CSV_SPECIES_COLUMN: &str = "Pokemon";
const CSV_FAST_COLUMN: &str = "Fast Move";
const CSV_CHARGED_COLUMNS: [&str; 2] = ["Charged Move 1", "Charged Move 2"];

/// One ranked species with its preferred moveset: first element is the
/// fast move, the remainder are charged moves.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub species_id: String,
    #[serde(default)]
    pub moveset: Vec<String>,
}

impl RankingEntry {
    pub fn preferred_fast(&self) -> Option<&str> {
        self.moveset.first().map(String::as_str)
    }

    pub fn preferred_charged(&self) -> &[String] {
        self.moveset.get(1..).unwrap_or(&[])
    }
}

/// Loads a rankings file and normalizes ids and move codes in place, so
/// downstream comparisons never re-normalize.
pub fn load_rankings(path: impl AsRef<Path>) -> Result<Vec<RankingEntry>, LoadError> {
    let mut entries: Vec<RankingEntry> = load_json(path.as_ref())?;
    for entry in &mut entries {
        entry.species_id = normalize_species_id(&entry.species_id);
        for code in &mut entry.moveset {
            *code = normalize_move_code(code);
        }
    }
    Ok(entries)
}

/// One row of a CSV rankings export. Cells hold display names, not ids;
/// correlation to identifiers happens in the sanity check against the
/// gamemaster name maps.
#[derive(Debug, Clone)]
pub struct CsvRankingRow {
    pub pokemon: String,
    pub fast_move: Option<String>,
    pub charged_moves: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CsvRankings {
    pub rows: Vec<CsvRankingRow>,
}

pub fn load_csv_rankings(path: impl AsRef<Path>) -> Result<CsvRankings, LoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let species_column = headers
        .iter()
        .position(|header| header == CSV_SPECIES_COLUMN)
        .ok_or_else(|| LoadError::Malformed {
            path: path.to_path_buf(),
            detail: format!("missing required column '{CSV_SPECIES_COLUMN}'"),
        })?;

    let missing: Vec<&str> = std::iter::once(CSV_FAST_COLUMN)
        .chain(CSV_CHARGED_COLUMNS)
        .filter(|name| !headers.iter().any(|header| header == *name))
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::Malformed {
            path: path.to_path_buf(),
            detail: format!("missing required columns: {}", missing.join(", ")),
        });
    }

    let fast_column = headers.iter().position(|header| header == CSV_FAST_COLUMN);
    let charged_columns: Vec<usize> = CSV_CHARGED_COLUMNS
        .iter()
        .filter_map(|name| headers.iter().position(|header| header == *name))
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let pokemon = record.get(species_column).unwrap_or("").trim().to_string();
        if pokemon.is_empty() {
            continue;
        }

        let fast_move = fast_column
            .and_then(|index| record.get(index))
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string);
        let charged_moves = charged_columns
            .iter()
            .filter_map(|index| record.get(*index))
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect();

        rows.push(CsvRankingRow {
            pokemon,
            fast_move,
            charged_moves,
        });
    }

    Ok(CsvRankings { rows })
}
