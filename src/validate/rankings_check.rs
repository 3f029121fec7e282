//! Sanity check for exported CSV rankings against a cup's rules: required
//! species present, forbidden species and moves absent, released shadow
//! forms covered. Display names are correlated to ids through the
//! gamemaster name maps; anything uncorrelatable is skipped with a warning.

use std::collections::BTreeSet;

use crate::data::{
    move_id_set, move_name_index, released_shadow_forms, species_name_index, CsvRankings,
    CupDefinition, MoveEntry, PokemonEntry,
};
use crate::validate::report::{ValidationReport, ValidationSeverity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowCheckMode {
    Off,
    Warn,
    #[default]
    Strict,
}

impl ShadowCheckMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "off" => Some(Self::Off),
            "warn" => Some(Self::Warn),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Strict => "strict",
        }
    }
}

pub fn check_csv_rankings(
    csv: &CsvRankings,
    cup: &CupDefinition,
    pokemon: &[PokemonEntry],
    moves: &[MoveEntry],
    mode: ShadowCheckMode,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let species_names = species_name_index(pokemon);
    let mut ranked: BTreeSet<String> = BTreeSet::new();
    for row in &csv.rows {
        match species_names.get(&row.pokemon) {
            Some(species_id) => {
                ranked.insert(species_id.clone());
            }
            None => report.push(
                ValidationSeverity::Warning,
                "csv",
                format!(
                    "could not correlate Pokemon '{}' to a species id; skipping",
                    row.pokemon
                ),
            ),
        }
    }

    let required: BTreeSet<String> = cup.included_species().into_iter().collect();
    for species_id in required.difference(&ranked) {
        report.push(
            ValidationSeverity::Error,
            "cup.include",
            format!("required species '{species_id}' is missing from the rankings"),
        );
    }

    let forbidden: BTreeSet<String> = cup.excluded_species().into_iter().collect();
    for species_id in forbidden.intersection(&ranked) {
        report.push(
            ValidationSeverity::Error,
            "cup.exclude",
            format!("forbidden species '{species_id}' is present in the rankings"),
        );
    }

    let move_names = move_name_index(moves);
    let mut csv_moves: BTreeSet<String> = BTreeSet::new();
    for row in &csv.rows {
        let cells = row.fast_move.iter().chain(row.charged_moves.iter());
        for cell in cells {
            match move_names.get(cell) {
                Some(move_code) => {
                    csv_moves.insert(move_code.clone());
                }
                None => report.push(
                    ValidationSeverity::Warning,
                    "csv",
                    format!("could not correlate move '{cell}' to a move id; skipping"),
                ),
            }
        }
    }

    let known_moves = move_id_set(moves);
    let banned: BTreeSet<String> = cup.excluded_moves().into_iter().collect();
    for move_code in &banned {
        if !known_moves.contains(move_code) {
            // A ban naming a move the gamemaster does not know leaves the
            // intended move legal in the rankings.
            report.push(
                ValidationSeverity::Error,
                "cup.exclude.moves",
                format!("unknown move '{move_code}'"),
            );
        }
    }
    for move_code in banned.intersection(&csv_moves) {
        report.push(
            ValidationSeverity::Error,
            "cup.exclude.moves",
            format!("forbidden move '{move_code}' is present in the rankings"),
        );
    }

    if mode != ShadowCheckMode::Off {
        let severity = match mode {
            ShadowCheckMode::Strict => ValidationSeverity::Error,
            _ => ValidationSeverity::Warning,
        };
        let released_shadows = released_shadow_forms(pokemon);
        for species_id in &ranked {
            if species_id.ends_with("_shadow") {
                continue;
            }
            let shadow_form = format!("{species_id}_shadow");
            if released_shadows.contains(&shadow_form) && !ranked.contains(&shadow_form) {
                report.push(
                    severity,
                    "shadows",
                    format!("released shadow form '{shadow_form}' is missing from the rankings"),
                );
            }
        }
    }

    report
}
