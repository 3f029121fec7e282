//! Cross-reference check: every species a cup mentions must exist in the
//! gamemaster. Unknown banned moves are flagged too when a move list is
//! available, as a cup configuration warning rather than a failure.

use std::collections::BTreeSet;

use crate::data::{move_id_set, species_id_set, CupDefinition, GameMaster};
use crate::validate::report::{ValidationReport, ValidationSeverity};

pub fn validate_cup_references(cup: &CupDefinition, gamemaster: &GameMaster) -> ValidationReport {
    let mut report = ValidationReport::default();

    let known_species = species_id_set(&gamemaster.pokemon);
    let mentioned: BTreeSet<String> = cup
        .included_species()
        .into_iter()
        .chain(cup.excluded_species())
        .collect();
    for species_id in &mentioned {
        if !known_species.contains(species_id) {
            report.push(
                ValidationSeverity::Error,
                "cup.species",
                format!("unknown species '{species_id}'"),
            );
        }
    }

    if !gamemaster.moves.is_empty() {
        let known_moves = move_id_set(&gamemaster.moves);
        let banned: BTreeSet<String> = cup.excluded_moves().into_iter().collect();
        for move_code in &banned {
            if !known_moves.contains(move_code) {
                report.push(
                    ValidationSeverity::Warning,
                    "cup.exclude.moves",
                    format!("unknown move '{move_code}'"),
                );
            }
        }
    }

    report
}
