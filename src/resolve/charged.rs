//! Charged-move resolution: a full predefined override wins outright when
//! clean, otherwise each preferred slot is resolved in order with
//! duplicate-avoidance across slots.

use crate::data::{CupRuleSet, MoveCatalog};
use crate::resolve::prompt::{ChoiceContext, Disambiguator, MoveSlot};
use crate::resolve::{ResolutionContext, ResolveError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargedResolution {
    pub final_moves: Vec<String>,
    pub newly_chosen: bool,
    pub warnings: Vec<String>,
}

/// Resolves one entity's preferred charged moves into a non-banned,
/// duplicate-free final set. A slot with no usable replacement is dropped,
/// so the result can be shorter than the preference list.
pub fn resolve_charged(
    species_id: &str,
    preferred: &[String],
    rules: &CupRuleSet,
    catalog: &MoveCatalog,
    context: &mut ResolutionContext,
    disambiguator: &mut dyn Disambiguator,
) -> Result<ChargedResolution, ResolveError> {
    let mut warnings = Vec::new();

    // A full predefined override replaces the preference list wholesale,
    // but only when none of its members are banned. A tainted override is
    // discarded and resolution restarts from the original preferences.
    let predefined_charged = context
        .predefined(species_id)
        .and_then(|record| record.charged_moves.clone());
    if let Some(overridden) = predefined_charged {
        if overridden.iter().all(|code| !rules.is_banned(code)) {
            return Ok(ChargedResolution {
                final_moves: overridden,
                newly_chosen: false,
                warnings,
            });
        }
        warnings.push(format!(
            "{species_id}: predefined charged moves contain a banned move; ignoring the override"
        ));
    }

    let mut accepted: Vec<String> = Vec::new();
    for preferred_move in preferred {
        if !rules.is_banned(preferred_move) && !accepted.contains(preferred_move) {
            accepted.push(preferred_move.clone());
            continue;
        }

        let entry = catalog
            .lookup(species_id)
            .ok_or_else(|| ResolveError::CatalogMiss {
                species_id: species_id.to_string(),
            })?;
        let alternatives: Vec<String> = entry
            .charged_moves
            .iter()
            .filter(|code| !rules.is_banned(code) && !accepted.contains(code))
            .cloned()
            .collect();

        match alternatives.as_slice() {
            [] => warnings.push(format!(
                "{species_id}: no usable replacement for charged move '{preferred_move}'; dropping the slot"
            )),
            [only] => accepted.push(only.clone()),
            _ => {
                let choice_context = ChoiceContext {
                    species_id,
                    banned_move: preferred_move,
                    slot: MoveSlot::Charged,
                };
                let index = disambiguator.choose(&choice_context, &alternatives)?;
                let chosen = alternatives
                    .get(index)
                    .cloned()
                    .ok_or(ResolveError::Aborted)?;
                accepted.push(chosen);
            }
        }
    }

    let newly_chosen = accepted.as_slice() != preferred;
    if newly_chosen {
        context.record_charged(species_id, accepted.clone());
    }

    Ok(ChargedResolution {
        final_moves: accepted,
        newly_chosen,
        warnings,
    })
}
