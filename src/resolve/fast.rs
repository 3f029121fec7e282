//! Fast-move resolution: turn one preferred fast move into a non-banned
//! final choice, deterministically where possible.

use crate::data::{CupRuleSet, MoveCatalog};
use crate::resolve::prompt::{ChoiceContext, Disambiguator, MoveSlot};
use crate::resolve::{ResolutionContext, ResolveError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastResolution {
    pub final_move: String,
    pub newly_chosen: bool,
    pub warnings: Vec<String>,
}

/// Resolution ladder: keep a legal preference, else auto-select a lone
/// alternative, else an in-range predefined choice, else ask the channel.
/// Alternatives keep the catalog's declared order so menus are stable
/// across runs.
pub fn resolve_fast(
    species_id: &str,
    preferred: &str,
    rules: &CupRuleSet,
    catalog: &MoveCatalog,
    context: &mut ResolutionContext,
    disambiguator: &mut dyn Disambiguator,
) -> Result<FastResolution, ResolveError> {
    if !rules.is_banned(preferred) {
        return Ok(FastResolution {
            final_move: preferred.to_string(),
            newly_chosen: false,
            warnings: Vec::new(),
        });
    }

    let entry = catalog
        .lookup(species_id)
        .ok_or_else(|| ResolveError::CatalogMiss {
            species_id: species_id.to_string(),
        })?;
    let alternatives: Vec<String> = entry
        .fast_moves
        .iter()
        .filter(|code| !rules.is_banned(code))
        .cloned()
        .collect();

    let mut warnings = Vec::new();
    let predefined_fast = context
        .predefined(species_id)
        .and_then(|record| record.fast_move.clone());

    match alternatives.as_slice() {
        [] => Err(ResolveError::NoAlternative {
            species_id: species_id.to_string(),
            banned_move: preferred.to_string(),
        }),
        [only] => {
            let only = only.clone();
            if predefined_fast.as_deref() == Some(only.as_str()) {
                return Ok(FastResolution {
                    final_move: only,
                    newly_chosen: false,
                    warnings,
                });
            }
            if let Some(choice) = predefined_fast {
                warnings.push(format!(
                    "{species_id}: predefined fast move '{choice}' is not usable here; using '{only}'"
                ));
            }
            context.record_fast(species_id, only.clone());
            Ok(FastResolution {
                final_move: only,
                newly_chosen: true,
                warnings,
            })
        }
        _ => {
            if let Some(choice) = predefined_fast {
                if alternatives.iter().any(|code| *code == choice) {
                    return Ok(FastResolution {
                        final_move: choice,
                        newly_chosen: false,
                        warnings,
                    });
                }
                warnings.push(format!(
                    "{species_id}: predefined fast move '{choice}' is not among the valid alternatives"
                ));
            }

            let choice_context = ChoiceContext {
                species_id,
                banned_move: preferred,
                slot: MoveSlot::Fast,
            };
            let index = disambiguator.choose(&choice_context, &alternatives)?;
            let final_move = alternatives
                .get(index)
                .cloned()
                .ok_or(ResolveError::Aborted)?;

            context.record_fast(species_id, final_move.clone());
            Ok(FastResolution {
                final_move,
                newly_chosen: true,
                warnings,
            })
        }
    }
}
