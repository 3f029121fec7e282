//! Session orchestration: stream the ranking through the resolvers, collect
//! resolved movesets plus warnings, and sort the output by species id. The
//! orchestrator never prints and never persists; both stay with the caller.

use serde::Serialize;

use crate::data::{CupRuleSet, MoveCatalog, RankingEntry};
use crate::resolve::charged::resolve_charged;
use crate::resolve::fast::resolve_fast;
use crate::resolve::prompt::Disambiguator;
use crate::resolve::{ResolutionContext, ResolveError};

/// The unit of output: one entity's final assignment. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMoveset {
    pub species_id: String,
    pub fast_move: String,
    pub charged_moves: Vec<String>,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub ranked_entries: usize,
    pub eligible_entries: usize,
    pub resolved: usize,
    pub skipped: usize,
    pub decisions_recorded: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub movesets: Vec<ResolvedMoveset>,
    pub report: SessionReport,
}

/// Resolves every eligible ranking entry. Entity-level failures are
/// downgraded to warnings and the entry skipped; only a disambiguation
/// abort ends the session, in which case nothing is returned at all.
pub fn resolve_session(
    rankings: &[RankingEntry],
    rules: &CupRuleSet,
    catalog: &MoveCatalog,
    context: &mut ResolutionContext,
    disambiguator: &mut dyn Disambiguator,
) -> Result<SessionOutcome, ResolveError> {
    let mut movesets = Vec::new();
    let mut report = SessionReport {
        ranked_entries: rankings.len(),
        ..SessionReport::default()
    };

    for entry in rankings {
        if !rules.is_eligible(&entry.species_id) {
            continue;
        }
        report.eligible_entries += 1;

        let Some(preferred_fast) = entry.preferred_fast() else {
            report.skipped += 1;
            report.warnings.push(format!(
                "{}: ranking entry has no moveset; skipping",
                entry.species_id
            ));
            continue;
        };

        let fast = match resolve_fast(
            &entry.species_id,
            preferred_fast,
            rules,
            catalog,
            context,
            disambiguator,
        ) {
            Ok(resolution) => resolution,
            Err(ResolveError::Aborted) => return Err(ResolveError::Aborted),
            Err(err) => {
                report.skipped += 1;
                report.warnings.push(format!("{err}; skipping"));
                continue;
            }
        };
        report.warnings.extend(fast.warnings);

        let charged = match resolve_charged(
            &entry.species_id,
            entry.preferred_charged(),
            rules,
            catalog,
            context,
            disambiguator,
        ) {
            Ok(resolution) => resolution,
            Err(ResolveError::Aborted) => return Err(ResolveError::Aborted),
            Err(err) => {
                report.skipped += 1;
                report.warnings.push(format!("{err}; skipping"));
                continue;
            }
        };
        report.warnings.extend(charged.warnings);

        movesets.push(ResolvedMoveset {
            species_id: entry.species_id.clone(),
            fast_move: fast.final_move,
            charged_moves: charged.final_moves,
            weight: context.weight(&entry.species_id),
        });
        report.resolved += 1;
    }

    movesets.sort_by(|a, b| a.species_id.cmp(&b.species_id));
    report.decisions_recorded = context.newly_chosen().len();

    Ok(SessionOutcome { movesets, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{OverrideRecord, OverrideStore, PokemonEntry};
    use crate::resolve::prompt::ScriptedDisambiguator;

    fn pokemon(species_id: &str, fast: &[&str], charged: &[&str]) -> PokemonEntry {
        PokemonEntry {
            species_id: species_id.to_string(),
            species_name: None,
            fast_moves: fast.iter().map(|code| code.to_string()).collect(),
            charged_moves: charged.iter().map(|code| code.to_string()).collect(),
            released: true,
        }
    }

    fn ranking(species_id: &str, moveset: &[&str]) -> RankingEntry {
        RankingEntry {
            species_id: species_id.to_string(),
            moveset: moveset.iter().map(|code| code.to_string()).collect(),
        }
    }

    fn rules(eligible: &[&str], banned: &[&str]) -> CupRuleSet {
        CupRuleSet {
            eligible: eligible.iter().map(|id| id.to_string()).collect(),
            banned_moves: banned.iter().map(|code| code.to_string()).collect(),
        }
    }

    fn sample_catalog() -> MoveCatalog {
        MoveCatalog::from_pokemon(&[
            pokemon(
                "medicham",
                &["COUNTER", "PSYCHO_CUT"],
                &["ICE_PUNCH", "PSYCHIC", "POWER_UP_PUNCH"],
            ),
            pokemon(
                "azumarill",
                &["BUBBLE", "ROCK_SMASH"],
                &["ICE_BEAM", "HYDRO_PUMP", "PLAY_ROUGH"],
            ),
        ])
    }

    #[test]
    fn output_is_sorted_by_species_id_regardless_of_ranking_order() {
        let rankings = vec![
            ranking("medicham", &["COUNTER", "ICE_PUNCH", "PSYCHIC"]),
            ranking("azumarill", &["BUBBLE", "ICE_BEAM", "PLAY_ROUGH"]),
        ];
        let mut context = ResolutionContext::default();
        let mut channel = ScriptedDisambiguator::default();

        let outcome = resolve_session(
            &rankings,
            &rules(&["medicham", "azumarill"], &[]),
            &sample_catalog(),
            &mut context,
            &mut channel,
        )
        .expect("session should resolve");

        let ids: Vec<&str> = outcome
            .movesets
            .iter()
            .map(|m| m.species_id.as_str())
            .collect();
        assert_eq!(ids, vec!["azumarill", "medicham"]);
        assert_eq!(outcome.report.resolved, 2);
        assert_eq!(outcome.report.decisions_recorded, 0);
    }

    #[test]
    fn ineligible_entries_are_passed_over_silently() {
        let rankings = vec![
            ranking("medicham", &["COUNTER", "ICE_PUNCH", "PSYCHIC"]),
            ranking("bastiodon", &["SMACK_DOWN", "STONE_EDGE", "FLAMETHROWER"]),
        ];
        let mut context = ResolutionContext::default();
        let mut channel = ScriptedDisambiguator::default();

        let outcome = resolve_session(
            &rankings,
            &rules(&["medicham"], &[]),
            &sample_catalog(),
            &mut context,
            &mut channel,
        )
        .expect("session should resolve");

        assert_eq!(outcome.movesets.len(), 1);
        assert_eq!(outcome.report.ranked_entries, 2);
        assert_eq!(outcome.report.eligible_entries, 1);
        assert!(outcome.report.warnings.is_empty());
    }

    #[test]
    fn catalog_miss_skips_the_entity_and_continues() {
        let rankings = vec![
            ranking("unlisted", &["COUNTER", "ICE_PUNCH", "PSYCHIC"]),
            ranking("azumarill", &["BUBBLE", "ICE_BEAM", "PLAY_ROUGH"]),
        ];
        let mut context = ResolutionContext::default();
        let mut channel = ScriptedDisambiguator::default();

        let outcome = resolve_session(
            &rankings,
            &rules(&["unlisted", "azumarill"], &["COUNTER"]),
            &sample_catalog(),
            &mut context,
            &mut channel,
        )
        .expect("session should continue past the miss");

        assert_eq!(outcome.movesets.len(), 1);
        assert_eq!(outcome.movesets[0].species_id, "azumarill");
        assert_eq!(outcome.report.skipped, 1);
        assert!(outcome.report.warnings[0].contains("unlisted"));
    }

    #[test]
    fn abort_ends_the_session_with_no_output() {
        let rankings = vec![ranking("medicham", &["COUNTER", "ICE_PUNCH", "PSYCHIC"])];
        let mut context = ResolutionContext::default();
        // COUNTER banned, two fast alternatives... but the queue is empty.
        let mut channel = ScriptedDisambiguator::default();
        let catalog = MoveCatalog::from_pokemon(&[pokemon(
            "medicham",
            &["COUNTER", "PSYCHO_CUT", "GRASS_KNOT"],
            &["ICE_PUNCH", "PSYCHIC"],
        )]);

        let err = resolve_session(
            &rankings,
            &rules(&["medicham"], &["COUNTER"]),
            &catalog,
            &mut context,
            &mut channel,
        )
        .expect_err("abort should propagate");

        assert!(matches!(err, ResolveError::Aborted));
    }

    #[test]
    fn weight_is_carried_from_the_predefined_record() {
        let mut record = OverrideRecord::new("medicham");
        record.weight = Some(8);
        let mut context = ResolutionContext::new(OverrideStore::from_records(vec![record]));
        let mut channel = ScriptedDisambiguator::default();

        let rankings = vec![
            ranking("medicham", &["COUNTER", "ICE_PUNCH", "PSYCHIC"]),
            ranking("azumarill", &["BUBBLE", "ICE_BEAM", "PLAY_ROUGH"]),
        ];
        let outcome = resolve_session(
            &rankings,
            &rules(&["medicham", "azumarill"], &[]),
            &sample_catalog(),
            &mut context,
            &mut channel,
        )
        .expect("session should resolve");

        assert_eq!(outcome.movesets[0].weight, 1);
        assert_eq!(outcome.movesets[1].weight, 8);
    }

    #[test]
    fn entry_without_a_moveset_is_skipped_with_a_warning() {
        let rankings = vec![ranking("medicham", &[])];
        let mut context = ResolutionContext::default();
        let mut channel = ScriptedDisambiguator::default();

        let outcome = resolve_session(
            &rankings,
            &rules(&["medicham"], &[]),
            &sample_catalog(),
            &mut context,
            &mut channel,
        )
        .expect("session should resolve");

        assert!(outcome.movesets.is_empty());
        assert_eq!(outcome.report.skipped, 1);
        assert!(outcome.report.warnings[0].contains("no moveset"));
    }

    #[test]
    fn resolved_moveset_serializes_with_wire_field_names() {
        let moveset = ResolvedMoveset {
            species_id: "azumarill".to_string(),
            fast_move: "BUBBLE".to_string(),
            charged_moves: vec!["ICE_BEAM".to_string(), "PLAY_ROUGH".to_string()],
            weight: 1,
        };

        let value = serde_json::to_value(&moveset).expect("moveset should serialize");
        assert_eq!(value["speciesId"], "azumarill");
        assert_eq!(value["fastMove"], "BUBBLE");
        assert_eq!(value["chargedMoves"][1], "PLAY_ROUGH");
        assert_eq!(value["weight"], 1);
    }
}
