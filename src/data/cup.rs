//! Cup definitions: include/exclude rules for one event. Exclusion entries
//! arrive in three wire shapes (bare id string, `{"speciesId": ...}` object,
//! `{filterType, values}` rule); they are collapsed into the two-variant
//! domain form while parsing and never re-inspected after that.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::data::{load_json, normalize_move_code, normalize_species_id, LoadError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CupDefinition {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub league: Option<u32>,
    #[serde(default)]
    pub include: Vec<IncludeFilter>,
    #[serde(default, deserialize_with = "deserialize_exclusions")]
    pub exclude: Vec<Exclusion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeFilter {
    #[serde(default)]
    pub filter_type: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// An exclusion rule after parse-time collapse. Values are already
/// normalized: species ids lower-case, move codes upper-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    Species(String),
    Moves(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExclusionWire {
    Species(String),
    SpeciesObject {
        #[serde(rename = "speciesId")]
        species_id: String,
    },
    Rule {
        #[serde(rename = "filterType")]
        filter_type: String,
        #[serde(default)]
        values: Vec<String>,
    },
    // Catch-all so one free-form entry cannot fail the whole cup parse;
    // the payload is deliberately unread.
    #[allow(dead_code)]
    Other(serde_json::Value),
}

fn collapse_exclusion(wire: ExclusionWire) -> Vec<Exclusion> {
    match wire {
        ExclusionWire::Species(id) => vec![Exclusion::Species(normalize_species_id(&id))],
        ExclusionWire::SpeciesObject { species_id } => {
            vec![Exclusion::Species(normalize_species_id(&species_id))]
        }
        ExclusionWire::Rule {
            filter_type,
            values,
        } => match filter_type.as_str() {
            "id" => values
                .iter()
                .map(|id| Exclusion::Species(normalize_species_id(id)))
                .collect(),
            "move" => vec![Exclusion::Moves(
                values.iter().map(|code| normalize_move_code(code)).collect(),
            )],
            _ => Vec::new(),
        },
        ExclusionWire::Other(_) => Vec::new(),
    }
}

fn deserialize_exclusions<'de, D>(deserializer: D) -> Result<Vec<Exclusion>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire: Vec<ExclusionWire> = Vec::deserialize(deserializer)?;
    Ok(wire.into_iter().flat_map(collapse_exclusion).collect())
}

impl CupDefinition {
    /// Species ids named by inclusion-by-id filters, normalized, in
    /// declaration order. Other include filter types do not name species.
    pub fn included_species(&self) -> Vec<String> {
        self.include
            .iter()
            .filter(|filter| filter.filter_type == "id")
            .flat_map(|filter| filter.values.iter().map(|id| normalize_species_id(id)))
            .collect()
    }

    /// Species ids named by any exclusion form, in declaration order.
    pub fn excluded_species(&self) -> Vec<String> {
        self.exclude
            .iter()
            .filter_map(|exclusion| match exclusion {
                Exclusion::Species(id) => Some(id.clone()),
                Exclusion::Moves(_) => None,
            })
            .collect()
    }

    /// Move codes named by move-exclusion rules, in declaration order.
    pub fn excluded_moves(&self) -> Vec<String> {
        self.exclude
            .iter()
            .flat_map(|exclusion| match exclusion {
                Exclusion::Moves(values) => values.clone(),
                Exclusion::Species(_) => Vec::new(),
            })
            .collect()
    }
}

/// Eligibility and ban state derived once per cup. Resolvers only ever
/// consult this, never the raw cup document.
#[derive(Debug, Clone, Default)]
pub struct CupRuleSet {
    pub eligible: HashSet<String>,
    pub banned_moves: HashSet<String>,
}

impl CupRuleSet {
    pub fn is_eligible(&self, species_id: &str) -> bool {
        self.eligible.contains(species_id)
    }

    pub fn is_banned(&self, move_code: &str) -> bool {
        self.banned_moves.contains(move_code)
    }
}

/// Derives the eligible species set and the banned move set from a cup.
/// Inclusions are applied first, then every species exclusion, so an id
/// that is both included and excluded ends up excluded. Excluding an id
/// that was never included is a no-op.
pub fn derive_rule_set(cup: &CupDefinition) -> CupRuleSet {
    let mut eligible: HashSet<String> = cup.included_species().into_iter().collect();
    let mut banned_moves = HashSet::new();

    for exclusion in &cup.exclude {
        match exclusion {
            Exclusion::Species(id) => {
                eligible.remove(id);
            }
            Exclusion::Moves(values) => {
                banned_moves.extend(values.iter().cloned());
            }
        }
    }

    CupRuleSet {
        eligible,
        banned_moves,
    }
}

pub fn load_cup(path: impl AsRef<Path>) -> Result<CupDefinition, LoadError> {
    load_json(path.as_ref())
}
