//! Gamemaster catalog: species entries with their legal move pools, cup
//! definitions, and the move list. Accepts both the combined gamemaster
//! document and the split pokemon/moves lists PvPoke also ships.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::data::cup::CupDefinition;
use crate::data::{load_json, normalize_move_code, normalize_species_id, LoadError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonEntry {
    pub species_id: String,
    #[serde(default)]
    pub species_name: Option<String>,
    #[serde(default)]
    pub fast_moves: Vec<String>,
    #[serde(default)]
    pub charged_moves: Vec<String>,
    #[serde(default)]
    pub released: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEntry {
    pub move_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GameMaster {
    pub pokemon: Vec<PokemonEntry>,
    pub cups: Vec<CupDefinition>,
    pub moves: Vec<MoveEntry>,
}

impl GameMaster {
    /// Finds a cup definition by its exact name.
    pub fn cup(&self, name: &str) -> Option<&CupDefinition> {
        self.cups.iter().find(|cup| cup.name == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GameMasterPayload {
    Document {
        #[serde(default)]
        pokemon: Vec<PokemonEntry>,
        #[serde(default)]
        cups: Vec<CupDefinition>,
        #[serde(default)]
        moves: Vec<MoveEntry>,
    },
    List(Vec<PokemonEntry>),
}

pub fn load_gamemaster(path: impl AsRef<Path>) -> Result<GameMaster, LoadError> {
    let payload: GameMasterPayload = load_json(path.as_ref())?;
    Ok(match payload {
        GameMasterPayload::Document {
            pokemon,
            cups,
            moves,
        } => GameMaster {
            pokemon,
            cups,
            moves,
        },
        GameMasterPayload::List(pokemon) => GameMaster {
            pokemon,
            cups: Vec::new(),
            moves: Vec::new(),
        },
    })
}

pub fn load_pokemon_list(path: impl AsRef<Path>) -> Result<Vec<PokemonEntry>, LoadError> {
    load_json(path.as_ref())
}

pub fn load_moves_list(path: impl AsRef<Path>) -> Result<Vec<MoveEntry>, LoadError> {
    load_json(path.as_ref())
}

/// One species' legal move pools, normalized, in the catalog's declared
/// order. The order is load-bearing: disambiguation menus present
/// alternatives exactly as declared here.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub species_id: String,
    pub fast_moves: Vec<String>,
    pub charged_moves: Vec<String>,
}

/// Lookup table from normalized species id to its move pools.
#[derive(Debug, Clone, Default)]
pub struct MoveCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl MoveCatalog {
    pub fn from_pokemon(pokemon: &[PokemonEntry]) -> Self {
        let mut entries = HashMap::new();
        for pokemon_entry in pokemon {
            let species_id = normalize_species_id(&pokemon_entry.species_id);
            let entry = CatalogEntry {
                species_id: species_id.clone(),
                fast_moves: pokemon_entry
                    .fast_moves
                    .iter()
                    .map(|code| normalize_move_code(code))
                    .collect(),
                charged_moves: pokemon_entry
                    .charged_moves
                    .iter()
                    .map(|code| normalize_move_code(code))
                    .collect(),
            };
            entries.insert(species_id, entry);
        }
        Self { entries }
    }

    /// Looks up an already-normalized species id.
    pub fn lookup(&self, species_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(species_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All species identifiers known to the gamemaster, normalized.
pub fn species_id_set(pokemon: &[PokemonEntry]) -> HashSet<String> {
    pokemon
        .iter()
        .map(|entry| normalize_species_id(&entry.species_id))
        .collect()
}

/// All move codes known to the gamemaster, normalized.
pub fn move_id_set(moves: &[MoveEntry]) -> HashSet<String> {
    moves
        .iter()
        .map(|entry| normalize_move_code(&entry.move_id))
        .collect()
}

/// Display name to normalized species id. Direct, case-sensitive lookup;
/// CSV exports carry the same display names the gamemaster does.
pub fn species_name_index(pokemon: &[PokemonEntry]) -> HashMap<String, String> {
    pokemon
        .iter()
        .filter_map(|entry| {
            entry
                .species_name
                .as_ref()
                .map(|name| (name.clone(), normalize_species_id(&entry.species_id)))
        })
        .collect()
}

/// Display name to normalized move code, case-sensitive like the species map.
pub fn move_name_index(moves: &[MoveEntry]) -> HashMap<String, String> {
    moves
        .iter()
        .filter_map(|entry| {
            entry
                .name
                .as_ref()
                .map(|name| (name.clone(), normalize_move_code(&entry.move_id)))
        })
        .collect()
}

/// Normalized ids of shadow forms the gamemaster marks as released. The
/// rankings sanity check uses this to decide which shadow forms a ranked
/// species is expected to bring along.
pub fn released_shadow_forms(pokemon: &[PokemonEntry]) -> HashSet<String> {
    pokemon
        .iter()
        .filter(|entry| entry.released)
        .map(|entry| normalize_species_id(&entry.species_id))
        .filter(|species_id| species_id.ends_with("_shadow"))
        .collect()
}
