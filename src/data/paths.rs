//! Layout of the PvPoke source tree under the configured root.

use std::path::{Path, PathBuf};

pub const GAMEMASTER_FILE: &str = "data/gamemaster.json";
pub const GAMEMASTER_POKEMON_FILE: &str = "data/gamemaster/pokemon.json";
pub const GAMEMASTER_MOVES_FILE: &str = "data/gamemaster/moves.json";

/// Ranking categories a complete cup submission ships, one directory each.
pub const RANKING_CATEGORIES: [&str; 7] = [
    "attackers",
    "chargers",
    "closers",
    "consistency",
    "leads",
    "overall",
    "switches",
];

pub fn gamemaster_path(root: &Path) -> PathBuf {
    root.join(GAMEMASTER_FILE)
}

pub fn gamemaster_pokemon_path(root: &Path) -> PathBuf {
    root.join(GAMEMASTER_POKEMON_FILE)
}

pub fn gamemaster_moves_path(root: &Path) -> PathBuf {
    root.join(GAMEMASTER_MOVES_FILE)
}

/// The overall rankings file resolution reads its preferences from.
pub fn rankings_path(root: &Path, cup: &str, league: u32) -> PathBuf {
    root.join("data")
        .join("rankings")
        .join(cup)
        .join("overall")
        .join(format!("rankings-{league}.json"))
}

/// Where a cup's override file for one league lives.
pub fn overrides_path(root: &Path, cup: &str, league: u32) -> PathBuf {
    root.join("data")
        .join("overrides")
        .join(cup)
        .join(format!("{league}.json"))
}
