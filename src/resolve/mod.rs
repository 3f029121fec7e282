//! The moveset override resolution engine: per-entity fast and charged
//! resolvers, the session orchestrator that drives them over a ranking, and
//! the disambiguation channel they fall back to.

use std::fmt;

pub mod charged;
pub mod context;
pub mod fast;
pub mod prompt;
pub mod session;

pub use charged::{resolve_charged, ChargedResolution};
pub use context::ResolutionContext;
pub use fast::{resolve_fast, FastResolution};
pub use prompt::{
    ChoiceContext, Disambiguator, FirstCandidateDisambiguator, MoveSlot, ScriptedDisambiguator,
    TerminalDisambiguator,
};
pub use session::{resolve_session, ResolvedMoveset, SessionOutcome, SessionReport};

/// Per-entity resolution failures plus the one fatal case. `CatalogMiss`
/// and `NoAlternative` are recoverable: the caller skips the entity and
/// keeps going. `Aborted` cancels the session with no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    CatalogMiss {
        species_id: String,
    },
    NoAlternative {
        species_id: String,
        banned_move: String,
    },
    Aborted,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogMiss { species_id } => {
                write!(f, "{species_id}: not found in the move catalog")
            }
            Self::NoAlternative {
                species_id,
                banned_move,
            } => write!(
                f,
                "{species_id}: no legal alternative for banned move '{banned_move}'"
            ),
            Self::Aborted => write!(f, "session aborted during interactive choice"),
        }
    }
}

impl std::error::Error for ResolveError {}
