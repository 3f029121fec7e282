//! Cup moveset tooling for PvPoke: resolve banned moves in ranked movesets
//! through the override ladder, maintain per-cup override files, and
//! validate cup definitions, CSV exports, and submission bundles.

pub mod cli;
pub mod config;
pub mod data;
pub mod resolve;
pub mod validate;
