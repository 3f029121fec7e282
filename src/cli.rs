//! Command line dispatch. Subcommands parse their own arguments from the
//! raw argv slice; handlers map outcomes to process exit codes (0 success,
//! 1 failure, 2 usage error). Prompts, warnings, and reports go to stderr;
//! stdout carries only the JSON the import produces.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{self, ConfigError};
use crate::data::paths::{
    gamemaster_moves_path, gamemaster_path, gamemaster_pokemon_path, overrides_path, rankings_path,
};
use crate::data::{
    derive_rule_set, load_csv_rankings, load_cup, load_gamemaster, load_moves_list,
    load_override_file, load_pokemon_list, load_rankings, save_override_file, LoadError,
    MoveCatalog, MoveEntry, PokemonEntry,
};
use crate::resolve::{
    resolve_session, Disambiguator, FirstCandidateDisambiguator, ResolutionContext,
    TerminalDisambiguator,
};
use crate::validate::{
    bundle_report_artifact, check_csv_rankings, validate_bundle, validate_cup_references,
    ShadowCheckMode, ValidationReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Import,
    ValidateCup,
    CheckRankings,
    ValidateBundle,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("import") => Some(Command::Import),
        Some("validate-cup") => Some(Command::ValidateCup),
        Some("check-rankings") => Some(Command::CheckRankings),
        Some("validate-bundle") => Some(Command::ValidateBundle),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Import) => handle_import(args),
        Some(Command::ValidateCup) => handle_validate_cup(args),
        Some(Command::CheckRankings) => handle_check_rankings(args),
        Some(Command::ValidateBundle) => handle_validate_bundle(args),
        None => {
            eprintln!("usage: cupsmith <import|validate-cup|check-rankings|validate-bundle>");
            2
        }
    }
}

fn handle_import(args: &[String]) -> i32 {
    let (Some(cup_name), Some(league_raw)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: cupsmith import <cup> <league> [--auto] [--yes] [--output <path>]");
        return 2;
    };
    let Ok(league) = league_raw.parse::<u32>() else {
        eprintln!("invalid league '{league_raw}' (expected a CP limit such as 1500)");
        return 2;
    };
    let auto = args.iter().any(|arg| arg == "--auto");
    let assume_yes = args.iter().any(|arg| arg == "--yes");
    let output = flag_value(args, "--output").map(PathBuf::from);

    let Some(root) = resolve_source_root_or_explain() else {
        return 1;
    };

    let gamemaster = match load_gamemaster(gamemaster_path(&root)) {
        Ok(gamemaster) => gamemaster,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!(
                "Check that {} points at a pvpoke/src checkout.",
                config::SOURCE_ROOT_ENV
            );
            return 1;
        }
    };
    let Some(cup) = gamemaster.cup(cup_name) else {
        eprintln!("error: cup '{cup_name}' not found in gamemaster.json");
        return 1;
    };

    let rankings = match load_rankings(rankings_path(&root, cup_name, league)) {
        Ok(rankings) => rankings,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    let overrides_file = overrides_path(&root, cup_name, league);
    let predefined = match load_override_file(&overrides_file) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let rules = derive_rule_set(cup);
    let catalog = MoveCatalog::from_pokemon(&gamemaster.pokemon);
    let mut context = ResolutionContext::new(predefined);

    let mut disambiguator: Box<dyn Disambiguator> = if auto {
        Box::new(FirstCandidateDisambiguator)
    } else {
        Box::new(TerminalDisambiguator::stdin())
    };

    let outcome = match resolve_session(
        &rankings,
        &rules,
        &catalog,
        &mut context,
        disambiguator.as_mut(),
    ) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}; nothing was written");
            return 1;
        }
    };
    // Release the stdin lock so the save confirmation below can read it.
    drop(disambiguator);

    for warning in &outcome.report.warnings {
        eprintln!("warning: {warning}");
    }

    let payload = match serde_json::to_string_pretty(&outcome.movesets) {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("failed to serialize movesets: {err}");
            return 1;
        }
    };
    match &output {
        Some(path) => {
            if let Err(err) = fs::write(path, &payload) {
                eprintln!("failed to write '{}': {err}", path.display());
                return 1;
            }
            eprintln!(
                "wrote {} movesets to '{}'",
                outcome.movesets.len(),
                path.display()
            );
        }
        None => println!("{payload}"),
    }
    eprintln!(
        "resolved {} of {} eligible entries ({} skipped, {} new decision(s))",
        outcome.report.resolved,
        outcome.report.eligible_entries,
        outcome.report.skipped,
        outcome.report.decisions_recorded
    );

    if context.has_new_choices() {
        let records = context.merged_records();
        if assume_yes || confirm_save(context.newly_chosen().len(), &overrides_file) {
            match save_override_file(&overrides_file, &records) {
                Ok(()) => eprintln!(
                    "saved {} override record(s) to '{}'",
                    records.len(),
                    overrides_file.display()
                ),
                Err(err) => {
                    eprintln!("error: {err}");
                    return 1;
                }
            }
        } else {
            eprintln!("overrides not saved");
        }
    }

    0
}

fn handle_validate_cup(args: &[String]) -> i32 {
    let Some(cup_path) = args.get(2) else {
        eprintln!("usage: cupsmith validate-cup <cup.json> [gamemaster.json]");
        return 2;
    };

    let cup = match load_cup(cup_path) {
        Ok(cup) => cup,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let gamemaster = match args.get(3) {
        Some(path) => load_gamemaster(path),
        None => {
            let Some(root) = resolve_source_root_or_explain() else {
                return 1;
            };
            load_gamemaster(gamemaster_path(&root))
        }
    };
    let gamemaster = match gamemaster {
        Ok(gamemaster) => gamemaster,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let report = validate_cup_references(&cup, &gamemaster);
    finish_validation(&report, &format!("cup '{}'", cup.name))
}

fn handle_check_rankings(args: &[String]) -> i32 {
    let (Some(csv_path), Some(cup_path)) = (args.get(2), args.get(3)) else {
        eprintln!(
            "usage: cupsmith check-rankings <rankings.csv> <cup.json> [--shadow-check <off|warn|strict>] [--verbose]"
        );
        return 2;
    };
    let mode = match flag_value(args, "--shadow-check") {
        Some(raw) => match ShadowCheckMode::parse(raw) {
            Some(mode) => mode,
            None => {
                eprintln!("invalid --shadow-check '{raw}' (expected off, warn, or strict)");
                return 2;
            }
        },
        None => ShadowCheckMode::default(),
    };
    let verbose = args.iter().any(|arg| arg == "--verbose");

    let csv = match load_csv_rankings(csv_path) {
        Ok(csv) => csv,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    let cup = match load_cup(cup_path) {
        Ok(cup) => cup,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let Some(root) = resolve_source_root_or_explain() else {
        return 1;
    };
    let (pokemon, moves) = match load_reference_lists(&root) {
        Ok(lists) => lists,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    if verbose {
        eprintln!(
            "checking {} csv rows against cup '{}' ({} required, {} forbidden species, {} banned moves, shadow check {})",
            csv.rows.len(),
            cup.name,
            cup.included_species().len(),
            cup.excluded_species().len(),
            cup.excluded_moves().len(),
            mode.as_str()
        );
    }

    let report = check_csv_rankings(&csv, &cup, &pokemon, &moves, mode);
    finish_validation(&report, &format!("rankings '{csv_path}'"))
}

fn handle_validate_bundle(args: &[String]) -> i32 {
    let Some(bundle_dir) = args.get(2) else {
        eprintln!("usage: cupsmith validate-bundle <bundle-dir> [--report <path>]");
        return 2;
    };
    let report_path = flag_value(args, "--report").map(PathBuf::from);

    let Some(root) = resolve_source_root_or_explain() else {
        return 1;
    };
    let (pokemon, moves) = match load_reference_lists(&root) {
        Ok(lists) => lists,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let outcome = validate_bundle(Path::new(bundle_dir), &pokemon, &moves);
    if let Some(shortname) = &outcome.cup_shortname {
        eprintln!("detected cup shortname: {shortname}");
    }

    if let Some(path) = &report_path {
        let artifact = bundle_report_artifact(&outcome);
        let payload = match serde_json::to_string_pretty(&artifact) {
            Ok(payload) => payload,
            Err(err) => {
                eprintln!("failed to serialize report: {err}");
                return 1;
            }
        };
        if let Err(err) = fs::write(path, payload) {
            eprintln!("failed to write '{}': {err}", path.display());
            return 1;
        }
        eprintln!("wrote report to '{}'", path.display());
    }

    finish_validation(&outcome.report, &format!("bundle '{bundle_dir}'"))
}

/// Renders a report to stderr and turns it into an exit code. Warnings do
/// not fail the run.
fn finish_validation(report: &ValidationReport, subject: &str) -> i32 {
    if report.diagnostics.is_empty() {
        println!("validation passed: {subject}");
        return 0;
    }

    eprint!("{}", report.render_text());
    if report.has_errors() {
        eprintln!(
            "validation failed: {subject} ({} error(s), {} warning(s))",
            report.error_count(),
            report.warning_count()
        );
        1
    } else {
        println!(
            "validation passed with {} warning(s): {subject}",
            report.warning_count()
        );
        0
    }
}

fn resolve_source_root_or_explain() -> Option<PathBuf> {
    match config::resolve_source_root() {
        Ok(root) => Some(root),
        Err(ConfigError::Unresolved) => {
            eprintln!("error: {} is not set.", config::SOURCE_ROOT_ENV);
            eprintln!("Set it to the absolute path of your pvpoke/src checkout, e.g.:");
            eprintln!("  export {}=/srv/pvpoke/src", config::SOURCE_ROOT_ENV);
            eprintln!(
                "or name a source_root in {} in the working directory.",
                config::CONFIG_FILE
            );
            None
        }
        Err(err) => {
            eprintln!("error: {err}");
            None
        }
    }
}

/// Species and move reference lists, preferring the split gamemaster files
/// and falling back to the combined document.
fn load_reference_lists(root: &Path) -> Result<(Vec<PokemonEntry>, Vec<MoveEntry>), LoadError> {
    let pokemon_path = gamemaster_pokemon_path(root);
    let moves_path = gamemaster_moves_path(root);
    if pokemon_path.is_file() && moves_path.is_file() {
        Ok((load_pokemon_list(pokemon_path)?, load_moves_list(moves_path)?))
    } else {
        let gamemaster = load_gamemaster(gamemaster_path(root))?;
        Ok((gamemaster.pokemon, gamemaster.moves))
    }
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let index = args.iter().position(|arg| arg == name)?;
    args.get(index + 1).map(String::as_str)
}

fn confirm_save(decision_count: usize, target: &Path) -> bool {
    eprint!(
        "save {decision_count} new decision(s) to '{}'? [y/N] ",
        target.display()
    );
    let _ = io::stderr().flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        // End of input counts as declining; the results are already out.
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
    }
}
