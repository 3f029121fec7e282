//! Validator for an unpacked cup bundle: the directory tree a cup author
//! hands over, holding the cup definition, override files, and exported
//! rankings. Structure problems and per-file data problems are collected
//! into one report; a broken layout does not stop the data checks.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::paths::RANKING_CATEGORIES;
use crate::data::{
    load_cup, move_id_set, normalize_move_code, normalize_species_id, species_id_set,
    CupDefinition, LoadError, MoveEntry, PokemonEntry,
};
use crate::validate::report::{ValidationDiagnostic, ValidationReport, ValidationSeverity};

/// Result of validating one bundle. The shortname is reported even when
/// validation fails, so callers can label their output.
#[derive(Debug)]
pub struct BundleOutcome {
    pub cup_shortname: Option<String>,
    pub report: ValidationReport,
}

/// Summary document written next to the console output when a report
/// artifact is requested.
#[derive(Debug, Serialize)]
pub struct BundleReportArtifact {
    pub tool: String,
    pub generated_at: String,
    pub cup: Option<String>,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<ValidationDiagnostic>,
}

pub fn bundle_report_artifact(outcome: &BundleOutcome) -> BundleReportArtifact {
    BundleReportArtifact {
        tool: format!("cupsmith {}", env!("CARGO_PKG_VERSION")),
        generated_at: Utc::now().format("%Y-%m-%d").to_string(),
        cup: outcome.cup_shortname.clone(),
        errors: outcome.report.error_count(),
        warnings: outcome.report.warning_count(),
        diagnostics: outcome.report.diagnostics.clone(),
    }
}

/// Cross-reference sets shared by every data-file check in one bundle run.
struct BundleRules {
    known_species: BTreeSet<String>,
    known_moves: BTreeSet<String>,
    required_species: BTreeSet<String>,
    forbidden_species: BTreeSet<String>,
    forbidden_moves: BTreeSet<String>,
}

impl BundleRules {
    fn from_cup(cup: &CupDefinition, pokemon: &[PokemonEntry], moves: &[MoveEntry]) -> Self {
        Self {
            known_species: species_id_set(pokemon).into_iter().collect(),
            known_moves: move_id_set(moves).into_iter().collect(),
            required_species: cup.included_species().into_iter().collect(),
            forbidden_species: cup.excluded_species().into_iter().collect(),
            forbidden_moves: cup.excluded_moves().into_iter().collect(),
        }
    }
}

/// Validates the bundle rooted at `bundle_dir`. The first subdirectory is
/// taken as the cup shortname; the cup definition is expected at
/// `<short>/cupfile/<short>.json`, overrides under `<short>/overrides/<short>/`,
/// and rankings under `<short>/rankings/<short>/<category>/`.
pub fn validate_bundle(
    bundle_dir: &Path,
    pokemon: &[PokemonEntry],
    moves: &[MoveEntry],
) -> BundleOutcome {
    let mut report = ValidationReport::default();

    let shortname = match detect_cup_shortname(bundle_dir) {
        Ok(Some(name)) => name,
        Ok(None) => {
            report.push(
                ValidationSeverity::Error,
                "bundle",
                format!("no cup directory found in '{}'", bundle_dir.display()),
            );
            return BundleOutcome {
                cup_shortname: None,
                report,
            };
        }
        Err(err) => {
            report.push(
                ValidationSeverity::Error,
                "bundle",
                format!("failed to read '{}': {err}", bundle_dir.display()),
            );
            return BundleOutcome {
                cup_shortname: None,
                report,
            };
        }
    };

    let cup_root = bundle_dir.join(&shortname);
    let cup_file = cup_root.join("cupfile").join(format!("{shortname}.json"));
    let overrides_base = cup_root.join("overrides").join(&shortname);
    let rankings_base = cup_root.join("rankings").join(&shortname);

    let cup = match load_cup(&cup_file) {
        Ok(cup) => cup,
        Err(err) => {
            report.push(ValidationSeverity::Error, "bundle", err.to_string());
            return BundleOutcome {
                cup_shortname: Some(shortname),
                report,
            };
        }
    };

    report.merge(check_structure(&cup, &overrides_base, &rankings_base));

    let rules = BundleRules::from_cup(&cup, pokemon, moves);
    report.merge(check_data_dir(&overrides_base, false, &rules));
    report.merge(check_data_dir(&rankings_base, true, &rules));

    BundleOutcome {
        cup_shortname: Some(shortname),
        report,
    }
}

fn detect_cup_shortname(bundle_dir: &Path) -> io::Result<Option<String>> {
    let mut subdirs: Vec<String> = Vec::new();
    for entry in fs::read_dir(bundle_dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            if let Ok(name) = entry.file_name().into_string() {
                subdirs.push(name);
            }
        }
    }
    subdirs.sort();
    Ok(subdirs.into_iter().next())
}

/// Layout checks: the cup must declare a league, the league's override
/// file must exist, and every expected ranking category must carry a
/// rankings file for that league. Extra categories are only warned about.
fn check_structure(
    cup: &CupDefinition,
    overrides_base: &Path,
    rankings_base: &Path,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(league) = cup.league else {
        report.push(
            ValidationSeverity::Error,
            "structure",
            "cup definition has no 'league' field",
        );
        return report;
    };

    let override_file = overrides_base.join(format!("{league}.json"));
    if !override_file.is_file() {
        report.push(
            ValidationSeverity::Error,
            "structure",
            format!(
                "expected override file not found at '{}'",
                override_file.display()
            ),
        );
    }

    let found = match list_subdirectories(rankings_base) {
        Ok(found) => found,
        Err(_) => {
            report.push(
                ValidationSeverity::Error,
                "structure",
                format!(
                    "rankings directory not found at '{}'",
                    rankings_base.display()
                ),
            );
            return report;
        }
    };
    let expected: BTreeSet<String> = RANKING_CATEGORIES
        .iter()
        .map(|category| category.to_string())
        .collect();

    for category in expected.difference(&found) {
        report.push(
            ValidationSeverity::Error,
            "structure",
            format!("missing ranking category '{category}'"),
        );
    }
    for category in found.difference(&expected) {
        report.push(
            ValidationSeverity::Warning,
            "structure",
            format!("extra ranking category '{category}'"),
        );
    }
    for category in found.intersection(&expected) {
        let ranking_file = rankings_base
            .join(category)
            .join(format!("rankings-{league}.json"));
        if !ranking_file.is_file() {
            report.push(
                ValidationSeverity::Error,
                "structure",
                format!(
                    "expected ranking file not found at '{}'",
                    ranking_file.display()
                ),
            );
        }
    }

    report
}

fn list_subdirectories(dir: &Path) -> io::Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            if let Ok(name) = entry.file_name().into_string() {
                names.insert(name);
            }
        }
    }
    Ok(names)
}

/// Checks every JSON data file under `base`. A missing directory is not an
/// error here; the structure check already accounts for the layout.
fn check_data_dir(base: &Path, recursive: bool, rules: &BundleRules) -> ValidationReport {
    let mut report = ValidationReport::default();
    if !base.is_dir() {
        return report;
    }

    let files = match collect_json_files(base, recursive) {
        Ok(files) => files,
        Err(err) => {
            report.push(
                ValidationSeverity::Error,
                "bundle",
                format!("failed to list '{}': {err}", base.display()),
            );
            return report;
        }
    };

    let file_reports: Vec<ValidationReport> = files
        .par_iter()
        .map(|path| check_data_file(path, base, rules))
        .collect();
    for file_report in file_reports {
        report.merge(file_report);
    }
    report
}

fn collect_json_files(dir: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if path.extension().map_or(false, |e| e == "json") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Minimal view of one entry in an override or ranking file. Override
/// files carry `fastMove`/`chargedMoves`; ranking exports carry `moveset`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataFileEntry {
    #[serde(default)]
    species_id: Option<String>,
    #[serde(default)]
    fast_move: Option<String>,
    #[serde(default)]
    charged_moves: Vec<String>,
    #[serde(default)]
    moveset: Vec<String>,
}

fn collect_file_ids(entries: &[DataFileEntry]) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut species = BTreeSet::new();
    let mut moves = BTreeSet::new();
    for entry in entries {
        if let Some(species_id) = &entry.species_id {
            species.insert(normalize_species_id(species_id));
        }
        if let Some(code) = &entry.fast_move {
            moves.insert(normalize_move_code(code));
        }
        for code in entry.charged_moves.iter().chain(entry.moveset.iter()) {
            moves.insert(normalize_move_code(code));
        }
    }
    (species, moves)
}

fn check_data_file(path: &Path, base: &Path, rules: &BundleRules) -> ValidationReport {
    let mut report = ValidationReport::default();
    let context = display_path(path, base);

    let entries: Vec<DataFileEntry> = match crate::data::load_json(path) {
        Ok(entries) => entries,
        Err(err) => {
            let detail = match err {
                LoadError::Read { source, .. } => format!("failed to read: {source}"),
                LoadError::Parse { source, .. } => format!("failed to parse JSON: {source}"),
                other => other.to_string(),
            };
            report.push(ValidationSeverity::Error, context.as_str(), detail);
            return report;
        }
    };

    let (species, moves) = collect_file_ids(&entries);

    for species_id in rules.required_species.difference(&species) {
        report.push(
            ValidationSeverity::Error,
            context.as_str(),
            format!("missing required species '{species_id}'"),
        );
    }
    for species_id in species.difference(&rules.known_species) {
        report.push(
            ValidationSeverity::Error,
            context.as_str(),
            format!("unknown species '{species_id}'"),
        );
    }
    for code in moves.difference(&rules.known_moves) {
        report.push(
            ValidationSeverity::Error,
            context.as_str(),
            format!("unknown move '{code}'"),
        );
    }
    for species_id in rules.forbidden_species.intersection(&species) {
        report.push(
            ValidationSeverity::Error,
            context.as_str(),
            format!("forbidden species '{species_id}'"),
        );
    }
    for code in rules.forbidden_moves.intersection(&moves) {
        report.push(
            ValidationSeverity::Error,
            context.as_str(),
            format!("forbidden move '{code}'"),
        );
    }

    report
}

fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
