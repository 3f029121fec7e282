//! Validation passes over cup material: cross-reference checks for cup
//! definitions, the CSV rankings sanity check, and the bundle validator.
//! Every pass produces a [`ValidationReport`]; callers decide how to
//! render it and which severities are fatal.

pub mod bundle;
pub mod cup_refs;
pub mod rankings_check;
pub mod report;

pub use bundle::{bundle_report_artifact, validate_bundle, BundleOutcome, BundleReportArtifact};
pub use cup_refs::validate_cup_references;
pub use rankings_check::{check_csv_rankings, ShadowCheckMode};
pub use report::{ValidationDiagnostic, ValidationReport, ValidationSeverity};
