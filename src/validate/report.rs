//! Severity-tagged diagnostics shared by all validators. Checks push into
//! a report; callers render it and decide the exit code from `has_errors`.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    /// Appends another report's diagnostics, keeping their order.
    pub fn merge(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(ValidationSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ValidationSeverity::Warning)
    }

    fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }

    /// One line per diagnostic, the way the CLI prints them.
    pub fn render_text(&self) -> String {
        let mut rendered = String::new();
        for diag in &self.diagnostics {
            rendered.push_str(&format!(
                "{}: [{}] {}\n",
                diag.severity, diag.context, diag.message
            ));
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_only_for_error_severity() {
        let mut report = ValidationReport::default();
        report.push(ValidationSeverity::Warning, "cup", "looks odd");
        report.push(ValidationSeverity::Info, "cup", "for the record");
        assert!(!report.has_errors());

        report.push(ValidationSeverity::Error, "cup", "broken");
        assert!(report.has_errors());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn merge_preserves_diagnostic_order() {
        let mut first = ValidationReport::default();
        first.push(ValidationSeverity::Error, "a", "first");
        let mut second = ValidationReport::default();
        second.push(ValidationSeverity::Warning, "b", "second");

        first.merge(second);
        assert_eq!(first.diagnostics.len(), 2);
        assert_eq!(first.diagnostics[1].context, "b");
    }

    #[test]
    fn severity_serializes_as_lowercase_text() {
        let value =
            serde_json::to_value(ValidationSeverity::Warning).expect("severity should serialize");
        assert_eq!(value, "warning");
    }
}
