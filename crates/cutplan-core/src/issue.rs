//! Structured validation issues returned to the caller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One finding from the configuration validator.
///
/// `field` is the host application's form identifier (see
/// [`crate::rules::fields`]); `suggestion` is human-actionable text and
/// `recommended_value` is filled whenever a concrete number can be derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_value: Option<f64>,
}

impl ValidationIssue {
    pub fn error(field: &str, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
            suggestion: suggestion.into(),
            current_value: None,
            recommended_value: None,
        }
    }

    pub fn warning(field: &str, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
            suggestion: suggestion.into(),
            current_value: None,
            recommended_value: None,
        }
    }

    pub fn with_current(mut self, value: f64) -> Self {
        self.current_value = Some(value);
        self
    }

    pub fn with_recommended(mut self, value: f64) -> Self {
        self.recommended_value = Some(value);
        self
    }
}

/// Aggregated validation result. `valid` is true iff `errors` is empty;
/// warnings never block generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(mut issues: Vec<ValidationIssue>) -> Self {
        let warnings = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .cloned()
            .collect::<Vec<_>>();
        issues.retain(|i| i.severity == Severity::Error);
        Self {
            valid: issues.is_empty(),
            errors: issues,
            warnings,
        }
    }

    /// True when any error names the given field.
    pub fn has_error_on(&self, field: &str) -> bool {
        self.errors.iter().any(|i| i.field == field)
    }

    /// True when any warning names the given field.
    pub fn has_warning_on(&self, field: &str) -> bool {
        self.warnings.iter().any(|i| i.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_splits_by_severity() {
        let report = ValidationReport::new(vec![
            ValidationIssue::error("avanco", "too fast", "reduce it"),
            ValidationIssue::warning("rotacao", "low", "raise it"),
        ]);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.has_error_on("avanco"));
        assert!(report.has_warning_on("rotacao"));
    }

    #[test]
    fn test_report_with_only_warnings_is_valid() {
        let report = ValidationReport::new(vec![ValidationIssue::warning("x", "m", "s")]);
        assert!(report.valid);
    }
}
