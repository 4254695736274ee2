//! Validation finding types and accumulator.
//!
//! Cross-field validation never halts on the first problem: every invariant
//! is checked independently and every violation is reported, so a user can
//! fix a configuration in one pass. Findings carry a severity and a
//! human-readable message naming the rule and the offending field pair; the
//! caller decides whether errors block a provider write.

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;

/// Severity of a validation finding.
///
/// Cross-field validation currently only produces errors; the warning level
/// exists for lower-severity checks sharing the same accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingSeverity {
    /// Advisory finding that does not block a write.
    Warning,
    /// A consistency invariant is violated.
    Error,
}

impl std::fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Individual validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFinding {
    /// How severe the finding is.
    pub severity: FindingSeverity,
    /// Human-readable description of the conflict.
    pub message: String,
}

/// Accumulator for validation findings.
///
/// # Examples
///
/// ```rust
/// use protection_model::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid());
///
/// result.add_error("branch_protection_rule[repo=\"api\",pattern=\"main\"] has 'allowsForcePushes' enabled but 'bypassForcePushAllowances' is not empty.");
/// assert!(!result.is_valid());
/// assert_eq!(result.findings().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    findings: Vec<ValidationFinding>,
}

impl ValidationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
        }
    }

    /// Record an error-level finding.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.findings.push(ValidationFinding {
            severity: FindingSeverity::Error,
            message: message.into(),
        });
    }

    /// Record a warning-level finding.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.findings.push(ValidationFinding {
            severity: FindingSeverity::Warning,
            message: message.into(),
        });
    }

    /// All findings, in the order they were recorded.
    pub fn findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    /// Error-level findings only.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == FindingSeverity::Error)
    }

    /// Check whether no error-level finding was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }
}
