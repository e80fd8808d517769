// Error taxonomy for the ledger engine
//
// ValidationError: bad user input, operation aborted with no partial mutation.
// DivisionAnomaly: variance percent against a zero baseline.
// The rest: ids the caller handed us that do not exist, and page sizes
// outside the configured options.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Variance percent is undefined because the middle-period baseline is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("variance percent is undefined for a zero baseline")]
pub struct DivisionAnomaly;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("category not found: {0}")]
    UnknownCategory(String),

    #[error("line item not found: {item_id} (category {category_id})")]
    UnknownLineItem { category_id: String, item_id: String },

    #[error("page size {size} is not one of {allowed:?}")]
    InvalidPageSize { size: usize, allowed: Vec<usize> },
}

impl LedgerError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::Validation(vec![ValidationError::new(field, message)])
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    /// The failing fields, empty for non-validation errors
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            LedgerError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_joins_fields() {
        let err = LedgerError::Validation(vec![
            ValidationError::new("label", "Please input the category!"),
            ValidationError::new("31-12-2024", "must be a number"),
        ]);

        assert_eq!(
            err.to_string(),
            "validation failed: label: Please input the category!; 31-12-2024: must be a number"
        );
        assert!(err.is_validation());
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_non_validation_errors_have_no_fields() {
        let err = LedgerError::UnknownCategory("abc".to_string());
        assert!(!err.is_validation());
        assert!(err.validation_errors().is_empty());
        assert_eq!(err.to_string(), "category not found: abc");
    }
}
