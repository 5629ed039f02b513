//! Domain Errors - business rule violations
//!
//! Only business logic errors live here; storage and configuration failures
//! are reported by the layers that own them.

use thiserror::Error;

/// Domain-specific errors representing business rule violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Business validation: unknown literal for an enumerated field
    #[error("Invalid {field} value: {value}")]
    InvalidEnumValue { field: &'static str, value: String },

    /// Business rule: status machine does not allow the move
    #[error("Cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// Business validation: range end before range start
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },

    /// Business validation: page numbers are 1-based, page sizes positive
    #[error("Invalid page request: page {page}, page size {page_size}")]
    InvalidPageRequest { page: u32, page_size: u32 },

    /// Business validation: role title blank after trimming
    #[error("Role title cannot be empty")]
    EmptyRoleTitle,
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub(crate) fn invalid_enum(field: &'static str, value: &str) -> Self {
        DomainError::InvalidEnumValue {
            field,
            value: value.to_string(),
        }
    }

    /// Check if error is a business validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidEnumValue { .. }
                | DomainError::InvalidDateRange { .. }
                | DomainError::InvalidPageRequest { .. }
                | DomainError::EmptyRoleTitle
        )
    }

    /// Check if error is a business rule violation
    pub fn is_business_rule_error(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }

    /// Get error category for business logic
    pub fn category(&self) -> ErrorCategory {
        if self.is_validation_error() {
            ErrorCategory::Validation
        } else {
            ErrorCategory::BusinessRule
        }
    }
}

/// Categories of domain errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input validation errors
    Validation,
    /// Business rule violations
    BusinessRule,
}
