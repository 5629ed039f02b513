//! Action errors
//!
//! Every manager operation fails with an [`ActionError`]. Storage failures are
//! classified here once: known constraint violations become
//! [`ActionError::Conflict`] or [`ActionError::Reference`], anything else is
//! logged and surfaced as [`ActionError::Unexpected`].

use domain::DomainError;
use rusqlite::ffi;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, warn};

/// Field name to messages, as rendered next to form inputs
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Constraint violations the user can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    UnitHasChildren,
    DuplicateAssignment,
    DuplicateEmail,
    DuplicateStaffNumber,
    DuplicateIppdNumber,
}

impl ConflictKind {
    pub fn message(&self) -> &'static str {
        match self {
            ConflictKind::UnitHasChildren => {
                "Cannot delete unit because it has child units. Delete children first."
            }
            ConflictKind::DuplicateAssignment => "This assignment already exists.",
            ConflictKind::DuplicateEmail => "Email already in use",
            ConflictKind::DuplicateStaffNumber => "Staff number already in use",
            ConflictKind::DuplicateIppdNumber => "IPPD number already in use",
        }
    }

    /// Form field the conflict belongs to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConflictKind::DuplicateEmail => Some("email"),
            ConflictKind::DuplicateStaffNumber => Some("staff_number"),
            ConflictKind::DuplicateIppdNumber => Some("ippd_number"),
            _ => None,
        }
    }

    /// Map the `table.column` list SQLite names in a UNIQUE failure
    fn from_unique_message(message: &str) -> Option<Self> {
        if message.contains("staffs.email") {
            Some(ConflictKind::DuplicateEmail)
        } else if message.contains("staffs.staff_number") {
            Some(ConflictKind::DuplicateStaffNumber)
        } else if message.contains("staffs.ippd_number") {
            Some(ConflictKind::DuplicateIppdNumber)
        } else if message.contains("staff_assignments.") {
            Some(ConflictKind::DuplicateAssignment)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    /// Input failed field checks; nothing was written
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    /// A referenced row does not exist (`id` unknown when only the
    /// foreign key itself reported it)
    #[error("Referenced {entity} {} does not exist", display_id(.id))]
    Reference { entity: &'static str, id: Option<i64> },

    #[error("{}", .0.message())]
    Conflict(ConflictKind),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unexpected storage error: {0}")]
    Unexpected(String),
}

pub type ActionResult<T> = Result<T, ActionError>;

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn display_id(id: &Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string())
}

impl ActionError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ActionError::Validation(errors)
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ActionError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn reference(entity: &'static str, id: i64) -> Self {
        ActionError::Reference {
            entity,
            id: Some(id),
        }
    }

    /// Name the row behind a bare foreign-key failure
    pub fn with_reference(self, entity: &'static str, id: i64) -> Self {
        match self {
            ActionError::Reference { id: None, .. } => ActionError::reference(entity, id),
            other => other,
        }
    }

    pub fn is_conflict(&self, kind: ConflictKind) -> bool {
        matches!(self, ActionError::Conflict(k) if *k == kind)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionError::NotFound { .. })
    }

    /// Only unexpected failures are worth resubmitting unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::Unexpected(_))
    }

    pub fn category(&self) -> &'static str {
        match self {
            ActionError::Validation(_) => "validation",
            ActionError::Reference { .. } => "reference",
            ActionError::Conflict(_) => "conflict",
            ActionError::NotFound { .. } => "not_found",
            ActionError::Domain(_) => "domain",
            ActionError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<rusqlite::Error> for ActionError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                let message = message.as_deref().unwrap_or_default();
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        if let Some(kind) = ConflictKind::from_unique_message(message) {
                            warn!(constraint = message, "unique constraint rejected write");
                            return ActionError::Conflict(kind);
                        }
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        warn!("foreign key constraint rejected write");
                        return ActionError::Reference {
                            entity: "record",
                            id: None,
                        };
                    }
                    _ => {}
                }
            }
        }

        error!(error = %err, "unexpected storage failure");
        ActionError::Unexpected(err.to_string())
    }
}

impl From<r2d2::Error> for ActionError {
    fn from(err: r2d2::Error) -> Self {
        error!(error = %err, "failed to check out database connection");
        ActionError::Unexpected(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ActionError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ActionError::Validation(field_errors(&errors))
    }
}

pub(crate) fn field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, list)| {
            let messages = list
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {field}"))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Outcome of an action as handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Fatal, non-field error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ActionState {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            state_error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.state_error.is_none() && self.errors.is_none()
    }

    /// Render `result`, using `success` as the message on `Ok`
    pub fn from_result<T>(result: &ActionResult<T>, success: &str) -> Self {
        match result {
            Ok(_) => Self::success(success),
            Err(err) => Self::from(err),
        }
    }
}

impl From<&ActionError> for ActionState {
    fn from(err: &ActionError) -> Self {
        match err {
            ActionError::Validation(errors) => Self {
                message: Some("Please fix the errors and try again.".to_string()),
                state_error: None,
                errors: Some(errors.clone()),
            },
            ActionError::Conflict(kind) => match kind.field() {
                Some(field) => {
                    let mut errors = FieldErrors::new();
                    errors.insert(field.to_string(), vec![kind.message().to_string()]);
                    Self {
                        errors: Some(errors),
                        ..Self::default()
                    }
                }
                None => Self::failure(kind.message()),
            },
            ActionError::Unexpected(_) => Self::failure("Unexpected error. Please try again."),
            other => Self::failure(other.to_string()),
        }
    }
}
