//! Action inputs
//!
//! Each input validates with `validator` before anything touches storage.
//! Cross-field rules (`end_date >= start_date`) are added by
//! [`CheckedInput::extra_checks`].

use crate::error::{field_errors, ActionError, ActionResult, FieldErrors};
use chrono::NaiveDate;
use domain::{
    AttendanceStatus, Gender, LeaveType, RoleId, RoleTitles, StaffId, StaffStatus, TransferType,
    UnitId,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub trait CheckedInput: Validate {
    fn extra_checks(&self, _errors: &mut FieldErrors) {}

    /// Run derived validation plus [`extra_checks`](Self::extra_checks)
    fn check(&self) -> ActionResult<()> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => field_errors(&e),
        };
        self.extra_checks(&mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ActionError::Validation(errors))
        }
    }
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Required text: non-blank and at most `max` characters
fn required_text(
    value: &str,
    max: usize,
    missing: &'static str,
    too_long: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failure("required", missing));
    }
    if value.chars().count() > max {
        return Err(failure("length", too_long));
    }
    Ok(())
}

fn validate_unit_name(name: &str) -> Result<(), ValidationError> {
    required_text(
        name,
        255,
        "Unit name is required",
        "Unit name must be 255 characters or fewer",
    )
}

fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    required_text(value, 100, "First name is required", "First name is too long")
}

fn validate_last_name(value: &str) -> Result<(), ValidationError> {
    required_text(value, 100, "Last name is required", "Last name is too long")
}

fn validate_staff_number(value: &str) -> Result<(), ValidationError> {
    required_text(value, 50, "Staff number is required", "Staff number is too long")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateUnitInput {
    pub parent_id: Option<UnitId>,

    #[validate(custom = "validate_unit_name")]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be 1000 characters or fewer"))]
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub roles: RoleTitles,
}

impl CreateUnitInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn under(mut self, parent_id: UnitId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_roles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roles = RoleTitles::new(titles);
        self
    }
}

impl CheckedInput for CreateUnitInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateUnitInput {
    pub id: UnitId,

    #[validate(custom = "validate_unit_name")]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be 1000 characters or fewer"))]
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub roles: RoleTitles,
}

impl UpdateUnitInput {
    pub fn new(id: UnitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            roles: RoleTitles::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_roles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roles = RoleTitles::new(titles);
        self
    }
}

impl CheckedInput for UpdateUnitInput {}

/// Staff form, shared by create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StaffInput {
    #[validate(custom = "validate_first_name")]
    pub first_name: String,

    #[validate(length(max = 100, message = "Middle name is too long"))]
    pub middle_name: Option<String>,

    #[validate(custom = "validate_last_name")]
    pub last_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 20, message = "Phone number is too long"))]
    pub phone: Option<String>,

    pub gender: Gender,

    #[validate(length(max = 100, message = "Rank is too long"))]
    pub rank: Option<String>,

    #[validate(custom = "validate_staff_number")]
    pub staff_number: String,

    #[validate(length(max = 50, message = "IPPD number is too long"))]
    pub ippd_number: Option<String>,

    #[validate(length(max = 500, message = "Address is too long"))]
    pub address: Option<String>,

    #[serde(default)]
    pub status: StaffStatus,
}

impl StaffInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        staff_number: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            middle_name: None,
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            gender,
            rank: None,
            staff_number: staff_number.into(),
            ippd_number: None,
            address: None,
            status: StaffStatus::default(),
        }
    }
}

impl CheckedInput for StaffInput {}

/// All three ids are required; `None` models an empty form field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssignInput {
    #[validate(required(message = "Staff is required"))]
    pub staff_id: Option<StaffId>,

    #[validate(required(message = "Role is required"))]
    pub role_id: Option<RoleId>,

    #[validate(required(message = "Unit is required"))]
    pub unit_id: Option<UnitId>,
}

impl AssignInput {
    pub fn new(staff_id: StaffId, role_id: RoleId, unit_id: UnitId) -> Self {
        Self {
            staff_id: Some(staff_id),
            role_id: Some(role_id),
            unit_id: Some(unit_id),
        }
    }
}

impl CheckedInput for AssignInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LeaveInput {
    pub staff_id: StaffId,

    #[serde(rename = "type")]
    pub leave_type: LeaveType,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 5000, message = "Draft text is too long"))]
    pub draft_text: Option<String>,

    pub request_pdf: Option<String>,
}

impl LeaveInput {
    pub fn new(staff_id: StaffId, leave_type: LeaveType, start_date: NaiveDate) -> Self {
        Self {
            staff_id,
            leave_type,
            start_date,
            end_date: None,
            draft_text: None,
            request_pdf: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

impl CheckedInput for LeaveInput {
    fn extra_checks(&self, errors: &mut FieldErrors) {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                errors
                    .entry("end_date".to_string())
                    .or_default()
                    .push("End date cannot be before start date".to_string());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TransferInput {
    pub staff_id: StaffId,

    #[serde(rename = "type")]
    pub transfer_type: TransferType,

    #[validate(length(max = 5000, message = "Draft text is too long"))]
    pub draft_text: Option<String>,

    pub letter_pdf: Option<String>,

    #[validate(length(max = 255, message = "Unit name is too long"))]
    pub from_unit: Option<String>,

    #[validate(length(max = 255, message = "Unit name is too long"))]
    pub to_unit: Option<String>,
}

impl TransferInput {
    pub fn new(staff_id: StaffId, transfer_type: TransferType) -> Self {
        Self {
            staff_id,
            transfer_type,
            draft_text: None,
            letter_pdf: None,
            from_unit: None,
            to_unit: None,
        }
    }
}

impl CheckedInput for TransferInput {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceInput {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HolidayInput {
    pub from: NaiveDate,

    /// Inclusive; `None` for a single day
    pub to: Option<NaiveDate>,

    #[validate(length(max = 255, message = "Description is too long"))]
    #[serde(default)]
    pub description: String,
}

impl CheckedInput for HolidayInput {
    fn extra_checks(&self, errors: &mut FieldErrors) {
        if matches!(self.to, Some(to) if to < self.from) {
            errors
                .entry("to".to_string())
                .or_default()
                .push("End date cannot be before start date".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> StaffInput {
        StaffInput::new("Ama", "Mensah", "ama@example.com", "S-001", Gender::Female)
    }

    fn errors_of(result: ActionResult<()>) -> FieldErrors {
        match result {
            Err(ActionError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_name_required() {
        let errors = errors_of(CreateUnitInput::new("   ").check());
        assert_eq!(errors["name"], vec!["Unit name is required".to_string()]);
    }

    #[test]
    fn test_unit_name_length_boundary() {
        assert!(CreateUnitInput::new("x".repeat(255)).check().is_ok());
        let errors = errors_of(CreateUnitInput::new("x".repeat(256)).check());
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn test_description_limit() {
        let input = CreateUnitInput::new("HQ").with_description("d".repeat(1001));
        assert!(errors_of(input.check()).contains_key("description"));
    }

    #[test]
    fn test_roles_normalized_on_construction() {
        let input = CreateUnitInput::new("HQ").with_roles(["A", " A ", "", "B"]);
        assert_eq!(input.roles.as_slice(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_valid_staff_passes() {
        assert!(staff().check().is_ok());
    }

    #[test]
    fn test_staff_collects_every_bad_field() {
        let mut input = staff();
        input.first_name = String::new();
        input.email = "not-an-email".into();
        input.phone = Some("0".repeat(21));

        let errors = errors_of(input.check());
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["email"], vec!["Invalid email address".to_string()]);
    }

    #[test]
    fn test_assign_requires_all_ids() {
        let input = AssignInput {
            staff_id: Some(StaffId::new(1)),
            ..AssignInput::default()
        };
        let errors = errors_of(input.check());
        assert!(errors.contains_key("role_id"));
        assert!(errors.contains_key("unit_id"));
        assert!(!errors.contains_key("staff_id"));
    }

    #[test]
    fn test_leave_end_before_start() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let input = LeaveInput::new(StaffId::new(1), LeaveType::Annual, start)
            .until(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
        assert!(errors_of(input.check()).contains_key("end_date"));

        let same_day = LeaveInput::new(StaffId::new(1), LeaveType::Annual, start).until(start);
        assert!(same_day.check().is_ok());
    }

    #[test]
    fn test_staff_input_deserializes_literals() {
        let input: StaffInput = serde_json::from_str(
            r#"{"first_name":"Kofi","last_name":"Boateng","email":"k@x.io",
                "staff_number":"S-9","gender":"MALE","status":"SICK"}"#,
        )
        .unwrap();
        assert_eq!(input.status, StaffStatus::Sick);
        assert_eq!(input.middle_name, None);
    }
}
