//! Staff assignments: a staff member holding a role within a unit
//!
//! `(staff_id, role_id, unit_id)` is unique. The row is owned jointly by the
//! staff record, the role and the unit; deleting any of them removes it.

use crate::value_objects::{AssignmentId, RoleId, StaffId, UnitId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub staff_id: StaffId,
    pub role_id: RoleId,
    pub unit_id: UnitId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_primary: bool,
}

/// Assignment joined with the staff and role it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub staff_number: String,
    pub role_title: String,
}

/// Staffing coverage of one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCoverage {
    pub unit_id: UnitId,
    pub unit_name: String,
    pub role_count: u32,
    pub filled_roles: u32,
    pub assignment_count: u32,
}

impl UnitCoverage {
    pub fn vacant_roles(&self) -> u32 {
        self.role_count.saturating_sub(self.filled_roles)
    }
}
