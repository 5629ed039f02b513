use crate::value_objects::{AttendanceId, AttendanceStatus, StaffId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored attendance mark, unique per `(staff_id, date)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// One line of a unit's daily sheet. `id` is `None` when the day is unmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSheetRow {
    pub id: Option<AttendanceId>,
    pub staff_id: StaffId,
    pub staff_number: String,
    pub staff_name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub present: u32,
    pub absent: u32,
    pub off_duty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub description: String,
}
