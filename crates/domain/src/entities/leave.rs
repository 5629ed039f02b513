use crate::value_objects::{LeaveId, LeaveStatus, LeaveType, StaffId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub staff_id: StaffId,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub draft_text: Option<String>,
    pub request_pdf: Option<String>,
    pub approval_pdf: Option<String>,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Whether the leave spans `date`; open-ended leave covers every later day
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }
}

/// Leave row as listed, with the requesting staff's identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveListing {
    pub id: LeaveId,
    pub staff_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: LeaveStatus,
}
