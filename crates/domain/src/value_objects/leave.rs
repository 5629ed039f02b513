//! Leave request kinds and the leave status machine
//!
//! `PENDING -> APPROVED -> ON_LEAVE`, monotonic, no way back.

use crate::errors::{DomainError, DomainResult};

literal_enum!(
    /// Kind of leave requested
    LeaveType, "type" {
        Annual => "ANNUAL",
        Sick => "SICK",
        Maternity => "MATERNITY",
        Paternity => "PATERNITY",
        OffDuty => "OFF_DUTY",
    }
);

literal_enum!(
    /// Lifecycle state of a leave request
    LeaveStatus, "status" {
        Pending => "PENDING",
        Approved => "APPROVED",
        OnLeave => "ON_LEAVE",
    }
);

impl LeaveStatus {
    /// Next state in the lifecycle, `None` once on leave
    pub fn next(&self) -> Option<LeaveStatus> {
        match self {
            LeaveStatus::Pending => Some(LeaveStatus::Approved),
            LeaveStatus::Approved => Some(LeaveStatus::OnLeave),
            LeaveStatus::OnLeave => None,
        }
    }

    pub fn can_transition_to(&self, target: LeaveStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn transition_to(self, target: LeaveStatus) -> DomainResult<LeaveStatus> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(DomainError::InvalidTransition {
                entity: "leave request",
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }
}
