//! Domain Entities - core business objects
//!
//! Entities carry identity; none of them know how they are stored.

pub mod assignment;
pub mod attendance;
pub mod leave;
pub mod org_unit;
pub mod staff;
pub mod transfer;

pub use assignment::{Assignment, AssignmentDetail, UnitCoverage};
pub use attendance::{AttendanceRecord, AttendanceSheetRow, AttendanceSummary, Holiday};
pub use leave::{LeaveListing, LeaveRequest};
pub use org_unit::{build_forest, forest_size, OrgUnit, Role, UnitRecord};
pub use staff::Staff;
pub use transfer::{Transfer, TransferListing};
