use crate::output::Output;
use personnel::Personnel;

pub mod assign;
pub mod attendance;
pub mod config;
pub mod holiday;
pub mod leave;
pub mod staff;
pub mod transfer;
pub mod unit;

pub use assign::AssignCommand;
pub use attendance::AttendanceCommand;
pub use config::ConfigCommand;
pub use holiday::HolidayCommand;
pub use leave::LeaveCommand;
pub use staff::StaffCommand;
pub use transfer::TransferCommand;
pub use unit::UnitCommand;

/// What every data command runs against
pub struct Context {
    pub service: Personnel,
    pub out: Output,
}
