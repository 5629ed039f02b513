//! Domain Value Objects - immutable domain concepts
//!
//! Value objects carry no identity of their own. Enumerations here are stored
//! as their upper-case literal (`ON_DUTY`, `PENDING`, ...).

/// Declares a closed set of upper-case literals with `as_str`, `Display`,
/// `FromStr` and serde in the same spelling.
macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $lit:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $lit)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $lit),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($lit => Ok($name::$variant),)+
                    _ => Err(crate::errors::DomainError::invalid_enum($field, s)),
                }
            }
        }
    };
}

pub mod attendance;
pub mod ids;
pub mod leave;
pub mod role_titles;
pub mod staff_profile;
pub mod transfer;

pub use attendance::AttendanceStatus;
pub use ids::{AssignmentId, AttendanceId, LeaveId, RoleId, StaffId, TransferId, UnitId};
pub use leave::{LeaveStatus, LeaveType};
pub use role_titles::{RoleSyncPlan, RoleTitles};
pub use staff_profile::{Gender, StaffStatus};
pub use transfer::{TransferStatus, TransferType};
