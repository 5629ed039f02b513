//! Typed row identifiers
//!
//! Every table uses an integer primary key; wrapping them keeps a staff id
//! from being passed where a role id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw value, for storage bindings
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

row_id!(
    /// Identifier of an organizational unit
    UnitId
);
row_id!(
    /// Identifier of a role row (scoped to one unit)
    RoleId
);
row_id!(
    /// Identifier of a staff record
    StaffId
);
row_id!(
    /// Identifier of a staff assignment
    AssignmentId
);
row_id!(LeaveId);
row_id!(TransferId);
row_id!(AttendanceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: UnitId = " 42 ".parse().expect("numeric id parses");
        assert_eq!(id, UnitId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<StaffId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&RoleId::new(7)).expect("serialize");
        assert_eq!(json, "7");
        let back: RoleId = serde_json::from_str("7").expect("deserialize");
        assert_eq!(back.get(), 7);
    }
}
