use crate::value_objects::{Gender, StaffId, StaffStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Staff record. `email`, `staff_number` and `ippd_number` are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Gender,
    pub rank: Option<String>,
    pub staff_number: String,
    pub ippd_number: Option<String>,
    pub address: Option<String>,
    pub status: StaffStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Staff {
    /// "First Middle Last", skipping a missing middle name
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref() {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}
