use crate::value_objects::{StaffId, TransferId, TransferStatus, TransferType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub staff_id: StaffId,
    #[serde(rename = "type")]
    pub transfer_type: TransferType,
    pub letter_pdf: Option<String>,
    pub draft_text: Option<String>,
    pub from_unit: Option<String>,
    pub to_unit: Option<String>,
    pub requested_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub status: TransferStatus,
}

/// Transfer row as listed, with the staff member's identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferListing {
    pub id: TransferId,
    pub staff_id: StaffId,
    pub staff_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(rename = "type")]
    pub transfer_type: TransferType,
    pub from_unit: Option<String>,
    pub to_unit: Option<String>,
    pub requested_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub status: TransferStatus,
}
