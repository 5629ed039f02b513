use crate::dto::{CheckedInput, TransferInput};
use crate::error::{ActionError, ActionResult};
use crate::query::{paginate, Filter, Listing};
use crate::store::{blank_to_none, literal, require, Database};
use chrono::NaiveDate;
use domain::{
    Page, PageRequest, StaffId, Transfer, TransferId, TransferListing, TransferStatus, TransferType,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Listing filter; `query` matches "First Last" or the staff number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFilter {
    pub query: String,
    pub transfer_type: Option<TransferType>,
    /// Inclusive bounds on the request day
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub struct TransferManager {
    db: Arc<Database>,
}

impl TransferManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a transfer request; it starts PENDING
    #[instrument(skip(self, input), fields(staff_id = %input.staff_id, kind = %input.transfer_type))]
    pub async fn create_transfer(&self, input: TransferInput) -> ActionResult<TransferId> {
        input.check()?;

        let conn = self.db.conn()?;
        require(&conn, "staffs", "staff", input.staff_id.get())?;

        let id: i64 = conn.query_row(
            "INSERT INTO transfers (staff_id, type, letter_pdf, draft_text, from_unit, to_unit, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
            params![
                input.staff_id.get(),
                input.transfer_type.as_str(),
                blank_to_none(input.letter_pdf),
                blank_to_none(input.draft_text),
                blank_to_none(input.from_unit),
                blank_to_none(input.to_unit),
                TransferStatus::Pending.as_str(),
            ],
            |row| row.get(0),
        )?;

        info!(transfer_id = id, "transfer requested");
        Ok(TransferId::new(id))
    }

    #[instrument(skip(self))]
    pub async fn get_transfer(&self, id: TransferId) -> ActionResult<Transfer> {
        let conn = self.db.conn()?;
        load(&conn, id)
    }

    /// PENDING -> COMPLETED, stamping `completed_at`
    #[instrument(skip(self))]
    pub async fn complete_transfer(&self, id: TransferId) -> ActionResult<Transfer> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let current = load(&tx, id)?;
        let status = current.status.transition_to(TransferStatus::Completed)?;
        tx.execute(
            "UPDATE transfers SET status = ?1, completed_at = CURRENT_TIMESTAMP WHERE id = ?2",
            params![status.as_str(), id.get()],
        )?;
        let updated = load(&tx, id)?;

        tx.commit()?;
        info!("transfer completed");
        Ok(updated)
    }

    /// Most recent request first
    #[instrument(skip(self))]
    pub async fn fetch_transfer_page(
        &self,
        filter: &TransferFilter,
        page: PageRequest,
    ) -> ActionResult<Page<TransferListing>> {
        let mut clauses = Filter::new();
        if let Some(kind) = filter.transfer_type {
            clauses.eq("t.type", kind.as_str().to_string());
        }
        clauses.search(
            &["s.first_name || ' ' || s.last_name", "s.staff_number"],
            &filter.query,
        );
        clauses.date_range("date(t.requested_at)", filter.from, filter.to)?;

        let conn = self.db.conn()?;
        paginate(
            &conn,
            &Listing {
                select: "t.id, t.staff_id, s.staff_number, s.first_name, s.middle_name, s.last_name, \
                         t.type, t.from_unit, t.to_unit, t.requested_at, t.completed_at, t.status",
                from: "FROM transfers t JOIN staffs s ON s.id = t.staff_id",
                order_by: "t.requested_at DESC, t.id DESC",
            },
            &clauses,
            page,
            |row| {
                Ok(TransferListing {
                    id: TransferId::new(row.get(0)?),
                    staff_id: StaffId::new(row.get(1)?),
                    staff_number: row.get(2)?,
                    first_name: row.get(3)?,
                    middle_name: row.get(4)?,
                    last_name: row.get(5)?,
                    transfer_type: literal(row, 6)?,
                    from_unit: row.get(7)?,
                    to_unit: row.get(8)?,
                    requested_at: row.get(9)?,
                    completed_at: row.get(10)?,
                    status: literal(row, 11)?,
                })
            },
        )
    }
}

fn load(conn: &Connection, id: TransferId) -> ActionResult<Transfer> {
    conn.query_row(
        "SELECT id, staff_id, type, letter_pdf, draft_text, from_unit, to_unit,
                requested_at, completed_at, status
         FROM transfers WHERE id = ?1",
        [id.get()],
        |row| {
            Ok(Transfer {
                id: TransferId::new(row.get(0)?),
                staff_id: StaffId::new(row.get(1)?),
                transfer_type: literal(row, 2)?,
                letter_pdf: row.get(3)?,
                draft_text: row.get(4)?,
                from_unit: row.get(5)?,
                to_unit: row.get(6)?,
                requested_at: row.get(7)?,
                completed_at: row.get(8)?,
                status: literal(row, 9)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| ActionError::not_found("transfer", id))
}
