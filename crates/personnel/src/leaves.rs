use crate::dto::{CheckedInput, LeaveInput};
use crate::error::{ActionError, ActionResult};
use crate::query::{paginate, Filter, Listing};
use crate::store::{blank_to_none, literal, require, Database};
use chrono::NaiveDate;
use domain::{LeaveId, LeaveListing, LeaveRequest, LeaveStatus, LeaveType, Page, PageRequest, StaffId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Listing filter; `query` matches staff names and staff number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveFilter {
    pub query: String,
    pub leave_type: Option<LeaveType>,
    /// Inclusive bounds on the start date
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub struct LeaveManager {
    db: Arc<Database>,
}

impl LeaveManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(staff_id = %input.staff_id, kind = %input.leave_type))]
    pub async fn request_leave(&self, input: LeaveInput) -> ActionResult<LeaveId> {
        input.check()?;

        let conn = self.db.conn()?;
        require(&conn, "staffs", "staff", input.staff_id.get())?;

        let id: i64 = conn.query_row(
            "INSERT INTO leave_requests (staff_id, type, start_date, end_date, draft_text, request_pdf, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
            params![
                input.staff_id.get(),
                input.leave_type.as_str(),
                input.start_date,
                input.end_date,
                blank_to_none(input.draft_text),
                blank_to_none(input.request_pdf),
                LeaveStatus::Pending.as_str(),
            ],
            |row| row.get(0),
        )?;

        info!(leave_id = id, "leave requested");
        Ok(LeaveId::new(id))
    }

    #[instrument(skip(self))]
    pub async fn get_leave(&self, id: LeaveId) -> ActionResult<LeaveRequest> {
        let conn = self.db.conn()?;
        load(&conn, id)
    }

    /// PENDING -> APPROVED, recording the approval document if given
    #[instrument(skip(self))]
    pub async fn approve_leave(&self, id: LeaveId, approval_pdf: Option<String>) -> ActionResult<LeaveRequest> {
        self.advance(id, LeaveStatus::Approved, blank_to_none(approval_pdf))
    }

    /// APPROVED -> ON_LEAVE
    #[instrument(skip(self))]
    pub async fn start_leave(&self, id: LeaveId) -> ActionResult<LeaveRequest> {
        self.advance(id, LeaveStatus::OnLeave, None)
    }

    fn advance(&self, id: LeaveId, target: LeaveStatus, approval_pdf: Option<String>) -> ActionResult<LeaveRequest> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let current = load(&tx, id)?;
        let status = current.status.transition_to(target)?;
        tx.execute(
            "UPDATE leave_requests SET status = ?1, approval_pdf = COALESCE(?2, approval_pdf) WHERE id = ?3",
            params![status.as_str(), approval_pdf, id.get()],
        )?;
        let updated = load(&tx, id)?;

        tx.commit()?;
        info!(from = %current.status, to = %status, "leave status changed");
        Ok(updated)
    }

    /// Newest start date first
    #[instrument(skip(self))]
    pub async fn fetch_leave_page(&self, filter: &LeaveFilter, page: PageRequest) -> ActionResult<Page<LeaveListing>> {
        let mut clauses = Filter::new();
        if let Some(kind) = filter.leave_type {
            clauses.eq("lr.type", kind.as_str().to_string());
        }
        clauses.search(
            &["s.first_name", "s.middle_name", "s.last_name", "s.staff_number"],
            &filter.query,
        );
        clauses.date_range("lr.start_date", filter.from, filter.to)?;

        let conn = self.db.conn()?;
        paginate(
            &conn,
            &Listing {
                select: "lr.id, s.staff_number, s.first_name, s.middle_name, s.last_name, \
                         lr.type, lr.start_date, lr.end_date, lr.status",
                from: "FROM leave_requests lr JOIN staffs s ON s.id = lr.staff_id",
                order_by: "lr.start_date DESC, lr.id DESC",
            },
            &clauses,
            page,
            |row| {
                Ok(LeaveListing {
                    id: LeaveId::new(row.get(0)?),
                    staff_number: row.get(1)?,
                    first_name: row.get(2)?,
                    middle_name: row.get(3)?,
                    last_name: row.get(4)?,
                    leave_type: literal(row, 5)?,
                    start_date: row.get(6)?,
                    end_date: row.get(7)?,
                    status: literal(row, 8)?,
                })
            },
        )
    }

    /// Leave of any status spanning `date`
    #[instrument(skip(self))]
    pub async fn leave_on(&self, date: NaiveDate) -> ActionResult<Vec<LeaveRequest>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, staff_id, type, start_date, end_date, draft_text, request_pdf, approval_pdf, status
             FROM leave_requests
             WHERE start_date <= ?1 AND (end_date IS NULL OR end_date >= ?1)
             ORDER BY start_date, id",
        )?;
        let rows = stmt
            .query_map([date], leave_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn load(conn: &Connection, id: LeaveId) -> ActionResult<LeaveRequest> {
    conn.query_row(
        "SELECT id, staff_id, type, start_date, end_date, draft_text, request_pdf, approval_pdf, status
         FROM leave_requests WHERE id = ?1",
        [id.get()],
        leave_from_row,
    )
    .optional()?
    .ok_or_else(|| ActionError::not_found("leave request", id))
}

fn leave_from_row(row: &Row<'_>) -> rusqlite::Result<LeaveRequest> {
    Ok(LeaveRequest {
        id: LeaveId::new(row.get(0)?),
        staff_id: StaffId::new(row.get(1)?),
        leave_type: literal(row, 2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        draft_text: row.get(5)?,
        request_pdf: row.get(6)?,
        approval_pdf: row.get(7)?,
        status: literal(row, 8)?,
    })
}
