use crate::dto::AttendanceInput;
use crate::error::{ActionError, ActionResult};
use crate::query::like_pattern;
use crate::store::{literal, require, Database};
use chrono::NaiveDate;
use domain::{
    AttendanceId, AttendanceRecord, AttendanceSheetRow, AttendanceStatus, AttendanceSummary,
    LeaveStatus, StaffId, UnitId,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of saving a whole sheet; one bad row does not stop the rest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub saved: Vec<StaffId>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub staff_id: StaffId,
    pub message: String,
}

pub struct AttendanceManager {
    db: Arc<Database>,
}

impl AttendanceManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// One mark per staff per day; marking again overwrites the status
    #[instrument(skip(self))]
    pub async fn mark_attendance(&self, input: AttendanceInput) -> ActionResult<AttendanceId> {
        let conn = self.db.conn()?;
        let id = upsert(&conn, &input)?;
        info!(attendance_id = id.get(), status = %input.status, "attendance marked");
        Ok(id)
    }

    /// Mark every entry for `date`, collecting per-row failures
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn save_attendance_batch(
        &self,
        date: NaiveDate,
        entries: &[(StaffId, AttendanceStatus)],
    ) -> ActionResult<BatchReport> {
        let conn = self.db.conn()?;
        let mut report = BatchReport::default();

        for &(staff_id, status) in entries {
            let input = AttendanceInput {
                staff_id,
                date,
                status,
            };
            match upsert(&conn, &input) {
                Ok(_) => report.saved.push(staff_id),
                Err(err) if err.is_retryable() => return Err(err),
                Err(err) => {
                    warn!(%staff_id, error = %err, "attendance row rejected");
                    report.failed.push(BatchFailure {
                        staff_id,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            saved = report.saved.len(),
            failed = report.failed.len(),
            "attendance sheet saved"
        );
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn get_attendance(&self, staff_id: StaffId, date: NaiveDate) -> ActionResult<Option<AttendanceRecord>> {
        let conn = self.db.conn()?;
        let record = conn
            .query_row(
                "SELECT id, staff_id, date, status FROM attendance WHERE staff_id = ?1 AND date = ?2",
                params![staff_id.get(), date],
                |row| {
                    Ok(AttendanceRecord {
                        id: AttendanceId::new(row.get(0)?),
                        staff_id: StaffId::new(row.get(1)?),
                        date: row.get(2)?,
                        status: literal(row, 3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Sheet of staff assigned to `unit_id`, one row each; unmarked staff read ABSENT
    #[instrument(skip(self))]
    pub async fn unit_attendance(
        &self,
        unit_id: UnitId,
        date: NaiveDate,
        query: Option<&str>,
    ) -> ActionResult<Vec<AttendanceSheetRow>> {
        let conn = self.db.conn()?;
        require(&conn, "org_units", "unit", unit_id.get())
            .map_err(|e| match e {
                ActionError::Reference { .. } => ActionError::not_found("unit", unit_id),
                other => other,
            })?;

        let pattern = query
            .filter(|q| !q.trim().is_empty())
            .map(like_pattern);

        let mut stmt = conn.prepare(
            "SELECT a.id, s.id, s.staff_number,
                    s.first_name || ' ' || s.last_name,
                    COALESCE(a.status, 'ABSENT')
             FROM staffs s
             LEFT JOIN attendance a ON a.staff_id = s.id AND a.date = ?2
             WHERE EXISTS (SELECT 1 FROM staff_assignments sa
                           WHERE sa.staff_id = s.id AND sa.org_unit_id = ?1 AND sa.is_primary = 1)
               AND (?3 IS NULL
                    OR s.first_name LIKE ?3 ESCAPE '\\' OR s.last_name LIKE ?3 ESCAPE '\\'
                    OR s.staff_number LIKE ?3 ESCAPE '\\')
             ORDER BY s.last_name, s.first_name, s.id",
        )?;
        let rows = stmt
            .query_map(params![unit_id.get(), date, pattern], |row| {
                Ok(AttendanceSheetRow {
                    id: row.get::<_, Option<i64>>(0)?.map(AttendanceId::new),
                    staff_id: StaffId::new(row.get(1)?),
                    staff_number: row.get(2)?,
                    staff_name: row.get(3)?,
                    status: literal(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Present/absent counts among assigned staff plus staff on leave that day.
    /// Each staff member counts once however many assignments they hold.
    #[instrument(skip(self))]
    pub async fn attendance_summary(&self, date: NaiveDate, unit_id: Option<UnitId>) -> ActionResult<AttendanceSummary> {
        let conn = self.db.conn()?;
        let unit = unit_id.map(|u| u.get());

        let count_marked = |status: AttendanceStatus| -> ActionResult<u32> {
            let n: u32 = conn.query_row(
                "SELECT COUNT(*) FROM attendance a
                 WHERE a.date = ?1 AND a.status = ?2
                   AND EXISTS (SELECT 1 FROM staff_assignments sa
                               WHERE sa.staff_id = a.staff_id
                                 AND (?3 IS NULL OR sa.org_unit_id = ?3))",
                params![date, status.as_str(), unit],
                |row| row.get(0),
            )?;
            Ok(n)
        };
        let present = count_marked(AttendanceStatus::Present)?;
        let absent = count_marked(AttendanceStatus::Absent)?;

        let off_duty: u32 = conn.query_row(
            "SELECT COUNT(DISTINCT lr.staff_id) FROM leave_requests lr
             WHERE lr.status = ?1
               AND lr.start_date <= ?2 AND (lr.end_date IS NULL OR lr.end_date >= ?2)
               AND (?3 IS NULL OR EXISTS (SELECT 1 FROM staff_assignments sa
                                          WHERE sa.staff_id = lr.staff_id AND sa.org_unit_id = ?3))",
            params![LeaveStatus::OnLeave.as_str(), date, unit],
            |row| row.get(0),
        )?;

        Ok(AttendanceSummary {
            present,
            absent,
            off_duty,
        })
    }
}

fn upsert(conn: &Connection, input: &AttendanceInput) -> ActionResult<AttendanceId> {
    let id: i64 = conn
        .query_row(
            "INSERT INTO attendance (staff_id, date, status) VALUES (?1, ?2, ?3)
             ON CONFLICT (staff_id, date)
             DO UPDATE SET status = excluded.status, updated_at = CURRENT_TIMESTAMP
             RETURNING id",
            params![input.staff_id.get(), input.date, input.status.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| ActionError::from(e).with_reference("staff", input.staff_id.get()))?;
    Ok(AttendanceId::new(id))
}
