use crate::dto::{AssignInput, CheckedInput};
use crate::error::{ActionError, ActionResult};
use crate::query::like_pattern;
use crate::store::{exists, require, Database};
use chrono::{Local, NaiveDate};
use domain::{
    Assignment, AssignmentDetail, AssignmentId, RoleId, StaffId, UnitCoverage, UnitId,
};
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const DETAIL_SELECT: &str = "
    SELECT a.id, a.staff_id, a.role_id, a.org_unit_id, a.start_date, a.end_date, a.is_primary,
           s.first_name, s.middle_name, s.last_name, s.email, s.staff_number, r.title
    FROM staff_assignments a
    JOIN staffs s ON s.id = a.staff_id
    JOIN roles r ON r.id = a.role_id";

/// Which staff member holds which role in which unit
pub struct AssignmentManager {
    db: Arc<Database>,
}

impl AssignmentManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Assign starting today. Every assignment puts the staff member on that unit's sheet.
    #[instrument(skip(self))]
    pub async fn assign(&self, input: AssignInput) -> ActionResult<AssignmentId> {
        self.assign_on(input, Local::now().date_naive()).await
    }

    #[instrument(skip(self))]
    pub async fn assign_on(&self, input: AssignInput, start_date: NaiveDate) -> ActionResult<AssignmentId> {
        input.check()?;
        let (Some(staff_id), Some(role_id), Some(unit_id)) =
            (input.staff_id, input.role_id, input.unit_id)
        else {
            return Err(ActionError::field("staff_id", "Staff is required"));
        };

        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        require(&tx, "staffs", "staff", staff_id.get())?;
        let role_unit: Option<i64> = tx
            .query_row(
                "SELECT org_unit_id FROM roles WHERE id = ?1",
                [role_id.get()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(role_unit) = role_unit else {
            return Err(ActionError::reference("role", role_id.get()));
        };
        if role_unit != unit_id.get() {
            require(&tx, "org_units", "unit", unit_id.get())?;
            warn!(%role_id, %unit_id, role_unit, "role belongs to another unit");
            return Err(ActionError::field(
                "role_id",
                "Role does not belong to the selected unit",
            ));
        }

        let id: i64 = tx.query_row(
            "INSERT INTO staff_assignments (staff_id, role_id, org_unit_id, start_date, is_primary)
             VALUES (?1, ?2, ?3, ?4, 1) RETURNING id",
            params![staff_id.get(), role_id.get(), unit_id.get(), start_date],
            |row| row.get(0),
        )?;

        tx.commit()?;
        info!(assignment_id = id, "staff assigned");
        Ok(AssignmentId::new(id))
    }

    #[instrument(skip(self))]
    pub async fn unassign(&self, id: AssignmentId) -> ActionResult<()> {
        let conn = self.db.conn()?;
        let deleted = conn.execute("DELETE FROM staff_assignments WHERE id = ?1", [id.get()])?;
        if deleted == 0 {
            return Err(ActionError::not_found("assignment", id));
        }
        info!("assignment removed");
        Ok(())
    }

    /// Assignments of one unit, most recent start first
    #[instrument(skip(self))]
    pub async fn list_assignments(&self, unit_id: UnitId) -> ActionResult<Vec<AssignmentDetail>> {
        let conn = self.db.conn()?;
        let sql = format!(
            "{DETAIL_SELECT} WHERE a.org_unit_id = ?1 ORDER BY a.start_date DESC, a.id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([unit_id.get()], detail_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Assignments across all units whose staff name, staff number or role
    /// title contains `query`
    #[instrument(skip(self))]
    pub async fn search_assignments(&self, query: &str) -> ActionResult<Vec<AssignmentDetail>> {
        let conn = self.db.conn()?;
        let sql = format!(
            "{DETAIL_SELECT}
             WHERE s.first_name LIKE ?1 ESCAPE '\\' OR s.middle_name LIKE ?1 ESCAPE '\\'
                OR s.last_name LIKE ?1 ESCAPE '\\' OR s.staff_number LIKE ?1 ESCAPE '\\'
                OR r.title LIKE ?1 ESCAPE '\\'
             ORDER BY a.start_date DESC, a.id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([like_pattern(query)], detail_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Assignments of one staff member across units, oldest start first
    #[instrument(skip(self))]
    pub async fn staff_assignments(&self, staff_id: StaffId) -> ActionResult<Vec<AssignmentDetail>> {
        let conn = self.db.conn()?;
        let sql = format!("{DETAIL_SELECT} WHERE a.staff_id = ?1 ORDER BY a.start_date, a.id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([staff_id.get()], detail_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Set or clear the end date; `end_date` may not precede the start
    #[instrument(skip(self))]
    pub async fn end_assignment(&self, id: AssignmentId, end_date: Option<NaiveDate>) -> ActionResult<()> {
        let conn = self.db.conn()?;
        let start: Option<NaiveDate> = conn
            .query_row(
                "SELECT start_date FROM staff_assignments WHERE id = ?1",
                [id.get()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(start) = start else {
            return Err(ActionError::not_found("assignment", id));
        };
        if matches!(end_date, Some(end) if end < start) {
            return Err(ActionError::field("end_date", "End date cannot be before start date"));
        }

        conn.execute(
            "UPDATE staff_assignments SET end_date = ?1 WHERE id = ?2",
            params![end_date, id.get()],
        )?;
        Ok(())
    }

    /// Role and assignment counts per unit, optionally limited to one unit's subtree
    #[instrument(skip(self))]
    pub async fn assignment_coverage(&self, root: Option<UnitId>) -> ActionResult<Vec<UnitCoverage>> {
        let conn = self.db.conn()?;
        if let Some(root) = root {
            if !exists(&conn, "org_units", root.get())? {
                return Err(ActionError::not_found("unit", root));
            }
        }

        let mut stmt = conn.prepare(
            "SELECT u.id, u.name,
                    (SELECT COUNT(*) FROM roles r WHERE r.org_unit_id = u.id),
                    (SELECT COUNT(DISTINCT a.role_id) FROM staff_assignments a WHERE a.org_unit_id = u.id),
                    (SELECT COUNT(*) FROM staff_assignments a WHERE a.org_unit_id = u.id)
             FROM org_units u
             WHERE ?1 IS NULL
                OR u.hierarchy_path LIKE (SELECT hierarchy_path FROM org_units WHERE id = ?1) || '%'
             ORDER BY u.id",
        )?;
        let rows = stmt
            .query_map([root.map(|r| r.get())], |row| {
                Ok(UnitCoverage {
                    unit_id: UnitId::new(row.get(0)?),
                    unit_name: row.get(1)?,
                    role_count: row.get(2)?,
                    filled_roles: row.get(3)?,
                    assignment_count: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn detail_from_row(row: &Row<'_>) -> rusqlite::Result<AssignmentDetail> {
    Ok(AssignmentDetail {
        assignment: Assignment {
            id: AssignmentId::new(row.get(0)?),
            staff_id: StaffId::new(row.get(1)?),
            role_id: RoleId::new(row.get(2)?),
            unit_id: UnitId::new(row.get(3)?),
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            is_primary: row.get(6)?,
        },
        first_name: row.get(7)?,
        middle_name: row.get(8)?,
        last_name: row.get(9)?,
        email: row.get(10)?,
        staff_number: row.get(11)?,
        role_title: row.get(12)?,
    })
}
