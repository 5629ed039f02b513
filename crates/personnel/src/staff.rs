use crate::dto::{CheckedInput, StaffInput};
use crate::error::{ActionError, ActionResult};
use crate::query::{paginate, Filter, Listing};
use crate::store::{blank_to_none, literal, Database};
use domain::{Page, PageRequest, Staff, StaffId};
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;
use tracing::{info, instrument};

const STAFF_COLUMNS: &str = "s.id, s.first_name, s.middle_name, s.last_name, s.email, s.phone, \
     s.gender, s.rank, s.staff_number, s.ippd_number, s.address, s.status, \
     s.created_at, s.updated_at";

/// Columns matched by the staff search box
const SEARCH_COLUMNS: &[&str] = &[
    "s.first_name",
    "s.middle_name",
    "s.last_name",
    "s.email",
    "s.phone",
    "s.staff_number",
    "s.ippd_number",
];

pub struct StaffManager {
    db: Arc<Database>,
}

impl StaffManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(staff_number = %input.staff_number))]
    pub async fn create_staff(&self, input: StaffInput) -> ActionResult<StaffId> {
        input.check()?;
        let input = normalize(input);

        let conn = self.db.conn()?;
        let id: i64 = conn.query_row(
            "INSERT INTO staffs (first_name, middle_name, last_name, email, phone, gender, rank,
                                 staff_number, ippd_number, address, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) RETURNING id",
            params![
                input.first_name,
                input.middle_name,
                input.last_name,
                input.email,
                input.phone,
                input.gender.as_str(),
                input.rank,
                input.staff_number,
                input.ippd_number,
                input.address,
                input.status.as_str(),
            ],
            |row| row.get(0),
        )?;

        info!(staff_id = id, "staff created");
        Ok(StaffId::new(id))
    }

    #[instrument(skip(self, input))]
    pub async fn update_staff(&self, id: StaffId, input: StaffInput) -> ActionResult<()> {
        input.check()?;
        let input = normalize(input);

        let conn = self.db.conn()?;
        let changed = conn.execute(
            "UPDATE staffs SET first_name = ?1, middle_name = ?2, last_name = ?3, email = ?4,
                               phone = ?5, gender = ?6, rank = ?7, staff_number = ?8,
                               ippd_number = ?9, address = ?10, status = ?11
             WHERE id = ?12",
            params![
                input.first_name,
                input.middle_name,
                input.last_name,
                input.email,
                input.phone,
                input.gender.as_str(),
                input.rank,
                input.staff_number,
                input.ippd_number,
                input.address,
                input.status.as_str(),
                id.get(),
            ],
        )?;
        if changed == 0 {
            return Err(ActionError::not_found("staff", id));
        }

        info!("staff updated");
        Ok(())
    }

    /// Delete a staff record; assignments, leave, transfers and attendance cascade
    #[instrument(skip(self))]
    pub async fn delete_staff(&self, id: StaffId) -> ActionResult<()> {
        let conn = self.db.conn()?;
        if conn.execute("DELETE FROM staffs WHERE id = ?1", [id.get()])? == 0 {
            return Err(ActionError::not_found("staff", id));
        }
        info!("staff deleted");
        Ok(())
    }

    /// Look up by numeric id or by staff number
    #[instrument(skip(self))]
    pub async fn get_staff(&self, identifier: &str) -> ActionResult<Option<Staff>> {
        let identifier = identifier.trim();
        let numeric = identifier.parse::<i64>().ok();

        let conn = self.db.conn()?;
        let staff = conn
            .query_row(
                &format!(
                    "SELECT {STAFF_COLUMNS} FROM staffs s
                     WHERE s.id = ?1 OR s.staff_number = ?2
                     ORDER BY s.id = ?1 DESC LIMIT 1"
                ),
                params![numeric, identifier],
                staff_from_row,
            )
            .optional()?;
        Ok(staff)
    }

    /// Every staff member ordered by last then first name
    #[instrument(skip(self))]
    pub async fn list_staff(&self) -> ActionResult<Vec<Staff>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staffs s ORDER BY s.last_name, s.first_name, s.id"
        ))?;
        let staff = stmt
            .query_map([], staff_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(staff)
    }

    /// Oldest records first; `query` matches names, email, phone, staff and IPPD number
    #[instrument(skip(self))]
    pub async fn fetch_staff_page(&self, query: &str, page: PageRequest) -> ActionResult<Page<Staff>> {
        let mut filter = Filter::new();
        filter.search(SEARCH_COLUMNS, query);

        let conn = self.db.conn()?;
        paginate(
            &conn,
            &Listing {
                select: STAFF_COLUMNS,
                from: "FROM staffs s",
                order_by: "s.created_at ASC, s.id ASC",
            },
            &filter,
            page,
            staff_from_row,
        )
    }
}

fn normalize(mut input: StaffInput) -> StaffInput {
    input.first_name = input.first_name.trim().to_string();
    input.last_name = input.last_name.trim().to_string();
    input.email = input.email.trim().to_string();
    input.staff_number = input.staff_number.trim().to_string();
    input.middle_name = blank_to_none(input.middle_name);
    input.phone = blank_to_none(input.phone);
    input.rank = blank_to_none(input.rank);
    input.ippd_number = blank_to_none(input.ippd_number);
    input.address = blank_to_none(input.address);
    input
}

fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<Staff> {
    Ok(Staff {
        id: StaffId::new(row.get(0)?),
        first_name: row.get(1)?,
        middle_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        gender: literal(row, 6)?,
        rank: row.get(7)?,
        staff_number: row.get(8)?,
        ippd_number: row.get(9)?,
        address: row.get(10)?,
        status: literal(row, 11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}
