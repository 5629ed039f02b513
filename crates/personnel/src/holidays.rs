use crate::dto::{CheckedInput, HolidayInput};
use crate::error::{ActionError, ActionResult};
use crate::store::Database;
use chrono::NaiveDate;
use domain::Holiday;
use rusqlite::params;
use std::sync::Arc;
use tracing::{info, instrument};

/// Public holiday calendar
pub struct HolidayManager {
    db: Arc<Database>,
}

impl HolidayManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store every day from `from` to `to` (inclusive). Existing days take the
    /// new description. Returns the number of days written.
    #[instrument(skip(self, input), fields(from = %input.from, to = ?input.to))]
    pub async fn add_holidays(&self, input: HolidayInput) -> ActionResult<usize> {
        input.check()?;
        let description = input.description.trim();
        let days = input
            .from
            .iter_days()
            .take_while(|day| *day <= input.to.unwrap_or(input.from))
            .collect::<Vec<_>>();

        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO holidays (date, description) VALUES (?1, ?2)
                 ON CONFLICT (date) DO UPDATE SET description = excluded.description",
            )?;
            for day in &days {
                stmt.execute(params![day, description])?;
            }
        }
        tx.commit()?;

        info!(days = days.len(), "holidays saved");
        Ok(days.len())
    }

    #[instrument(skip(self))]
    pub async fn remove_holiday(&self, date: NaiveDate) -> ActionResult<()> {
        let conn = self.db.conn()?;
        if conn.execute("DELETE FROM holidays WHERE date = ?1", [date])? == 0 {
            return Err(ActionError::not_found("holiday", date));
        }
        Ok(())
    }

    /// Holidays in the inclusive range, earliest first
    #[instrument(skip(self))]
    pub async fn list_holidays(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> ActionResult<Vec<Holiday>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, description FROM holidays
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY date",
        )?;
        let rows = stmt
            .query_map(params![from, to], |row| {
                Ok(Holiday {
                    date: row.get(0)?,
                    description: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub async fn is_holiday(&self, date: NaiveDate) -> ActionResult<bool> {
        let conn = self.db.conn()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM holidays WHERE date = ?1)",
            [date],
            |row| row.get(0),
        )?;
        Ok(found)
    }
}
