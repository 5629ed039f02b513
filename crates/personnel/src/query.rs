//! Search filters and pagination shared by the listing operations
//!
//! A [`Filter`] collects `WHERE` clauses with numbered placeholders and owns
//! their values; [`paginate`] runs the count and the page query against the
//! same clauses so `total_pages` always matches the items returned.

use crate::error::ActionResult;
use chrono::NaiveDate;
use domain::{DomainError, Page, PageRequest};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use tracing::debug;

/// `%query%` with LIKE wildcards in the query taken literally
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Default)]
pub struct Filter {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&mut self, value: Value) -> usize {
        self.values.push(value);
        self.values.len()
    }

    /// Raw clause; `build` receives the placeholder number bound to `value`
    pub fn push(&mut self, value: Value, build: impl FnOnce(usize) -> String) -> &mut Self {
        let n = self.bind(value);
        self.clauses.push(build(n));
        self
    }

    pub fn eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.push(value.into(), |n| format!("{column} = ?{n}"))
    }

    /// Case-insensitive substring match on any of `columns`; blank queries add nothing
    pub fn search(&mut self, columns: &[&str], query: &str) -> &mut Self {
        if query.trim().is_empty() || columns.is_empty() {
            return self;
        }
        let n = self.bind(Value::Text(like_pattern(query)));
        let any = columns
            .iter()
            .map(|column| format!("{column} LIKE ?{n} ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.clauses.push(format!("({any})"));
        self
    }

    /// Inclusive date bounds on `column` (an expression yielding `YYYY-MM-DD`)
    pub fn date_range(
        &mut self,
        column: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<&mut Self, DomainError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(DomainError::InvalidDateRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
        if let Some(from) = from {
            self.push(date_value(from), |n| format!("{column} >= ?{n}"));
        }
        if let Some(to) = to {
            self.push(date_value(to), |n| format!("{column} <= ?{n}"));
        }
        Ok(self)
    }

    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

pub fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

/// Shape of a paginated listing
pub struct Listing<'a> {
    pub select: &'a str,
    /// `FROM` plus joins
    pub from: &'a str,
    pub order_by: &'a str,
}

pub fn paginate<T, F>(
    conn: &Connection,
    listing: &Listing<'_>,
    filter: &Filter,
    page: PageRequest,
    map: F,
) -> ActionResult<Page<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let where_sql = filter.where_sql();

    let count_sql = format!("SELECT COUNT(*) {} {}", listing.from, where_sql);
    let total: i64 = conn.query_row(&count_sql, params_from_iter(filter.values()), |row| {
        row.get(0)
    })?;

    let n = filter.values().len();
    let page_sql = format!(
        "SELECT {} {} {} ORDER BY {} LIMIT ?{} OFFSET ?{}",
        listing.select,
        listing.from,
        where_sql,
        listing.order_by,
        n + 1,
        n + 2
    );
    let mut values = filter.values().to_vec();
    values.push(Value::Integer(page.limit()));
    values.push(Value::Integer(page.offset()));

    let mut stmt = conn.prepare(&page_sql)?;
    let items = stmt
        .query_map(params_from_iter(values.iter()), map)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(
        total,
        page = page.page(),
        returned = items.len(),
        "page fetched"
    );
    Ok(Page::new(items, page, total.max(0) as u64))
}
