use crate::error::{ActionError, ActionResult};
use anyhow::{Context, Result};
use domain::DomainError;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, instrument};

type DbPool = Pool<SqliteConnectionManager>;
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Shared SQLite handle. Every manager borrows connections from one pool.
pub struct Database {
    pool: DbPool,
    path: PathBuf,
}

impl Database {
    /// Open (or create) the database file and bring the schema up to date
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open<P: AsRef<Path>>(path: P, pool_size: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        // foreign_keys is per connection, so every pooled connection gets it
        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
        });
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .context("Failed to create connection pool")?;

        {
            let conn = pool.get()?;
            Self::init_schema(&conn).context("Failed to initialize schema")?;
        }

        info!(pool_size, "database ready");
        Ok(Self { pool, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn conn(&self) -> ActionResult<PooledConn> {
        Ok(self.pool.get()?)
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            r#"
            -- Organisational hierarchy; a unit with children cannot be deleted
            CREATE TABLE IF NOT EXISTS org_units (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id INTEGER REFERENCES org_units(id) ON DELETE RESTRICT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                hierarchy_path TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                org_unit_id INTEGER NOT NULL REFERENCES org_units(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                is_command INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (org_unit_id, title)
            );

            CREATE TABLE IF NOT EXISTS staffs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                middle_name TEXT,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT,
                gender TEXT NOT NULL CHECK (gender IN ('MALE', 'FEMALE', 'OTHER')),
                rank TEXT,
                staff_number TEXT NOT NULL UNIQUE,
                ippd_number TEXT UNIQUE,
                address TEXT,
                status TEXT NOT NULL DEFAULT 'ON_DUTY' CHECK (status IN ('ON_DUTY', 'SICK', 'LEAVE')),
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS staff_assignments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                staff_id INTEGER NOT NULL REFERENCES staffs(id) ON DELETE CASCADE,
                role_id INTEGER NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
                org_unit_id INTEGER NOT NULL REFERENCES org_units(id) ON DELETE CASCADE,
                start_date TEXT NOT NULL,
                end_date TEXT,
                is_primary INTEGER NOT NULL DEFAULT 1,
                UNIQUE (staff_id, role_id, org_unit_id)
            );

            CREATE TABLE IF NOT EXISTS transfers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                staff_id INTEGER NOT NULL REFERENCES staffs(id) ON DELETE CASCADE,
                type TEXT NOT NULL CHECK (type IN ('INCOMING', 'OUTGOING')),
                letter_pdf TEXT,
                draft_text TEXT,
                from_unit TEXT,
                to_unit TEXT,
                requested_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                completed_at TEXT,
                status TEXT NOT NULL DEFAULT 'PENDING' CHECK (status IN ('PENDING', 'COMPLETED'))
            );

            CREATE TABLE IF NOT EXISTS leave_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                staff_id INTEGER NOT NULL REFERENCES staffs(id) ON DELETE CASCADE,
                type TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT,
                draft_text TEXT,
                request_pdf TEXT,
                approval_pdf TEXT,
                status TEXT NOT NULL DEFAULT 'PENDING',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                staff_id INTEGER NOT NULL REFERENCES staffs(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('PRESENT', 'ABSENT')),
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (staff_id, date)
            );

            CREATE TABLE IF NOT EXISTS holidays (
                date TEXT PRIMARY KEY,
                description TEXT NOT NULL DEFAULT ''
            );

            -- Archive tables; no manager reads them yet
            CREATE TABLE IF NOT EXISTS correspondence (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reference TEXT,
                subject TEXT NOT NULL,
                body TEXT,
                direction TEXT NOT NULL DEFAULT 'INCOMING',
                pdf_path TEXT,
                reply_to INTEGER REFERENCES correspondence(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS incidents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                staff_id INTEGER REFERENCES staffs(id) ON DELETE SET NULL,
                org_unit_id INTEGER REFERENCES org_units(id) ON DELETE SET NULL,
                occurred_at TEXT NOT NULL,
                category TEXT,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_org_units_parent ON org_units(parent_id) WHERE parent_id IS NOT NULL;
            CREATE INDEX IF NOT EXISTS idx_org_units_path ON org_units(hierarchy_path);
            CREATE INDEX IF NOT EXISTS idx_assignments_unit ON staff_assignments(org_unit_id);
            CREATE INDEX IF NOT EXISTS idx_assignments_role ON staff_assignments(role_id);
            CREATE INDEX IF NOT EXISTS idx_staffs_name ON staffs(last_name, first_name);
            CREATE INDEX IF NOT EXISTS idx_leave_staff_dates ON leave_requests(staff_id, start_date);
            CREATE INDEX IF NOT EXISTS idx_transfers_staff ON transfers(staff_id);
            CREATE INDEX IF NOT EXISTS idx_transfers_requested ON transfers(requested_at DESC);
            CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);

            CREATE TRIGGER IF NOT EXISTS update_org_unit_timestamp
            AFTER UPDATE ON org_units
            BEGIN
                UPDATE org_units SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
            END;

            CREATE TRIGGER IF NOT EXISTS update_staff_timestamp
            AFTER UPDATE ON staffs
            BEGIN
                UPDATE staffs SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
            END;

            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;

        debug!("schema initialized");
        Ok(())
    }
}

/// Read an upper-case literal column into its value object
pub(crate) fn literal<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = DomainError>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn exists(conn: &Connection, table: &str, id: i64) -> ActionResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    let found: bool = conn.query_row(&sql, [id], |row| row.get(0))?;
    Ok(found)
}

/// Fail with a reference error unless row `id` exists in `table`
pub(crate) fn require(conn: &Connection, table: &str, entity: &'static str, id: i64) -> ActionResult<()> {
    if exists(conn, table, id)? {
        Ok(())
    } else {
        Err(ActionError::reference(entity, id))
    }
}

/// Empty strings are stored as NULL
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
