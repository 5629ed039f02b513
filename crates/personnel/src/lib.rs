//! Personnel back office over SQLite
//!
//! Each manager owns one concern and shares a single [`Database`] pool:
//! - [`OrgUnitManager`]: unit hierarchy and role catalogues
//! - [`AssignmentManager`]: staff holding roles in units
//! - [`StaffManager`], [`LeaveManager`], [`TransferManager`],
//!   [`AttendanceManager`], [`HolidayManager`]
//!
//! Every operation returns [`ActionResult`]; [`ActionState`] renders an
//! outcome for the presentation layer.

use anyhow::Result;
use domain::config::PersonnelConfig;
use domain::PageRequest;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub mod assignments;
pub mod attendance;
pub mod dto;
pub mod error;
pub mod holidays;
pub mod leaves;
pub mod org_units;
pub mod query;
pub mod staff;
pub mod store;
pub mod transfers;

pub use assignments::AssignmentManager;
pub use attendance::{AttendanceManager, BatchFailure, BatchReport};
pub use dto::{
    AssignInput, AttendanceInput, CheckedInput, CreateUnitInput, HolidayInput, LeaveInput,
    StaffInput, TransferInput, UpdateUnitInput,
};
pub use error::{ActionError, ActionResult, ActionState, ConflictKind, FieldErrors};
pub use holidays::HolidayManager;
pub use leaves::{LeaveFilter, LeaveManager};
pub use org_units::OrgUnitManager;
pub use staff::StaffManager;
pub use store::Database;
pub use transfers::{TransferFilter, TransferManager};

/// All managers over one database
pub struct Personnel {
    db: Arc<Database>,
    page_size: u32,
    pub org: OrgUnitManager,
    pub assignments: AssignmentManager,
    pub staff: StaffManager,
    pub leaves: LeaveManager,
    pub transfers: TransferManager,
    pub attendance: AttendanceManager,
    pub holidays: HolidayManager,
}

impl Personnel {
    pub fn new(db: Arc<Database>, config: &PersonnelConfig) -> Self {
        Self {
            org: OrgUnitManager::new(db.clone(), config.org.role_sync),
            assignments: AssignmentManager::new(db.clone()),
            staff: StaffManager::new(db.clone()),
            leaves: LeaveManager::new(db.clone()),
            transfers: TransferManager::new(db.clone()),
            attendance: AttendanceManager::new(db.clone()),
            holidays: HolidayManager::new(db.clone()),
            page_size: config.pagination.page_size,
            db,
        }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Request for 1-based `page` at the configured page size
    pub fn page(&self, page: u32) -> ActionResult<PageRequest> {
        Ok(PageRequest::new(page, self.page_size)?)
    }
}

/// Open the configured database and build every manager
///
/// # Example
/// ```no_run
/// use domain::config::PersonnelConfig;
/// use personnel::{create_service, CreateUnitInput};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let service = create_service(&PersonnelConfig::default()).await?;
///
///     let hq = service
///         .org
///         .create_unit(CreateUnitInput::new("Headquarters").with_roles(["Commander"]))
///         .await?;
///
///     let tree = service.org.list_tree().await?;
///     assert_eq!(tree[0].id, hq);
///     Ok(())
/// }
/// ```
pub async fn create_service(config: &PersonnelConfig) -> Result<Personnel> {
    let db = Database::open(&config.database.path, config.database.pool_size).await?;
    info!(
        role_sync = config.org.role_sync.as_str(),
        page_size = config.pagination.page_size,
        "personnel service ready"
    );
    Ok(Personnel::new(Arc::new(db), config))
}

/// Service at `db_path` with default settings
pub async fn create_default_service<P: AsRef<Path>>(db_path: P) -> Result<Personnel> {
    let mut config = PersonnelConfig::default();
    config.database.path = db_path.as_ref().to_path_buf();
    create_service(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_service_creation() {
        let temp_dir = TempDir::new().expect("temp dir");
        let service = create_default_service(temp_dir.path().join("test.db"))
            .await
            .expect("service should open");

        let id = service
            .org
            .create_unit(CreateUnitInput::new("HQ"))
            .await
            .expect("unit should be created");

        let tree = service.org.list_tree().await.expect("tree");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, id);
    }

    #[tokio::test]
    async fn test_page_uses_configured_size() {
        let temp_dir = TempDir::new().expect("temp dir");
        let mut config = PersonnelConfig::default();
        config.database.path = temp_dir.path().join("test.db");
        config.pagination.page_size = 25;

        let service = create_service(&config).await.expect("service");
        let page = service.page(2).expect("page");
        assert_eq!(page.page_size(), 25);
        assert_eq!(page.offset(), 25);
        assert!(service.page(0).is_err());
    }
}
