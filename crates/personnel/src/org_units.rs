use crate::dto::{CheckedInput, CreateUnitInput, UpdateUnitInput};
use crate::error::{ActionError, ActionResult, ConflictKind};
use crate::store::{exists, Database};
use domain::config::RoleSyncMode;
use domain::{build_forest, OrgUnit, Role, RoleId, RoleSyncPlan, UnitId, UnitRecord};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Org unit hierarchy and the role catalogue of each unit
pub struct OrgUnitManager {
    db: Arc<Database>,
    role_sync: RoleSyncMode,
}

impl OrgUnitManager {
    pub fn new(db: Arc<Database>, role_sync: RoleSyncMode) -> Self {
        Self { db, role_sync }
    }

    pub fn role_sync(&self) -> RoleSyncMode {
        self.role_sync
    }

    /// Insert a unit and its (deduplicated) role titles in one transaction
    #[instrument(skip(self, input), fields(name = %input.name, parent = ?input.parent_id))]
    pub async fn create_unit(&self, input: CreateUnitInput) -> ActionResult<UnitId> {
        input.check()?;

        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let parent_path = match input.parent_id {
            Some(parent) => {
                let path: Option<Option<String>> = tx
                    .query_row(
                        "SELECT hierarchy_path FROM org_units WHERE id = ?1",
                        [parent.get()],
                        |row| row.get(0),
                    )
                    .optional()?;
                match path {
                    Some(path) => path.unwrap_or_else(|| format!("/{parent}/")),
                    None => {
                        warn!(%parent, "parent unit does not exist");
                        return Err(ActionError::reference("unit", parent.get()));
                    }
                }
            }
            None => "/".to_string(),
        };

        let id: i64 = tx
            .query_row(
                "INSERT INTO org_units (parent_id, name, description) VALUES (?1, ?2, ?3) RETURNING id",
                params![input.parent_id.map(|p| p.get()), input.name.trim(), input.description],
                |row| row.get(0),
            )
            .map_err(|e| match input.parent_id {
                Some(parent) => ActionError::from(e).with_reference("unit", parent.get()),
                None => e.into(),
            })?;

        tx.execute(
            "UPDATE org_units SET hierarchy_path = ?1 WHERE id = ?2",
            params![format!("{parent_path}{id}/"), id],
        )?;
        let inserted = insert_roles(&tx, id, input.roles.iter())?;

        tx.commit()?;
        info!(unit_id = id, roles = inserted, "unit created");
        Ok(UnitId::new(id))
    }

    /// Rename/re-describe a unit and write back its role list.
    ///
    /// Returns what happened to the roles. Under [`RoleSyncMode::Replace`]
    /// every previous role is in `remove`.
    #[instrument(skip(self, input), fields(unit_id = %input.id))]
    pub async fn update_unit(&self, input: UpdateUnitInput) -> ActionResult<RoleSyncPlan> {
        input.check()?;

        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE org_units SET name = ?1, description = ?2 WHERE id = ?3",
            params![input.name.trim(), input.description, input.id.get()],
        )?;
        if changed == 0 {
            return Err(ActionError::not_found("unit", input.id));
        }

        let existing = unit_roles(&tx, input.id.get())?
            .into_iter()
            .map(|role| (role.id, role.title))
            .collect::<Vec<_>>();

        let plan = match self.role_sync {
            RoleSyncMode::Diff => input.roles.plan_sync(&existing),
            RoleSyncMode::Replace => RoleSyncPlan {
                keep: Vec::new(),
                remove: existing.iter().map(|(id, _)| *id).collect(),
                insert: input.roles.as_slice().to_vec(),
            },
        };

        if self.role_sync == RoleSyncMode::Replace {
            tx.execute("DELETE FROM roles WHERE org_unit_id = ?1", [input.id.get()])?;
        } else {
            let mut stmt = tx.prepare("DELETE FROM roles WHERE id = ?1")?;
            for role_id in &plan.remove {
                stmt.execute([role_id.get()])?;
            }
        }
        insert_roles(&tx, input.id.get(), plan.insert.iter().map(String::as_str))?;

        tx.commit()?;
        info!(
            mode = self.role_sync.as_str(),
            kept = plan.keep.len(),
            removed = plan.remove.len(),
            added = plan.insert.len(),
            "unit updated"
        );
        Ok(plan)
    }

    /// Delete a childless unit; its roles and assignments cascade
    #[instrument(skip(self))]
    pub async fn delete_unit(&self, id: UnitId) -> ActionResult<()> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let children: i64 = tx.query_row(
            "SELECT COUNT(*) FROM org_units WHERE parent_id = ?1",
            [id.get()],
            |row| row.get(0),
        )?;
        if children > 0 {
            warn!(children, "refusing to delete unit with children");
            return Err(ActionError::Conflict(ConflictKind::UnitHasChildren));
        }

        let deleted = tx.execute("DELETE FROM org_units WHERE id = ?1", [id.get()])?;
        if deleted == 0 {
            return Err(ActionError::not_found("unit", id));
        }

        tx.commit()?;
        info!("unit deleted");
        Ok(())
    }

    /// Every unit as a forest, children and roles ordered by id
    #[instrument(skip(self))]
    pub async fn list_tree(&self) -> ActionResult<Vec<OrgUnit>> {
        let conn = self.db.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, parent_id, name, description FROM org_units ORDER BY id",
        )?;
        let units = stmt
            .query_map([], |row| {
                Ok(UnitRecord {
                    id: UnitId::new(row.get(0)?),
                    parent_id: row.get::<_, Option<i64>>(1)?.map(UnitId::new),
                    name: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare("SELECT id, org_unit_id, title FROM roles ORDER BY id")?;
        let roles = stmt
            .query_map([], role_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(units = units.len(), roles = roles.len(), "assembling unit tree");
        Ok(build_forest(units, roles))
    }

    /// One unit with its subtree
    #[instrument(skip(self))]
    pub async fn get_unit(&self, id: UnitId) -> ActionResult<OrgUnit> {
        let forest = self.list_tree().await?;
        forest
            .iter()
            .find_map(|root| root.find(id))
            .cloned()
            .ok_or_else(|| ActionError::not_found("unit", id))
    }

    #[instrument(skip(self))]
    pub async fn list_roles(&self, unit_id: UnitId) -> ActionResult<Vec<Role>> {
        let conn = self.db.conn()?;
        if !exists(&conn, "org_units", unit_id.get())? {
            return Err(ActionError::not_found("unit", unit_id));
        }
        unit_roles(&conn, unit_id.get())
    }
}

fn role_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Role> {
    Ok(Role {
        id: RoleId::new(row.get(0)?),
        unit_id: UnitId::new(row.get(1)?),
        title: row.get(2)?,
    })
}

fn unit_roles(conn: &Connection, unit_id: i64) -> ActionResult<Vec<Role>> {
    let mut stmt =
        conn.prepare("SELECT id, org_unit_id, title FROM roles WHERE org_unit_id = ?1 ORDER BY id")?;
    let roles = stmt
        .query_map([unit_id], role_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(roles)
}

/// Titles already present in the unit are skipped
fn insert_roles<'a>(
    conn: &Connection,
    unit_id: i64,
    titles: impl Iterator<Item = &'a str>,
) -> ActionResult<usize> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO roles (org_unit_id, title) VALUES (?1, ?2)")?;
    let mut inserted = 0;
    for title in titles {
        inserted += stmt.execute(params![unit_id, title])?;
    }
    Ok(inserted)
}
