//! OrgUnit - node of the organization hierarchy
//!
//! Units form a forest: `parent_id` is either `None` (root) or the id of
//! another unit. Each unit owns its roles.

use crate::value_objects::{RoleId, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A role title scoped to one unit. `(unit_id, title)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub unit_id: UnitId,
    pub title: String,
}

/// Flat unit row as stored, before tree assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    pub parent_id: Option<UnitId>,
    pub name: String,
    pub description: String,
}

/// Unit with its roles and nested children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnit {
    pub id: UnitId,
    pub parent_id: Option<UnitId>,
    pub name: String,
    pub description: String,
    pub roles: Vec<Role>,
    pub children: Vec<OrgUnit>,
}

impl OrgUnit {
    fn from_record(record: UnitRecord, roles: Vec<Role>) -> Self {
        Self {
            id: record.id,
            parent_id: record.parent_id,
            name: record.name,
            description: record.description,
            roles,
            children: Vec::new(),
        }
    }

    /// This unit plus all descendants
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(OrgUnit::node_count).sum::<usize>()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn role_titles(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.title.as_str()).collect()
    }

    /// Depth-first search in this subtree
    pub fn find(&self, id: UnitId) -> Option<&OrgUnit> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Pre-order walk yielding `(depth, unit)`; the receiver is depth 0
    pub fn walk(&self) -> Vec<(usize, &OrgUnit)> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, self)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}

/// Assemble flat unit and role rows into a forest.
///
/// Units and roles are ordered by id. A unit whose parent does not resolve is
/// a root. Units not reachable from any root (a parent cycle in corrupted
/// data) are appended as extra roots, so every unit appears exactly once.
pub fn build_forest(mut units: Vec<UnitRecord>, mut roles: Vec<Role>) -> Vec<OrgUnit> {
    units.sort_by_key(|u| u.id);
    roles.sort_by_key(|r| r.id);

    let index: HashMap<UnitId, usize> = units.iter().enumerate().map(|(i, u)| (u.id, i)).collect();

    let mut roles_by_unit: HashMap<UnitId, Vec<Role>> = HashMap::new();
    for role in roles {
        roles_by_unit.entry(role.unit_id).or_default().push(role);
    }

    let mut children_of: HashMap<UnitId, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (i, unit) in units.iter().enumerate() {
        match unit.parent_id {
            Some(parent) if parent != unit.id && index.contains_key(&parent) => {
                children_of.entry(parent).or_default().push(i);
            }
            _ => roots.push(i),
        }
    }

    let mut slots: Vec<Option<UnitRecord>> = units.into_iter().map(Some).collect();
    let mut forest = Vec::new();

    for root in roots {
        if let Some(node) = assemble(root, &mut slots, &children_of, &mut roles_by_unit) {
            forest.push(node);
        }
    }

    for i in 0..slots.len() {
        if let Some(node) = assemble(i, &mut slots, &children_of, &mut roles_by_unit) {
            forest.push(node);
        }
    }

    forest
}

fn assemble(
    idx: usize,
    slots: &mut [Option<UnitRecord>],
    children_of: &HashMap<UnitId, Vec<usize>>,
    roles_by_unit: &mut HashMap<UnitId, Vec<Role>>,
) -> Option<OrgUnit> {
    // Taking the slot marks the unit as placed.
    let record = slots[idx].take()?;
    let roles = roles_by_unit.remove(&record.id).unwrap_or_default();
    let mut node = OrgUnit::from_record(record, roles);

    if let Some(child_indices) = children_of.get(&node.id) {
        for &child in child_indices {
            if let Some(child_node) = assemble(child, slots, children_of, roles_by_unit) {
                node.children.push(child_node);
            }
        }
    }

    Some(node)
}

/// Total number of units in a forest
pub fn forest_size(forest: &[OrgUnit]) -> usize {
    forest.iter().map(OrgUnit::node_count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: i64, parent: Option<i64>, name: &str) -> UnitRecord {
        UnitRecord {
            id: UnitId::new(id),
            parent_id: parent.map(UnitId::new),
            name: name.to_string(),
            description: String::new(),
        }
    }

    fn role(id: i64, unit: i64, title: &str) -> Role {
        Role {
            id: RoleId::new(id),
            unit_id: UnitId::new(unit),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_build_simple_tree() {
        let units = vec![unit(2, Some(1), "Patrol"), unit(1, None, "HQ")];
        let roles = vec![
            role(3, 2, "Officer"),
            role(1, 1, "Commander"),
            role(2, 1, "Deputy"),
        ];

        let forest = build_forest(units, roles);
        assert_eq!(forest.len(), 1);

        let hq = &forest[0];
        assert_eq!(hq.name, "HQ");
        assert_eq!(hq.role_titles(), vec!["Commander", "Deputy"]);
        assert_eq!(hq.children.len(), 1);
        assert_eq!(hq.children[0].name, "Patrol");
        assert_eq!(hq.children[0].role_titles(), vec!["Officer"]);
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let forest = build_forest(vec![unit(5, Some(99), "Orphan"), unit(1, None, "HQ")], vec![]);
        let names: Vec<_> = forest.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["HQ", "Orphan"]);
    }

    #[test]
    fn test_children_in_id_order() {
        let forest = build_forest(
            vec![
                unit(1, None, "HQ"),
                unit(4, Some(1), "D"),
                unit(2, Some(1), "B"),
                unit(3, Some(2), "C"),
            ],
            vec![],
        );
        let walk: Vec<_> = forest[0]
            .walk()
            .into_iter()
            .map(|(depth, u)| (depth, u.name.as_str()))
            .collect();
        assert_eq!(walk, vec![(0, "HQ"), (1, "B"), (2, "C"), (1, "D")]);
    }

    #[test]
    fn test_cycle_does_not_lose_units() {
        let forest = build_forest(
            vec![unit(1, Some(2), "A"), unit(2, Some(1), "B"), unit(3, None, "C")],
            vec![],
        );
        assert_eq!(forest_size(&forest), 3);
    }

    #[test]
    fn test_find_in_subtree() {
        let forest = build_forest(vec![unit(1, None, "HQ"), unit(2, Some(1), "Patrol")], vec![]);
        assert_eq!(forest[0].find(UnitId::new(2)).map(|u| u.name.as_str()), Some("Patrol"));
        assert!(forest[0].find(UnitId::new(9)).is_none());
    }
}
