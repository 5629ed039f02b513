//! RoleTitles - the user-edited role set of one unit
//!
//! Titles are trimmed, blanks dropped and duplicates collapsed (exact,
//! case-sensitive match) keeping the first occurrence's position.

use crate::value_objects::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RoleTitles(Vec<String>);

impl RoleTitles {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for title in titles {
            let title = title.as_ref().trim();
            if title.is_empty() {
                continue;
            }
            if seen.insert(title.to_string()) {
                out.push(title.to_string());
            }
        }
        Self(out)
    }

    /// Parse the comma separated form used by the unit editor (`"Commander, Deputy"`)
    pub fn parse_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.iter().any(|t| t == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Work out which stored roles survive, which go and which titles are new.
    ///
    /// `existing` is the unit's current `(id, title)` rows.
    pub fn plan_sync(&self, existing: &[(RoleId, String)]) -> RoleSyncPlan {
        let mut plan = RoleSyncPlan::default();
        let mut present = HashSet::new();

        for (id, title) in existing {
            if self.contains(title) {
                plan.keep.push(*id);
                present.insert(title.as_str());
            } else {
                plan.remove.push(*id);
            }
        }

        plan.insert = self
            .0
            .iter()
            .filter(|t| !present.contains(t.as_str()))
            .cloned()
            .collect();

        plan
    }
}

impl From<Vec<String>> for RoleTitles {
    fn from(titles: Vec<String>) -> Self {
        Self::new(titles)
    }
}

impl From<RoleTitles> for Vec<String> {
    fn from(titles: RoleTitles) -> Self {
        titles.0
    }
}

impl<'a> IntoIterator for &'a RoleTitles {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of diffing a unit's stored roles against an edited title list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSyncPlan {
    pub keep: Vec<RoleId>,
    pub remove: Vec<RoleId>,
    pub insert: Vec<String>,
}

impl RoleSyncPlan {
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.insert.is_empty()
    }
}
