use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::pagination::DEFAULT_PAGE_SIZE;

/// Main configuration structure for the personnel back office
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PersonnelConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub org: OrgConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite file; created on first open
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Pooled connections
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OrgConfig {
    /// How an edited role list is written back to a unit
    #[serde(default)]
    pub role_sync: RoleSyncMode,
}

/// Strategy for writing a unit's edited role titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoleSyncMode {
    /// Keep roles whose title survives (and their assignments), delete the
    /// rest, insert new titles
    #[default]
    Diff,
    /// Delete every role of the unit and insert the list again; every
    /// assignment in the unit is cascaded away
    Replace,
}

impl RoleSyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleSyncMode::Diff => "diff",
            RoleSyncMode::Replace => "replace",
        }
    }
}

impl FromStr for RoleSyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diff" => Ok(RoleSyncMode::Diff),
            "replace" => Ok(RoleSyncMode::Replace),
            other => Err(format!("unknown role sync mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per line instead of human readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("personnel")
        .join("personnel.db")
}

fn default_pool_size() -> u32 {
    4
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}
