use anyhow::{bail, Context, Result};
use domain::config::{PersonnelConfig, RoleSyncMode};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            search_paths: Self::default_config_paths(),
            env_prefix: "PERSONNEL_".to_string(),
        }
    }

    /// Explicit path; the search paths are ignored and any read or parse
    /// failure is an error
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    /// Replace the default search locations
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("personnel.toml"),
            PathBuf::from(".personnelrc.toml"),
            PathBuf::from(".personnelrc.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let personnel_config = config_dir.join("personnel");
            paths.push(personnel_config.join("config.toml"));
            paths.push(personnel_config.join("config.json"));
        }

        paths
    }

    pub async fn load(&self) -> Result<PersonnelConfig> {
        self.load_with_source().await.map(|(config, _)| config)
    }

    /// The explicit path if set, otherwise the first readable search path;
    /// environment overrides are applied on top
    pub async fn load_with_source(&self) -> Result<(PersonnelConfig, ConfigSource)> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            let config = self
                .load_file(path)
                .await
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            info!("Loaded config from: {}", path.display());
            let config = self.apply_env_overrides(config)?;
            return Ok((config, ConfigSource::File(path.clone())));
        }

        let mut config = PersonnelConfig::default();
        let mut source = ConfigSource::Defaults;

        for path in &self.search_paths {
            if !path.exists() {
                continue;
            }
            match self.load_file(path).await {
                Ok(file_config) => {
                    info!("Loaded config from: {}", path.display());
                    config = file_config;
                    source = ConfigSource::File(path.clone());
                    break;
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {:#}", path.display(), e);
                }
            }
        }

        if source == ConfigSource::Defaults {
            debug!("No config file found, using defaults");
        }

        let config = self.apply_env_overrides(config)?;
        Ok((config, source))
    }

    async fn load_file(&self, path: &Path) -> Result<PersonnelConfig> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" | "" => toml::from_str(&content).context("Failed to parse TOML config"),
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => toml::from_str(&content)
                .or_else(|_| serde_json::from_str(&content))
                .context("Failed to parse config file"),
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        env::var(format!("{}{}", self.env_prefix, name))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn apply_env_overrides(&self, mut config: PersonnelConfig) -> Result<PersonnelConfig> {
        if let Some(path) = self.var("DB_PATH") {
            config.database.path = PathBuf::from(path);
        }

        if let Some(size) = self.var("POOL_SIZE") {
            config.database.pool_size = size
                .parse()
                .with_context(|| format!("{}POOL_SIZE must be a number", self.env_prefix))?;
        }

        if let Some(size) = self.var("PAGE_SIZE") {
            config.pagination.page_size = size
                .parse()
                .with_context(|| format!("{}PAGE_SIZE must be a number", self.env_prefix))?;
        }

        if let Some(mode) = self.var("ROLE_SYNC") {
            config.org.role_sync = mode.parse::<RoleSyncMode>().map_err(anyhow::Error::msg)?;
        }

        if let Some(level) = self.var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(json) = self.var("LOG_JSON") {
            config.logging.json = matches!(json.to_lowercase().as_str(), "true" | "1" | "yes");
        }

        Ok(config)
    }

    pub async fn save_config(&self, config: &PersonnelConfig, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "json" => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, content).await?;
        info!("Configuration saved to: {}", path.display());

        Ok(())
    }

    pub fn generate_example_config() -> String {
        r#"# Personnel back office configuration

[database]
# SQLite file, created on first run
# path = "/var/lib/personnel/personnel.db"
pool_size = 4

[pagination]
page_size = 10

[org]
# "diff" keeps surviving roles and their assignments when a unit is edited,
# "replace" recreates every role of the unit
role_sync = "diff"

[logging]
level = "info"
json = false
"#
        .to_string()
    }
}
