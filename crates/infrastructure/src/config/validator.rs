use anyhow::{bail, Result};
use domain::config::*;
use tracing::warn;

pub const MAX_PAGE_SIZE: u32 = 1000;

pub struct ConfigValidator;

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &PersonnelConfig) -> Result<()> {
        self.validate_database_config(&config.database)?;
        self.validate_pagination_config(&config.pagination)?;
        self.validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_database_config(&self, config: &DatabaseConfig) -> Result<()> {
        if config.pool_size == 0 {
            bail!("database.pool_size must be greater than 0");
        }

        if config.path.as_os_str().is_empty() {
            bail!("database.path must not be empty");
        }

        if config.path.is_dir() {
            bail!(
                "database.path points to a directory: {}",
                config.path.display()
            );
        }

        Ok(())
    }

    fn validate_pagination_config(&self, config: &PaginationConfig) -> Result<()> {
        if config.page_size == 0 {
            bail!("pagination.page_size must be greater than 0");
        }

        if config.page_size > MAX_PAGE_SIZE {
            bail!(
                "pagination.page_size must be at most {}, got {}",
                MAX_PAGE_SIZE,
                config.page_size
            );
        }

        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingConfig) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.level.to_lowercase().as_str()) {
            // Directive strings such as "personnel=debug" are accepted by the filter
            warn!(
                "Log level '{}' is not a plain level; passing it to the filter as a directive",
                config.level
            );
        }

        Ok(())
    }
}
