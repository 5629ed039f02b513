use crate::output::Output;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::*;
use domain::config::PersonnelConfig;
use infrastructure::{ConfigLoader, ConfigSource, ConfigValidator};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration and where it came from
    Show,

    /// Check the effective configuration
    #[command(alias = "check")]
    Validate,

    /// Write an example configuration file (TOML with comments, or JSON by extension)
    Init {
        #[arg(short, long, default_value = "personnel.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub async fn execute(
        self,
        config: &PersonnelConfig,
        source: &ConfigSource,
        out: Output,
    ) -> Result<()> {
        match self.command {
            ConfigSubcommand::Show => {
                let origin = match source {
                    ConfigSource::File(path) => path.display().to_string(),
                    ConfigSource::Defaults => "built-in defaults".to_string(),
                };
                out.value(config, |config| {
                    println!("{} {}", "source:".dimmed(), origin);
                    match toml::to_string_pretty(config) {
                        Ok(text) => print!("{text}"),
                        Err(e) => println!("{config:#?} ({e})"),
                    }
                })
            }
            ConfigSubcommand::Validate => {
                ConfigValidator::new().validate(config)?;
                out.success("Configuration is valid")
            }
            ConfigSubcommand::Init { output, force } => {
                if output.exists() && !force {
                    bail!(
                        "{} already exists; use --force to overwrite",
                        output.display()
                    );
                }
                // JSON has no comments, so it gets the plain defaults
                if output.extension().and_then(|ext| ext.to_str()) == Some("json") {
                    ConfigLoader::new()
                        .save_config(&PersonnelConfig::default(), &output)
                        .await?;
                } else {
                    tokio::fs::write(&output, ConfigLoader::generate_example_config()).await?;
                }
                out.success(&format!("Configuration written to {}", output.display()))
            }
        }
    }
}
