use anyhow::Result;
use clap::{Parser, Subcommand};
use domain::config::PersonnelConfig;
use infrastructure::{init_logging, ConfigLoader, ConfigValidator};
use personnel::{create_service, ActionError, ActionState};
use std::path::PathBuf;
use std::process;

mod commands;
mod output;

use commands::{
    AssignCommand, AttendanceCommand, ConfigCommand, Context, HolidayCommand, LeaveCommand,
    StaffCommand, TransferCommand, UnitCommand,
};
use output::Output;

#[derive(Parser)]
#[command(name = "personnel")]
#[command(about = "Personnel back office: units, staff, assignments, leave and attendance")]
#[command(version)]
struct Cli {
    /// Configuration file, searched before the default locations
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results and failures as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organizational units and their roles
    Unit(UnitCommand),
    /// Staff records
    Staff(StaffCommand),
    /// Staff holding roles in units
    Assign(AssignCommand),
    /// Leave requests
    Leave(LeaveCommand),
    /// Incoming and outgoing transfers
    Transfer(TransferCommand),
    /// Daily attendance
    Attendance(AttendanceCommand),
    /// Public holidays
    Holiday(HolidayCommand),
    /// Inspect or generate configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let out = Output::new(cli.json);

    if let Err(e) = run(cli, out).await {
        let state = match e.downcast_ref::<ActionError>() {
            Some(err) => ActionState::from(err),
            None => ActionState::failure(format!("{e:#}")),
        };
        out.failure(&state);
        process::exit(1);
    }
}

async fn run(cli: Cli, out: Output) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_path(path);
    }

    let (config, source) = loader.load_with_source().await?;

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&config, &source, out).await,
        Commands::Unit(cmd) => cmd.execute(&open(&config, out).await?).await,
        Commands::Staff(cmd) => cmd.execute(&open(&config, out).await?).await,
        Commands::Assign(cmd) => cmd.execute(&open(&config, out).await?).await,
        Commands::Leave(cmd) => cmd.execute(&open(&config, out).await?).await,
        Commands::Transfer(cmd) => cmd.execute(&open(&config, out).await?).await,
        Commands::Attendance(cmd) => cmd.execute(&open(&config, out).await?).await,
        Commands::Holiday(cmd) => cmd.execute(&open(&config, out).await?).await,
    }
}

/// Validate the configuration, start logging and open the database
async fn open(config: &PersonnelConfig, out: Output) -> Result<Context> {
    ConfigValidator::new().validate(config)?;
    init_logging(&config.logging)?;

    Ok(Context {
        service: create_service(config).await?,
        out,
    })
}
