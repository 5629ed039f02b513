use super::Context;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::*;
use personnel::HolidayInput;
use serde_json::json;

#[derive(Debug, Args)]
pub struct HolidayCommand {
    #[command(subcommand)]
    command: HolidaySubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum HolidaySubcommand {
    /// Add a holiday, or every day of an inclusive range
    Add {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        description: String,
    },
    Remove { date: NaiveDate },
    List {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Whether a day is a holiday
    Check { date: NaiveDate },
}

impl HolidayCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let holidays = &ctx.service.holidays;
        let out = ctx.out;

        match self.command {
            HolidaySubcommand::Add {
                from,
                to,
                description,
            } => {
                let days = holidays
                    .add_holidays(HolidayInput {
                        from,
                        to,
                        description,
                    })
                    .await?;
                out.success(&format!("{days} holiday(s) saved"))
            }
            HolidaySubcommand::Remove { date } => {
                holidays.remove_holiday(date).await?;
                out.success("Holiday removed")
            }
            HolidaySubcommand::List { from, to } => {
                let listed = holidays.list_holidays(from, to).await?;
                out.value(&listed, |listed| {
                    for h in listed {
                        println!("- {} {}", h.date.to_string().cyan(), h.description);
                    }
                })
            }
            HolidaySubcommand::Check { date } => {
                let holiday = holidays.is_holiday(date).await?;
                out.value(&json!({ "date": date, "holiday": holiday }), |_| {
                    if holiday {
                        println!("{} {} is a holiday", "✓".green(), date);
                    } else {
                        println!("{} {} is a working day", "-".dimmed(), date);
                    }
                })
            }
        }
    }
}
