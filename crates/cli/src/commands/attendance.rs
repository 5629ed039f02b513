use super::Context;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use colored::*;
use domain::{AttendanceStatus, StaffId, UnitId};
use personnel::AttendanceInput;

#[derive(Debug, Args)]
pub struct AttendanceCommand {
    #[command(subcommand)]
    command: AttendanceSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AttendanceSubcommand {
    /// Record one staff member for a day, replacing an earlier mark
    Mark {
        #[arg(long)]
        staff: StaffId,
        /// PRESENT or ABSENT
        #[arg(long)]
        status: AttendanceStatus,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Save a whole roll call; rows that fail are reported and skipped
    Batch {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_delimiter = ',')]
        present: Vec<StaffId>,
        #[arg(long, value_delimiter = ',')]
        absent: Vec<StaffId>,
    },
    /// Day sheet of a unit; unmarked staff show as absent
    Sheet {
        #[arg(long)]
        unit: UnitId,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Present, absent and on-leave counts for a day
    Summary {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        unit: Option<UnitId>,
    },
}

fn day(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

impl AttendanceCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let attendance = &ctx.service.attendance;
        let out = ctx.out;

        match self.command {
            AttendanceSubcommand::Mark {
                staff,
                status,
                date,
            } => {
                let id = attendance
                    .mark_attendance(AttendanceInput {
                        staff_id: staff,
                        date: day(date),
                        status,
                    })
                    .await?;
                out.created("Attendance saved", id.get())
            }
            AttendanceSubcommand::Batch {
                date,
                present,
                absent,
            } => {
                let entries: Vec<_> = present
                    .into_iter()
                    .map(|id| (id, AttendanceStatus::Present))
                    .chain(absent.into_iter().map(|id| (id, AttendanceStatus::Absent)))
                    .collect();

                let report = attendance.save_attendance_batch(day(date), &entries).await?;
                out.value(&report, |report| {
                    println!("{} {} saved", "✓".green(), report.saved.len());
                    for failure in &report.failed {
                        println!(
                            "{} staff {}: {}",
                            "✗".red(),
                            failure.staff_id,
                            failure.message
                        );
                    }
                })?;

                if !report.is_complete() && !out.is_json() {
                    println!("{}", "Some rows were not saved".yellow());
                }
                Ok(())
            }
            AttendanceSubcommand::Sheet { unit, date, query } => {
                let sheet = attendance
                    .unit_attendance(unit, day(date), query.as_deref())
                    .await?;
                out.value(&sheet, |sheet| {
                    for row in sheet {
                        let status = match row.status {
                            AttendanceStatus::Present => row.status.to_string().green(),
                            AttendanceStatus::Absent => row.status.to_string().red(),
                        };
                        println!(
                            "- {} {} {}{}",
                            row.staff_number.cyan(),
                            row.staff_name.bold(),
                            status,
                            if row.id.is_none() { " (unmarked)" } else { "" }
                        );
                    }
                })
            }
            AttendanceSubcommand::Summary { date, unit } => {
                let summary = attendance.attendance_summary(day(date), unit).await?;
                out.value(&summary, |s| {
                    println!(
                        "present: {}  absent: {}  off duty: {}",
                        s.present, s.absent, s.off_duty
                    );
                })
            }
        }
    }
}
