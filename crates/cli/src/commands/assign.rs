use super::Context;
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::*;
use domain::{AssignmentDetail, AssignmentId, RoleId, StaffId, UnitId};
use personnel::AssignInput;

#[derive(Debug, Args)]
pub struct AssignCommand {
    #[command(subcommand)]
    command: AssignSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AssignSubcommand {
    /// Give a staff member a role in a unit
    Add {
        #[arg(long)]
        staff: StaffId,
        #[arg(long)]
        role: RoleId,
        #[arg(long)]
        unit: UnitId,
        /// Defaults to today
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Delete an assignment
    Remove { id: AssignmentId },
    /// Close an assignment, keeping its history
    End {
        id: AssignmentId,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Assignments of one unit or one staff member
    List {
        #[arg(long, conflicts_with = "staff")]
        unit: Option<UnitId>,
        #[arg(long)]
        staff: Option<StaffId>,
    },
    /// Nominal roll search by name, staff number or role title
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Roles filled per unit, optionally for one subtree
    Coverage {
        #[arg(long)]
        unit: Option<UnitId>,
    },
}

impl AssignCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let assignments = &ctx.service.assignments;
        let out = ctx.out;

        match self.command {
            AssignSubcommand::Add {
                staff,
                role,
                unit,
                start,
            } => {
                let input = AssignInput::new(staff, role, unit);
                let id = match start {
                    Some(date) => assignments.assign_on(input, date).await?,
                    None => assignments.assign(input).await?,
                };
                out.created("Staff assigned", id.get())
            }
            AssignSubcommand::Remove { id } => {
                assignments.unassign(id).await?;
                out.success("Assignment removed")
            }
            AssignSubcommand::End { id, date } => {
                assignments.end_assignment(id, date).await?;
                out.success("Assignment ended")
            }
            AssignSubcommand::List { unit, staff } => {
                let rows = match (unit, staff) {
                    (Some(unit), _) => assignments.list_assignments(unit).await?,
                    (None, Some(staff)) => assignments.staff_assignments(staff).await?,
                    (None, None) => bail!("Pass --unit or --staff"),
                };
                out.value(&rows, |rows| print_rows(rows))
            }
            AssignSubcommand::Search { query } => {
                let rows = assignments.search_assignments(&query).await?;
                out.value(&rows, |rows| print_rows(rows))
            }
            AssignSubcommand::Coverage { unit } => {
                let coverage = assignments.assignment_coverage(unit).await?;
                out.value(&coverage, |coverage| {
                    for c in coverage {
                        println!(
                            "- {} {}: {}/{} roles filled, {} assignments, {} vacant",
                            c.unit_id.to_string().dimmed(),
                            c.unit_name.bold(),
                            c.filled_roles,
                            c.role_count,
                            c.assignment_count,
                            c.vacant_roles()
                        );
                    }
                })
            }
        }
    }
}

fn print_rows(rows: &[AssignmentDetail]) {
    if rows.is_empty() {
        println!("{}", "No assignments".dimmed());
    }
    for row in rows {
        let a = &row.assignment;
        let until = a
            .end_date
            .map(|d| format!(" until {d}"))
            .unwrap_or_default();
        println!(
            "- {} {} {} {} as {} in unit {} since {}{}",
            a.id.to_string().dimmed(),
            row.staff_number.cyan(),
            row.first_name.bold(),
            row.last_name.bold(),
            row.role_title.green(),
            a.unit_id,
            a.start_date,
            until
        );
    }
}
