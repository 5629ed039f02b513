use super::Context;
use crate::output::pager_line;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::*;
use domain::{LeaveId, LeaveRequest, LeaveType, StaffId};
use personnel::{LeaveFilter, LeaveInput};

#[derive(Debug, Args)]
pub struct LeaveCommand {
    #[command(subcommand)]
    command: LeaveSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum LeaveSubcommand {
    /// File a pending leave request
    Request {
        #[arg(long)]
        staff: StaffId,
        /// ANNUAL, SICK, MATERNITY, PATERNITY or OFF_DUTY
        #[arg(long = "type")]
        leave_type: LeaveType,
        #[arg(long)]
        start: NaiveDate,
        /// Open ended when omitted
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        draft: Option<String>,
        #[arg(long)]
        request_pdf: Option<String>,
    },
    /// Approve a pending request
    Approve {
        id: LeaveId,
        /// Signed approval document
        #[arg(long)]
        pdf: Option<String>,
    },
    /// Mark an approved request as taken
    Start { id: LeaveId },
    Show { id: LeaveId },
    /// Search requests, newest start date first
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long = "type")]
        leave_type: Option<LeaveType>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Requests spanning a day
    On { date: NaiveDate },
}

impl LeaveCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let leaves = &ctx.service.leaves;
        let out = ctx.out;

        match self.command {
            LeaveSubcommand::Request {
                staff,
                leave_type,
                start,
                end,
                draft,
                request_pdf,
            } => {
                let mut input = LeaveInput::new(staff, leave_type, start);
                input.end_date = end;
                input.draft_text = draft;
                input.request_pdf = request_pdf;
                let id = leaves.request_leave(input).await?;
                out.created("Leave requested", id.get())
            }
            LeaveSubcommand::Approve { id, pdf } => {
                let leave = leaves.approve_leave(id, pdf).await?;
                out.value(&leave, print_leave)
            }
            LeaveSubcommand::Start { id } => {
                let leave = leaves.start_leave(id).await?;
                out.value(&leave, print_leave)
            }
            LeaveSubcommand::Show { id } => {
                let leave = leaves.get_leave(id).await?;
                out.value(&leave, print_leave)
            }
            LeaveSubcommand::List {
                query,
                leave_type,
                from,
                to,
                page,
            } => {
                let filter = LeaveFilter {
                    query,
                    leave_type,
                    from,
                    to,
                };
                let page = leaves
                    .fetch_leave_page(&filter, ctx.service.page(page)?)
                    .await?;
                out.value(&page, |page| {
                    for l in &page.items {
                        println!(
                            "- {} {} {} {} {} {} to {} [{}]",
                            l.id.to_string().dimmed(),
                            l.staff_number.cyan(),
                            l.first_name.bold(),
                            l.last_name.bold(),
                            l.leave_type,
                            l.start_date,
                            l.end_date.map(|d| d.to_string()).unwrap_or_else(|| "open".into()),
                            l.status
                        );
                    }
                    println!(
                        "{}",
                        pager_line(page.page, page.total_pages, page.total_count).dimmed()
                    );
                })
            }
            LeaveSubcommand::On { date } => {
                let on_leave = leaves.leave_on(date).await?;
                out.value(&on_leave, |on_leave| {
                    for leave in on_leave {
                        print_leave(leave);
                    }
                })
            }
        }
    }
}

fn print_leave(l: &LeaveRequest) {
    let end = l
        .end_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "open".to_string());
    println!(
        "{} leave {} for staff {}: {} {} to {} [{}]",
        "☐".cyan(),
        l.id,
        l.staff_id,
        l.leave_type,
        l.start_date,
        end,
        l.status.to_string().bold()
    );
    if let Some(pdf) = &l.approval_pdf {
        println!("  approval: {pdf}");
    }
}
