use super::Context;
use crate::output::{or_dash, pager_line};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::*;
use domain::{StaffId, Transfer, TransferId, TransferType};
use personnel::{TransferFilter, TransferInput};

#[derive(Debug, Args)]
pub struct TransferCommand {
    #[command(subcommand)]
    command: TransferSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransferSubcommand {
    /// Open a pending transfer
    Create {
        #[arg(long)]
        staff: StaffId,
        /// INCOMING or OUTGOING
        #[arg(long = "type")]
        transfer_type: TransferType,
        #[arg(long)]
        from_unit: Option<String>,
        #[arg(long)]
        to_unit: Option<String>,
        #[arg(long)]
        draft: Option<String>,
        #[arg(long)]
        letter_pdf: Option<String>,
    },
    /// Complete a pending transfer
    Complete { id: TransferId },
    Show { id: TransferId },
    /// Search transfers, newest first
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long = "type")]
        transfer_type: Option<TransferType>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

impl TransferCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let transfers = &ctx.service.transfers;
        let out = ctx.out;

        match self.command {
            TransferSubcommand::Create {
                staff,
                transfer_type,
                from_unit,
                to_unit,
                draft,
                letter_pdf,
            } => {
                let mut input = TransferInput::new(staff, transfer_type);
                input.from_unit = from_unit;
                input.to_unit = to_unit;
                input.draft_text = draft;
                input.letter_pdf = letter_pdf;
                let id = transfers.create_transfer(input).await?;
                out.created("Transfer created", id.get())
            }
            TransferSubcommand::Complete { id } => {
                let transfer = transfers.complete_transfer(id).await?;
                out.value(&transfer, print_transfer)
            }
            TransferSubcommand::Show { id } => {
                let transfer = transfers.get_transfer(id).await?;
                out.value(&transfer, print_transfer)
            }
            TransferSubcommand::List {
                query,
                transfer_type,
                from,
                to,
                page,
            } => {
                let filter = TransferFilter {
                    query,
                    transfer_type,
                    from,
                    to,
                };
                let page = transfers
                    .fetch_transfer_page(&filter, ctx.service.page(page)?)
                    .await?;
                out.value(&page, |page| {
                    for t in &page.items {
                        println!(
                            "- {} {} {} {} {} {} -> {} [{}]",
                            t.id.to_string().dimmed(),
                            t.staff_number.cyan(),
                            t.first_name.bold(),
                            t.last_name.bold(),
                            t.transfer_type,
                            or_dash(t.from_unit.as_deref()),
                            or_dash(t.to_unit.as_deref()),
                            t.status
                        );
                    }
                    println!(
                        "{}",
                        pager_line(page.page, page.total_pages, page.total_count).dimmed()
                    );
                })
            }
        }
    }
}

fn print_transfer(t: &Transfer) {
    println!(
        "{} transfer {} for staff {}: {} [{}]",
        "☐".cyan(),
        t.id,
        t.staff_id,
        t.transfer_type,
        t.status.to_string().bold()
    );
    println!(
        "  {} -> {}",
        or_dash(t.from_unit.as_deref()),
        or_dash(t.to_unit.as_deref())
    );
    println!("  requested: {}", t.requested_at);
    if let Some(done) = t.completed_at {
        println!("  completed: {done}");
    }
}
