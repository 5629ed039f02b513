use super::Context;
use crate::output::{or_dash, pager_line};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::{Gender, Staff, StaffId, StaffStatus};
use personnel::{ActionError, StaffInput};

#[derive(Debug, Args)]
pub struct StaffCommand {
    #[command(subcommand)]
    command: StaffSubcommand,
}

#[derive(Debug, Clone, Args)]
pub struct StaffDetails {
    #[arg(long)]
    middle_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    rank: Option<String>,
    #[arg(long)]
    ippd: Option<String>,
    #[arg(long)]
    address: Option<String>,
    /// ON_DUTY, SICK or LEAVE
    #[arg(long)]
    status: Option<StaffStatus>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum StaffSubcommand {
    /// Register a staff member
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long = "number")]
        staff_number: String,
        /// MALE, FEMALE or OTHER
        #[arg(long)]
        gender: Gender,
        #[command(flatten)]
        details: StaffDetails,
    },
    /// Edit a staff record; omitted fields keep their current value
    Update {
        id: StaffId,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "number")]
        staff_number: Option<String>,
        #[arg(long)]
        gender: Option<Gender>,
        #[command(flatten)]
        details: StaffDetails,
    },
    /// Delete a staff record with its assignments, leave and attendance
    Remove { id: StaffId },
    /// Show one staff member by id or staff number
    Show { identifier: String },
    /// Search staff, one page at a time
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

impl StaffDetails {
    fn apply(self, input: &mut StaffInput) {
        if self.middle_name.is_some() {
            input.middle_name = self.middle_name;
        }
        if self.phone.is_some() {
            input.phone = self.phone;
        }
        if self.rank.is_some() {
            input.rank = self.rank;
        }
        if self.ippd.is_some() {
            input.ippd_number = self.ippd;
        }
        if self.address.is_some() {
            input.address = self.address;
        }
        if let Some(status) = self.status {
            input.status = status;
        }
    }
}

fn input_from(staff: Staff) -> StaffInput {
    StaffInput {
        first_name: staff.first_name,
        middle_name: staff.middle_name,
        last_name: staff.last_name,
        email: staff.email,
        phone: staff.phone,
        gender: staff.gender,
        rank: staff.rank,
        staff_number: staff.staff_number,
        ippd_number: staff.ippd_number,
        address: staff.address,
        status: staff.status,
    }
}

impl StaffCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let staff = &ctx.service.staff;
        let out = ctx.out;

        match self.command {
            StaffSubcommand::Add {
                first_name,
                last_name,
                email,
                staff_number,
                gender,
                details,
            } => {
                let mut input = StaffInput::new(first_name, last_name, email, staff_number, gender);
                details.apply(&mut input);
                let id = staff.create_staff(input).await?;
                out.created("Staff created", id.get())
            }
            StaffSubcommand::Update {
                id,
                first_name,
                last_name,
                email,
                staff_number,
                gender,
                details,
            } => {
                let current = staff
                    .get_staff(&id.to_string())
                    .await?
                    .ok_or_else(|| ActionError::not_found("staff", id))?;

                let mut input = input_from(current);
                if let Some(v) = first_name {
                    input.first_name = v;
                }
                if let Some(v) = last_name {
                    input.last_name = v;
                }
                if let Some(v) = email {
                    input.email = v;
                }
                if let Some(v) = staff_number {
                    input.staff_number = v;
                }
                if let Some(v) = gender {
                    input.gender = v;
                }
                details.apply(&mut input);

                staff.update_staff(id, input).await?;
                out.success("Staff updated")
            }
            StaffSubcommand::Remove { id } => {
                staff.delete_staff(id).await?;
                out.success("Staff deleted")
            }
            StaffSubcommand::Show { identifier } => {
                let found = staff
                    .get_staff(&identifier)
                    .await?
                    .ok_or_else(|| ActionError::not_found("staff", &identifier))?;
                out.value(&found, print_staff)
            }
            StaffSubcommand::List { query, page } => {
                let page = staff.fetch_staff_page(&query, ctx.service.page(page)?).await?;
                out.value(&page, |page| {
                    for s in &page.items {
                        println!(
                            "- {} {} {} [{}]",
                            s.id.to_string().dimmed(),
                            s.staff_number.cyan(),
                            s.full_name().bold(),
                            s.status
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

fn print_staff(s: &Staff) {
    println!("{} {}", "☐".cyan(), s.full_name().bold());
    println!("  id: {}", s.id);
    println!("  staff number: {}", s.staff_number);
    println!("  ippd number: {}", or_dash(s.ippd_number.as_deref()));
    println!("  email: {}", s.email);
    println!("  phone: {}", or_dash(s.phone.as_deref()));
    println!("  gender: {}", s.gender);
    println!("  rank: {}", or_dash(s.rank.as_deref()));
    println!("  address: {}", or_dash(s.address.as_deref()));
    println!("  status: {}", s.status);
    println!("  created: {}", s.created_at);
}
