use super::Context;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::{OrgUnit, RoleTitles, UnitId};
use personnel::{CreateUnitInput, UpdateUnitInput};

#[derive(Debug, Args)]
pub struct UnitCommand {
    #[command(subcommand)]
    command: UnitSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UnitSubcommand {
    /// Create a unit, optionally under a parent
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent: Option<UnitId>,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma separated role titles, e.g. "Commander, Deputy"
        #[arg(long, default_value = "")]
        roles: String,
    },
    /// Edit a unit; omitted fields keep their current value
    Update {
        id: UnitId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replaces the role list; pass "" to remove every role
        #[arg(long)]
        roles: Option<String>,
    },
    /// Delete a unit without children
    Delete { id: UnitId },
    /// Show a unit with its roles and descendants
    Show { id: UnitId },
    /// Print the whole hierarchy
    Tree,
}

impl UnitCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let org = &ctx.service.org;
        let out = ctx.out;

        match self.command {
            UnitSubcommand::Create {
                name,
                parent,
                description,
                roles,
            } => {
                let mut input = CreateUnitInput::new(name).with_description(description);
                input.parent_id = parent;
                input.roles = RoleTitles::parse_csv(&roles);
                let id = org.create_unit(input).await?;
                out.created("Unit created", id.get())
            }
            UnitSubcommand::Update {
                id,
                name,
                description,
                roles,
            } => {
                let current = org.get_unit(id).await?;
                let current_roles = RoleTitles::new(current.role_titles());
                let mut input = UpdateUnitInput::new(id, name.unwrap_or(current.name))
                    .with_description(description.unwrap_or(current.description));
                input.roles = match roles {
                    Some(csv) => RoleTitles::parse_csv(&csv),
                    None => current_roles,
                };

                let plan = org.update_unit(input).await?;
                out.value(&plan, |plan| {
                    println!("{} Unit updated", "✓".green());
                    println!(
                        "  roles kept: {}  removed: {}  added: {}",
                        plan.keep.len(),
                        plan.remove.len(),
                        plan.insert.len()
                    );
                })
            }
            UnitSubcommand::Delete { id } => {
                org.delete_unit(id).await?;
                out.success("Unit deleted")
            }
            UnitSubcommand::Show { id } => {
                let unit = org.get_unit(id).await?;
                out.value(&unit, |unit| print_tree(unit, 0))
            }
            UnitSubcommand::Tree => {
                let forest = org.list_tree().await?;
                out.value(&forest, |forest| {
                    if forest.is_empty() {
                        println!("{}", "No units yet".dimmed());
                    }
                    for root in forest {
                        print_tree(root, 0);
                    }
                })
            }
        }
    }
}

fn print_tree(unit: &OrgUnit, depth: usize) {
    let indent = "  ".repeat(depth);
    let roles = if unit.roles.is_empty() {
        String::new()
    } else {
        format!(" [{}]", unit.role_titles().join(", "))
    };
    println!(
        "{}- {} {}{}",
        indent,
        unit.id.to_string().dimmed(),
        unit.name.bold(),
        roles.cyan()
    );
    for child in &unit.children {
        print_tree(child, depth + 1);
    }
}
