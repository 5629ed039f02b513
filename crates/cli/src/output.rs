use anyhow::Result;
use colored::*;
use personnel::ActionState;
use serde::Serialize;

/// Renders command results either as JSON documents or as terminal text
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

#[derive(Serialize)]
struct Created<'a> {
    message: &'a str,
    id: i64,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print `value` as JSON, or hand it to `human` for terminal output
    pub fn value<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }

    pub fn success(&self, message: &str) -> Result<()> {
        self.value(&ActionState::success(message), |_| {
            println!("{} {}", "✓".green(), message);
        })
    }

    pub fn created(&self, message: &str, id: i64) -> Result<()> {
        self.value(&Created { message, id }, |_| {
            println!("{} {} (id {})", "✓".green(), message, id.to_string().bold());
        })
    }

    /// Failures go to stdout as JSON, or to stderr as text
    pub fn failure(&self, state: &ActionState) {
        if self.json {
            match serde_json::to_string_pretty(state) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
            }
            return;
        }

        if let Some(error) = &state.state_error {
            eprintln!("{} {}", "✗".red(), error.red());
        }
        if let Some(message) = &state.message {
            eprintln!("{} {}", "!".yellow(), message.yellow());
        }
        if let Some(errors) = &state.errors {
            for (field, messages) in errors {
                for message in messages {
                    eprintln!("  {}: {}", field.bold(), message);
                }
            }
        }
    }
}

pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

pub fn pager_line(page: u32, total_pages: u32, total_count: u64) -> String {
    format!("page {page}/{total_pages}, {total_count} total")
}
