//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the MedHub CLI,
//! including transcript and status rendering.

use crate::agents::{HubStatus, RoleRegistry};
use crate::types::{Message, MessageOrigin, Role, TurnPhase};
use owo_colors::{AnsiColors, OwoColorize};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal color for a role's palette token
fn palette(color: &str) -> AnsiColors {
    match color {
        "rose" => AnsiColors::Red,
        "emerald" => AnsiColors::Green,
        "blue" => AnsiColors::Blue,
        "violet" => AnsiColors::Magenta,
        _ => AnsiColors::White,
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the MedHub banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}",
                "MedHub".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
            println!("   {}\n", "Hospital Delegation Hub".bright_white().bold());
        } else {
            println!(
                "\n   MedHub v{}\n   Hospital Delegation Hub\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<22}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 23).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 23));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        let row: String = values
            .iter()
            .map(|v| format!("{:<22}", v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", row);
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }

    /// Print one transcript entry
    pub fn message(&self, message: &Message, registry: &RoleRegistry) {
        let label = message_label(message, registry);

        if message.is_delegation_log {
            if self.colored {
                let color = message
                    .role
                    .map(|r| palette(&registry.profile(r).color))
                    .unwrap_or(AnsiColors::White);
                println!("  {} {}", "»".color(color), message.content.dimmed().italic());
            } else {
                println!("  >> {}", message.content);
            }
            return;
        }

        if self.colored {
            let styled_label = match message.role {
                Some(role) => label
                    .color(palette(&registry.profile(role).color))
                    .bold()
                    .to_string(),
                None => label.bright_cyan().bold().to_string(),
            };
            println!("\n  {}\n{}\n", styled_label, indent(&message.content));
        } else {
            println!("\n  [{}]\n{}\n", label, indent(&message.content));
        }
    }

    /// Print the status line and, if set, the error banner
    pub fn status(&self, status: &HubStatus, processing: bool, registry: &RoleRegistry) {
        let line = status_line(status, processing, registry);
        if self.colored {
            if processing {
                println!("  {}", line.yellow());
            } else {
                println!("  {}", line.dimmed());
            }
        } else {
            println!("  {}", line);
        }

        if let Some(error) = &status.error {
            self.error(error);
        }
    }
}

/// Who a message is attributed to, as shown in the transcript
pub fn message_label(message: &Message, registry: &RoleRegistry) -> String {
    match (message.origin, message.role) {
        (MessageOrigin::User, _) => "You".to_string(),
        (MessageOrigin::System, _) => "System".to_string(),
        (MessageOrigin::Assistant, Some(role)) => {
            let profile = registry.profile(role);
            if role == Role::Navigator {
                "Navigator".to_string()
            } else {
                format!("{} ({})", profile.name, profile.description)
            }
        }
        (MessageOrigin::Assistant, None) => "Assistant".to_string(),
    }
}

/// `PROCESSING` or `IDLE`, followed by the highlighted role
pub fn status_line(status: &HubStatus, processing: bool, registry: &RoleRegistry) -> String {
    let state = if processing { "PROCESSING" } else { "IDLE" };
    let phase = match status.phase {
        TurnPhase::Idle => None,
        TurnPhase::Routing => Some("routing"),
        TurnPhase::Delegating => Some("delegating"),
        TurnPhase::Direct => Some("answering"),
    };

    let mut line = format!("[{}]", state);
    if let Some(phase) = phase {
        line.push_str(&format!(" {}", phase));
    }
    if let Some(role) = status.active_role {
        line.push_str(&format!(" · {}", registry.display_name(role)));
    }
    line
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}
