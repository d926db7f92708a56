//! Line-oriented chat loop
//!
//! One line is one submission. While a turn runs, new transcript entries and
//! phase changes are printed as they happen; the final status line follows.

use crate::agents::{ConversationController, HubStatus, RoleRegistry};
use crate::cli::output::Output;
use crate::types::{RejectReason, Role, TurnOutcome, TurnPhase};
use std::io::{self, BufRead, Write};
use std::time::Duration;

const PROGRESS_POLL: Duration = Duration::from_millis(50);

/// What a line of input asks the loop to do
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Quit,
    Roles,
    Status,
    History,
    Submit(&'a str),
}

impl<'a> ReplCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "quit" | "exit" => ReplCommand::Quit,
            "roles" => ReplCommand::Roles,
            "status" => ReplCommand::Status,
            "history" => ReplCommand::History,
            _ => ReplCommand::Submit(line),
        }
    }
}

/// Run the chat loop until `quit`/`exit` or end of input
pub async fn run<R: BufRead>(
    hub: &ConversationController,
    output: &Output,
    mut input: R,
) -> io::Result<()> {
    let registry = hub.registry();

    for message in hub.messages() {
        output.message(&message, registry);
    }
    output.hint("Type 'quit' or 'exit' to leave, 'roles' to list specialists, 'history' to reprint the transcript");

    let mut stdout = io::stdout();
    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Roles => print_roles(registry, output),
            ReplCommand::Status => {
                output.status(&hub.status(), hub.is_processing(), registry);
            }
            ReplCommand::History => {
                for message in hub.messages() {
                    output.message(&message, registry);
                }
            }
            ReplCommand::Submit(text) => {
                let mut progress = TurnProgress::new(hub.len());
                let turn = hub.submit_turn(text);
                tokio::pin!(turn);
                let mut ticker = tokio::time::interval(PROGRESS_POLL);

                let response = loop {
                    tokio::select! {
                        response = &mut turn => break response,
                        _ = ticker.tick() => {
                            progress.update(hub, output);
                        }
                    }
                };

                match response.outcome {
                    TurnOutcome::Rejected {
                        reason: RejectReason::Empty,
                    } => continue,
                    TurnOutcome::Rejected {
                        reason: RejectReason::Busy,
                    } => output.warning("Still processing the previous request"),
                    _ => progress.flush(hub, output),
                }
                output.status(&hub.status(), hub.is_processing(), registry);
            }
        }
    }

    Ok(())
}

/// Live rendering of one turn
struct TurnProgress {
    /// Next transcript index to print
    next: usize,
    last: Option<(TurnPhase, Option<Role>)>,
}

impl TurnProgress {
    /// `start` is the transcript length before submission. The user's own
    /// line is already on screen, so printing starts after it.
    fn new(start: usize) -> Self {
        Self {
            next: start + 1,
            last: None,
        }
    }

    /// Print entries appended since the last call, then the status line if
    /// the phase or highlighted role changed. Returns the status when printed.
    fn update(&mut self, hub: &ConversationController, output: &Output) -> Option<HubStatus> {
        self.flush(hub, output);
        if !hub.is_processing() {
            return None;
        }

        let status = hub.status();
        let key = (status.phase, status.active_role);
        if self.last == Some(key) {
            return None;
        }
        self.last = Some(key);
        output.status(&status, true, hub.registry());
        Some(status)
    }

    fn flush(&mut self, hub: &ConversationController, output: &Output) {
        for message in hub.messages_since(self.next) {
            output.message(&message, hub.registry());
            self.next += 1;
        }
    }
}

/// Print the role table
pub fn print_roles(registry: &RoleRegistry, output: &Output) {
    output.header("Roles");
    output.table_header(&["Role", "Mandate", "Web search"]);
    for profile in registry.profiles() {
        output.table_row(&[
            profile.name.as_str(),
            profile.description.as_str(),
            if profile.web_search { "yes" } else { "no" },
        ]);
    }
}
