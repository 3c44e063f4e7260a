//! Command Interpreter
//!
//! Turns one raw input line into scrollback output and, for the launch
//! command, a [`SequenceTrigger`]. The command set is a closed registry
//! ([`Command`]); anything outside it gets a friendly "not found" reply.
//!
//! The interpreter holds no state. It never refuses input on its own: the
//! [`Conductor`](crate::Conductor) stops routing input once the sequence
//! has been triggered.

use serde::{Deserialize, Serialize};

use crate::scrollback::ScrollbackLine;

/// Canonical spelling of the launch command
pub const LAUNCH_COMMAND: &str = "start: mosaic-2025";

/// Compact spelling accepted for the launch command
pub const LAUNCH_COMMAND_COMPACT: &str = "start:mosaic-2025";

/// Hint shown after an unknown command
pub const UNKNOWN_HINT: &str = "Type \"help\" for available commands.";

/// A recognised terminal command
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// List the command table
    Help,
    /// Event description
    About,
    /// Event date, time and place
    Date,
    /// Registration link
    Register,
    /// Reset the scrollback to empty
    Clear,
    /// Simulated launch banner (does not start the sequence)
    Go,
    /// Start the scene sequence
    Launch,
    /// Anything else, carrying the raw input for the reply
    Unknown(String),
}

impl Command {
    /// Every command shown by `help`, in table order
    pub const TABLE: [Command; 7] = [
        Command::Help,
        Command::About,
        Command::Date,
        Command::Register,
        Command::Clear,
        Command::Go,
        Command::Launch,
    ];

    /// Parse raw input. Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let token = normalize(raw)?;
        let command = match token.as_str() {
            "help" => Self::Help,
            "about" => Self::About,
            "date" => Self::Date,
            "register" => Self::Register,
            "clear" => Self::Clear,
            "go" => Self::Go,
            LAUNCH_COMMAND | LAUNCH_COMMAND_COMPACT => Self::Launch,
            _ => Self::Unknown(raw.to_string()),
        };
        Some(command)
    }

    /// Name as listed in the help table
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Help => "help",
            Self::About => "about",
            Self::Date => "date",
            Self::Register => "register",
            Self::Clear => "clear",
            Self::Go => "go",
            Self::Launch => LAUNCH_COMMAND,
            Self::Unknown(raw) => raw,
        }
    }

    /// One-line description for the help table
    #[must_use]
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Help => "Show this message",
            Self::About => "Event information",
            Self::Date => "Event date and time",
            Self::Register => "Registration link",
            Self::Clear => "Clear terminal",
            Self::Go => "Initialize launch sequence",
            Self::Launch => "Begin inauguration",
            Self::Unknown(_) => "",
        }
    }

    /// Whether this command starts the scene sequence
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Launch)
    }

    /// Response body, without indent or the trailing blank separator
    #[must_use]
    pub fn response(&self) -> Vec<String> {
        let fixed =
            |lines: &[&str]| -> Vec<String> { lines.iter().map(|l| (*l).to_string()).collect() };
        match self {
            Self::Help => std::iter::once("Available commands:".to_string())
                .chain(
                    Self::TABLE
                        .iter()
                        .map(|c| format!("• {:<13} - {}", c.name(), c.summary())),
                )
                .collect(),
            Self::About => fixed(&[
                "MOSAIC Inauguration 2025",
                "Experience the future of innovation.",
                "Where technology meets creativity.",
            ]),
            Self::Date => fixed(&[
                "📅 January 20, 2025",
                "⏰ 10:00 AM IST",
                "📍 Campus Auditorium",
            ]),
            Self::Register => fixed(&[
                "🔗 Registration: https://mosaic2025.com/register",
                "Secure your spot now!",
            ]),
            Self::Clear => Vec::new(),
            Self::Go => fixed(&[
                "[████████████████████] 100%",
                "🚀 Launch sequence initiated...",
                "✓ Systems online",
                "✓ Ready for takeoff",
            ]),
            Self::Launch => fixed(&["▶ Starting MOSAIC-2025..."]),
            Self::Unknown(raw) => {
                vec![format!("Command not found: {raw}"), UNKNOWN_HINT.to_string()]
            }
        }
    }
}

/// Trim and lower-case raw input. `None` when nothing is left.
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Signal that the scene sequence should start
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceTrigger;

/// What an execution does to the scrollback
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrollbackEffect {
    /// Append these lines in order
    Append(Vec<ScrollbackLine>),
    /// Discard the whole buffer, echo included
    Reset,
}

/// Result of executing one input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Execution {
    /// The parsed command
    pub command: Command,
    /// Scrollback mutation to apply
    pub effect: ScrollbackEffect,
    /// Present only for the launch command
    pub trigger: Option<SequenceTrigger>,
}

impl Execution {
    /// Lines to append (empty for a reset)
    #[must_use]
    pub fn lines(&self) -> &[ScrollbackLine] {
        match &self.effect {
            ScrollbackEffect::Append(lines) => lines,
            ScrollbackEffect::Reset => &[],
        }
    }

    /// Response lines after the echo, without indent or blank separator
    #[must_use]
    pub fn response_text(&self) -> Vec<&str> {
        self.lines()
            .iter()
            .skip(1)
            .map(ScrollbackLine::content)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Stateless command dispatcher
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandInterpreter;

impl CommandInterpreter {
    /// Create an interpreter
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute one raw input line
    ///
    /// Blank input yields `None`. Every other input yields an echo of the
    /// raw text followed by the command's indented response and a blank
    /// separator, except `clear`, which resets the buffer instead.
    #[must_use]
    pub fn execute(&self, raw: &str) -> Option<Execution> {
        let command = Command::parse(raw)?;
        tracing::debug!(command = command.name(), "executing terminal command");

        let effect = if command == Command::Clear {
            ScrollbackEffect::Reset
        } else {
            let mut lines = vec![ScrollbackLine::echo(raw)];
            lines.extend(command.response().iter().map(|l| ScrollbackLine::output(l)));
            lines.push(ScrollbackLine::blank());
            ScrollbackEffect::Append(lines)
        };

        let trigger = command.is_trigger().then_some(SequenceTrigger);
        Some(Execution {
            command,
            effect,
            trigger,
        })
    }
}
