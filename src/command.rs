//! Command types and parsing for the interactive prompt

use crate::mail::types::MessageId;

/// A message named on the command line: a 1-based row of the current page or a raw id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Row(usize),
    Id(MessageId),
}

impl Target {
    fn parse(arg: &str) -> Result<Self, CommandError> {
        match arg.parse::<usize>() {
            Ok(0) => Err(CommandError::InvalidNumber(arg.to_string())),
            Ok(row) => Ok(Self::Row(row)),
            Err(_) => Ok(Self::Id(MessageId::new(arg))),
        }
    }

    /// Resolve against the ids listed on the current page, in display order.
    pub fn resolve(&self, listed: &[MessageId]) -> Option<MessageId> {
        match self {
            Self::Row(row) => row.checked_sub(1).and_then(|i| listed.get(i)).cloned(),
            Self::Id(id) => Some(id.clone()),
        }
    }
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `None` deselects the mailbox.
    Mailbox(Option<String>),
    List,
    Open(Target),
    Close,
    Read(Target),
    Page(u32),
    Size(u32),
    Auto(bool),
    Refresh,
    Check(Target),
    UncheckAll,
    MarkRead,
    Compose,
    To(String),
    Subject(String),
    Body(String),
    Send,
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("Usage: {0}")]
    MissingArgument(&'static str),
    #[error("Not a valid number: {0}")]
    InvalidNumber(String),
}

/// Help information for a command
#[derive(Debug, Clone)]
pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
}

fn required<'a>(arg: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(usage))
    } else {
        Ok(arg)
    }
}

fn number(arg: &str, usage: &'static str) -> Result<u32, CommandError> {
    required(arg, usage)?
        .parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

/// Parse a command line. Blank input yields `Ok(None)`.
pub fn parse_command(input: &str) -> Result<Option<ParsedCommand>, CommandError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match name {
        "mailbox" | "mb" => match required(arg, "mailbox <address>|none")? {
            "none" => ParsedCommand::Mailbox(None),
            address => ParsedCommand::Mailbox(Some(address.to_string())),
        },
        "list" | "ls" => ParsedCommand::List,
        "open" | "o" => ParsedCommand::Open(Target::parse(required(arg, "open <row|id>")?)?),
        "close" => ParsedCommand::Close,
        "read" => ParsedCommand::Read(Target::parse(required(arg, "read <row|id>")?)?),
        "page" | "p" => ParsedCommand::Page(number(arg, "page <n>")?),
        "size" => ParsedCommand::Size(number(arg, "size <n>")?),
        "auto" => match required(arg, "auto on|off")? {
            "on" => ParsedCommand::Auto(true),
            "off" => ParsedCommand::Auto(false),
            _ => return Err(CommandError::MissingArgument("auto on|off")),
        },
        "refresh" | "r" => ParsedCommand::Refresh,
        "check" | "x" => ParsedCommand::Check(Target::parse(required(arg, "check <row|id>")?)?),
        "uncheck-all" => ParsedCommand::UncheckAll,
        "mark-read" => ParsedCommand::MarkRead,
        "compose" | "c" => ParsedCommand::Compose,
        "to" => ParsedCommand::To(arg.to_string()),
        "subject" => ParsedCommand::Subject(arg.to_string()),
        "body" => ParsedCommand::Body(arg.to_string()),
        "send" => ParsedCommand::Send,
        "cancel" => ParsedCommand::Cancel,
        "help" | "h" | "?" => ParsedCommand::Help,
        "q" | "quit" => ParsedCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Get all available commands for help display
pub fn available_commands() -> Vec<CommandHelp> {
    vec![
        CommandHelp {
            name: "mailbox <address>|none",
            description: "Switch mailbox (or leave the current one)",
        },
        CommandHelp {
            name: "list",
            description: "Show the current page again",
        },
        CommandHelp {
            name: "open <row|id>",
            description: "Open a message (marks it read)",
        },
        CommandHelp {
            name: "close",
            description: "Close the open message",
        },
        CommandHelp {
            name: "read <row|id>",
            description: "Mark a message as read without opening it",
        },
        CommandHelp {
            name: "page <n>",
            description: "Go to page n",
        },
        CommandHelp {
            name: "size <n>",
            description: "Set messages per page",
        },
        CommandHelp {
            name: "auto on|off",
            description: "Toggle automatic refresh",
        },
        CommandHelp {
            name: "refresh",
            description: "Reload the current page",
        },
        CommandHelp {
            name: "check <row|id>",
            description: "Toggle a message in the bulk selection",
        },
        CommandHelp {
            name: "uncheck-all",
            description: "Clear the bulk selection",
        },
        CommandHelp {
            name: "mark-read",
            description: "Mark all checked messages as read",
        },
        CommandHelp {
            name: "compose",
            description: "Start a new message from the current mailbox",
        },
        CommandHelp {
            name: "to | subject | body <text>",
            description: "Edit the draft",
        },
        CommandHelp {
            name: "send",
            description: "Send the draft",
        },
        CommandHelp {
            name: "cancel",
            description: "Discard the draft",
        },
        CommandHelp {
            name: "help",
            description: "Show this help message",
        },
        CommandHelp {
            name: "quit",
            description: "Exit the application",
        },
    ]
}
