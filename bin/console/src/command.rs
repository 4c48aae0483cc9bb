//! Console line parsing.
//!
//! Each input line is parsed as one command. Arguments left out are passed
//! on as empty fields so the orchestrator reports them the same way an empty
//! form field would be reported.

use clap::{Parser, Subcommand};
use session::OperationKind;

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Connect the wallet
    Connect,

    /// Re-read the balance of the connected account
    Balance,

    /// Transfer tokens to a recipient
    Transfer { to: Option<String>, amount: Option<String> },

    /// Allow a spender to move tokens of the connected account
    Approve {
        spender: Option<String>,
        amount: Option<String>,
    },

    /// Move tokens from an account that approved the connected account
    TransferFrom {
        from: Option<String>,
        to: Option<String>,
        amount: Option<String>,
    },

    /// Mint tokens to the connected account (owner only)
    Mint { amount: Option<String> },

    /// Burn tokens of the connected account (owner only)
    Burn { amount: Option<String> },

    /// Run an operation again with the fields kept from its last failure
    Retry { op: OperationKind },

    /// Close the session
    Disconnect,

    /// Show the current state
    Status,

    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

impl Command {
    /// Parse one console line. `Ok(None)` for a blank line.
    ///
    /// Help requests and usage errors come back as a [`clap::Error`] to be
    /// printed with [`clap::Error::render`].
    pub fn parse_line(line: &str) -> Result<Option<Self>, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }

        Line::try_parse_from(words).map(|line| Some(line.command))
    }

    /// The operation this command runs, if any.
    pub const fn operation(&self) -> Option<OperationKind> {
        match self {
            Self::Connect => Some(OperationKind::Connect),
            Self::Balance => Some(OperationKind::CheckBalance),
            Self::Transfer { .. } => Some(OperationKind::Transfer),
            Self::Approve { .. } => Some(OperationKind::Approve),
            Self::TransferFrom { .. } => Some(OperationKind::TransferFrom),
            Self::Mint { .. } => Some(OperationKind::Mint),
            Self::Burn { .. } => Some(OperationKind::Burn),
            Self::Retry { op } => Some(*op),
            Self::Disconnect | Self::Status | Self::Quit => None,
        }
    }
}

/// An argument the user left out, passed on as an empty field.
pub(crate) fn field(arg: &Option<String>) -> &str {
    arg.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_transfer_with_arguments() {
        let command = Command::parse_line("transfer 0xabc 10").unwrap().unwrap();
        assert_eq!(
            command,
            Command::Transfer {
                to: Some("0xabc".into()),
                amount: Some("10".into()),
            }
        );
        assert_eq!(command.operation(), Some(OperationKind::Transfer));
    }

    #[test]
    fn test_missing_arguments_become_empty_fields() {
        let Some(Command::TransferFrom { from, to, amount }) =
            Command::parse_line("transfer-from 0xabc").unwrap()
        else {
            panic!("expected transfer-from");
        };
        assert_eq!(field(&from), "0xabc");
        assert_eq!(field(&to), "");
        assert_eq!(field(&amount), "");
    }

    #[test]
    fn test_retry_parses_operation_name() {
        let command = Command::parse_line("retry transfer-from").unwrap().unwrap();
        assert_eq!(
            command,
            Command::Retry {
                op: OperationKind::TransferFrom
            }
        );

        assert!(Command::parse_line("retry withdraw").is_err());
    }

    #[test]
    fn test_exit_alias() {
        assert_eq!(Command::parse_line("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_help_is_reported_as_clap_error() {
        let err = Command::parse_line("help").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::parse_line("withdraw 1").is_err());
    }
}
