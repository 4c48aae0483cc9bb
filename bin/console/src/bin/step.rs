//! CLI tool to run a single token operation.
//!
//! Connects the wallet, runs the requested operation and prints the
//! resulting state:
//! - `balance`: connect and show the balance
//! - `transfer`, `approve`, `transfer-from`: token movements
//! - `mint`, `burn`: owner operations

use clap::{Parser, Subcommand};
use console::{
    command::Command, config::Config, execute, init_tracing, metrics::Metrics, open,
    view::render,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "step")]
#[command(about = "Run a single token operation")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Step,
}

#[derive(Subcommand)]
enum Step {
    /// Connect and show the balance
    Balance,

    /// Transfer tokens to a recipient
    Transfer { to: String, amount: String },

    /// Allow a spender to move tokens of the connected account
    Approve { spender: String, amount: String },

    /// Move tokens from an account that approved the connected account
    TransferFrom {
        from: String,
        to: String,
        amount: String,
    },

    /// Mint tokens to the connected account
    Mint { amount: String },

    /// Burn tokens of the connected account
    Burn { amount: String },
}

impl Step {
    /// The console command run after connecting, if any.
    fn into_command(self) -> Option<Command> {
        match self {
            Self::Balance => None,
            Self::Transfer { to, amount } => Some(Command::Transfer {
                to: Some(to),
                amount: Some(amount),
            }),
            Self::Approve { spender, amount } => Some(Command::Approve {
                spender: Some(spender),
                amount: Some(amount),
            }),
            Self::TransferFrom { from, to, amount } => Some(Command::TransferFrom {
                from: Some(from),
                to: Some(to),
                amount: Some(amount),
            }),
            Self::Mint { amount } => Some(Command::Mint {
                amount: Some(amount),
            }),
            Self::Burn { amount } => Some(Command::Burn {
                amount: Some(amount),
            }),
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;
    init_tracing(config.log_json);

    let deployment = config.deployment();
    let orchestrator = open(&config, &deployment, cli.private_key.as_deref())?;
    let metrics = Metrics::new();

    info!(token = %deployment.label, "Connecting wallet");
    let mut result = execute(&orchestrator, &Command::Connect, &metrics).await;

    if result.is_ok() {
        if let Some(command) = cli.command.into_command() {
            info!(op = ?command.operation(), "Running operation");
            result = execute(&orchestrator, &command, &metrics).await;
        }
    }

    let state = orchestrator.state();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", render(&deployment.label, &state));
    }

    result?;
    Ok(())
}
