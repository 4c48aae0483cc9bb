use clap::Parser;
use console::{
    command::Command,
    config::Config,
    execute, init_tracing,
    metrics::{install_prometheus_exporter, Metrics},
    open,
    view::render,
};
use session::OperationKind;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "console")]
#[command(about = "Interactive console for the SDT token")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;
    init_tracing(config.log_json);

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Metrics exporter listening");
    }

    let deployment = config.deployment();
    let orchestrator = Arc::new(open(&config, &deployment, cli.private_key.as_deref())?);
    let metrics = Metrics::new();

    println!("{}", render(&deployment.label, &orchestrator.state()));
    println!("Gõ `help` để xem danh sách lệnh.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        // Pick up account switches made in the wallet since the last command
        match orchestrator.sync_accounts().await {
            Ok(true) => metrics.record_account_change(),
            Ok(false) => {}
            Err(err) => warn!(error = %err, "Failed to query wallet accounts"),
        }

        let command = match Command::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", err.render());
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Status => println!("{}", render(&deployment.label, &orchestrator.state())),
            command => {
                // Commands run on their own task so a pending transaction
                // does not block the next line
                let orchestrator = orchestrator.clone();
                let metrics = metrics.clone();
                let title = deployment.label.clone();
                tokio::spawn(async move {
                    if let Err(err) = execute(orchestrator.as_ref(), &command, &metrics).await {
                        if !err.in_error_slot() {
                            println!("Lỗi: {err}");
                        }
                    }
                    println!("{}", render(&title, &orchestrator.state()));
                });
            }
        }
    }

    let pending: Vec<OperationKind> = orchestrator
        .state()
        .busy
        .iter()
        .filter(OperationKind::is_write)
        .collect();
    if !pending.is_empty() {
        warn!(?pending, "Leaving with transactions still awaiting confirmation");
    }

    Ok(())
}
