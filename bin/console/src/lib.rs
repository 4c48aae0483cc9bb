//! Console front end for the SDT token.
//!
//! Wires configuration, wallet bridge and RPC connector into an
//! [`Orchestrator`] and maps console commands onto its operations.

pub mod command;
pub mod config;
pub mod metrics;
pub mod view;

use crate::{
    command::{field, Command},
    config::Config,
    metrics::Metrics,
};
use ::config::TokenDeployment;
use alloy_provider::Provider;
use client::{Bridge, LocalBridge, RemoteBridge, RemoteSigner, WalletBridge};
use session::{OperationKind, Orchestrator, OrchestratorError, Session};
use std::time::Instant;
use thiserror::Error;
use token::{Connector, RpcConnector};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Orchestrator over a live RPC endpoint.
pub type TokenConsole<P> = Orchestrator<Bridge<P>, RpcConnector<P>>;

#[derive(Debug, Error)]
pub enum CommandError {
    /// The control is disabled for accounts that do not own the contract
    #[error("Chỉ chủ sở hữu hợp đồng mới có thể dùng lệnh {0}.")]
    OwnerOnly(OperationKind),

    #[error(transparent)]
    Operation(#[from] OrchestratorError),
}

impl CommandError {
    /// Whether the message is already shown in the error region.
    pub const fn in_error_slot(&self) -> bool {
        matches!(self, Self::Operation(err) if !matches!(err, OrchestratorError::AlreadyPending(_)))
    }
}

/// Install the global tracing subscriber. Logs go to stderr so they do not
/// interleave with the rendered state on stdout.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Pick the wallet bridge: a private key wins over a remote signer. Without
/// either there is no wallet, and connecting reports it as missing.
pub fn build_bridge<P>(
    private_key: Option<&str>,
    config: &Config,
    chain_id: u64,
    provider: P,
) -> eyre::Result<Option<Bridge<P>>>
where
    P: Provider + Clone + 'static,
{
    if let Some(private_key) = private_key {
        let signer = client::parse_private_key(private_key)?;
        info!(address = %signer.address(), "Using local key wallet");
        return Ok(Some(Bridge::Local(LocalBridge::new(
            signer, chain_id, provider,
        ))));
    }

    if let Some(url) = &config.signer_proxy_url {
        info!(url = %url, "Using remote signer wallet");
        let remote = RemoteSigner::new(url.clone());
        return Ok(Some(Bridge::Remote(RemoteBridge::new(
            remote, chain_id, provider,
        ))));
    }

    warn!("No wallet configured, set PRIVATE_KEY or signer_proxy_url to sign");
    Ok(None)
}

/// Build the orchestrator for `deployment` from the console configuration.
pub fn open(
    config: &Config,
    deployment: &TokenDeployment,
    private_key: Option<&str>,
) -> eyre::Result<TokenConsole<impl Provider + Clone + 'static>> {
    let provider = client::create_provider(&config.rpc_url)?;
    let bridge = build_bridge(private_key, config, deployment.chain_id, provider.clone())?;
    let connector = RpcConnector::new(provider, deployment.address);

    info!(
        token = %deployment.label,
        address = %deployment.address,
        chain_id = deployment.chain_id,
        rpc_url = %config.rpc_url,
        "Console ready"
    );

    Ok(Orchestrator::new(bridge, connector, deployment.decimals))
}

/// Mint and burn are refused for a connected account that does not own the
/// contract. Without a session the orchestrator reports the missing
/// connection itself.
pub fn owner_only_refusal(session: Option<&Session>, kind: OperationKind) -> Option<CommandError> {
    let owner_only = matches!(kind, OperationKind::Mint | OperationKind::Burn);
    match session {
        Some(session) if owner_only && !session.is_owner => Some(CommandError::OwnerOnly(kind)),
        _ => None,
    }
}

/// Run one console command against the orchestrator.
pub async fn execute<B, C>(
    orchestrator: &Orchestrator<B, C>,
    command: &Command,
    metrics: &Metrics,
) -> Result<(), CommandError>
where
    B: WalletBridge,
    C: Connector,
{
    let Some(kind) = command.operation() else {
        if *command == Command::Disconnect {
            orchestrator.disconnect();
        }
        return Ok(());
    };

    if let Some(refusal) = owner_only_refusal(orchestrator.session().as_ref(), kind) {
        metrics.record_refused(kind, "owner_only");
        return Err(refusal);
    }

    let started = Instant::now();
    let result = match command {
        Command::Connect => orchestrator.connect().await.map(drop),
        Command::Balance => orchestrator.check_balance().await.map(drop),
        Command::Transfer { to, amount } => {
            orchestrator.transfer(field(to), field(amount)).await.map(drop)
        }
        Command::Approve { spender, amount } => {
            orchestrator.approve(field(spender), field(amount)).await.map(drop)
        }
        Command::TransferFrom { from, to, amount } => orchestrator
            .transfer_from(field(from), field(to), field(amount))
            .await
            .map(drop),
        Command::Mint { amount } => orchestrator.mint(field(amount)).await.map(drop),
        Command::Burn { amount } => orchestrator.burn(field(amount)).await.map(drop),
        Command::Retry { op } => orchestrator.resubmit(*op).await,
        Command::Disconnect | Command::Status | Command::Quit => Ok(()),
    };

    match &result {
        Err(OrchestratorError::AlreadyPending(_)) => metrics.record_refused(kind, "pending"),
        _ => metrics.record_operation(kind, result.is_ok(), started.elapsed()),
    }
    if let Some(balance) = orchestrator.state().balance {
        metrics.set_balance(&balance.amount);
    }

    result.map_err(CommandError::from)
}
