//! Wallet bridge and RPC plumbing.
//!
//! A wallet bridge authorizes accounts and hands out a [`SignerHandle`] for
//! the authorized account. Two bridges exist: a local private-key bridge and
//! a remote bridge that forwards JSON-RPC requests to a signer service.

mod bridge;
mod remote_signer;

use alloy_consensus::TxEnvelope;
use alloy_network::{eip2718::Encodable2718, EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
pub use bridge::{Bridge, LocalBridge, RemoteBridge, SignerHandle, WalletBridge};
pub use remote_signer::RemoteSigner;
use std::{future::Future, pin::Pin, sync::Arc};
use thiserror::Error;
use tracing::debug;

/// A function that signs a transaction request and returns signed bytes.
pub type SignerFn = Arc<
    dyn Fn(TransactionRequest) -> Pin<Box<dyn Future<Output = eyre::Result<Bytes>> + Send>>
        + Send
        + Sync,
>;

/// EIP-1193 error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint or signer service
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The user declined the request in the wallet
    #[error("Request rejected by wallet: {0}")]
    Rejected(String),

    /// The wallet did not authorize any account
    #[error("No account authorized by wallet")]
    NoAccounts,

    /// Signing was requested for an account the wallet does not hold
    #[error("Account {0} is not managed by this wallet")]
    UnknownAccount(Address),

    /// JSON-RPC error returned by the signer service
    #[error("Wallet RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// Convenience function to create an ethereum rpc provider from url.
///
/// The returned provider does not borrow `rpc_url`.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Parse a hex private key, with or without `0x` prefix.
pub fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner, ClientError> {
    private_key
        .trim()
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))
}

/// Create a SignerFn that forwards to a remote signer service.
///
/// The provider is used to fill transaction fields (nonce, gas, fees) before
/// sending to the remote service for signing.
pub fn remote_signer_fn<P>(remote: RemoteSigner, from: Address, chain_id: u64, provider: P) -> SignerFn
where
    P: Provider + Clone + 'static,
{
    Arc::new(move |tx| {
        let remote = remote.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from, chain_id).await?;
            Ok(remote.sign_transaction(filled_tx).await?)
        })
    })
}

/// Create a SignerFn from a local private key and provider.
///
/// The provider is used to fill transaction fields (nonce, gas, fees) before
/// signing locally with the private key.
pub fn local_signer_fn<P>(signer: PrivateKeySigner, chain_id: u64, provider: P) -> SignerFn
where
    P: Provider + Clone + 'static,
{
    let from_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    Arc::new(move |tx: TransactionRequest| {
        let wallet = wallet.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from_address, chain_id).await?;

            let tx_envelope: TxEnvelope = filled_tx
                .build(&wallet)
                .await
                .map_err(|e| eyre::eyre!("{}", e))?;

            // Encode to EIP-2718 bytes
            let mut encoded = Vec::new();
            tx_envelope.encode_2718(&mut encoded);
            Ok(Bytes::from(encoded))
        })
    })
}

/// Fill missing transaction fields using the provider.
pub async fn fill_transaction<P>(
    mut tx: TransactionRequest,
    provider: &P,
    from: Address,
    chain_id: u64,
) -> eyre::Result<TransactionRequest>
where
    P: Provider,
{
    if tx.from.is_none() {
        tx.from = Some(from);
    }

    if tx.chain_id.is_none() {
        tx.chain_id = Some(chain_id);
    }

    if tx.nonce.is_none() {
        let nonce = provider.get_transaction_count(from).await?;
        tx.nonce = Some(nonce);
    }

    // Fees first: gas estimation may need them
    if tx.max_fee_per_gas.is_none() || tx.max_priority_fee_per_gas.is_none() {
        let fee_estimate = provider.estimate_eip1559_fees().await?;
        if tx.max_fee_per_gas.is_none() {
            tx.max_fee_per_gas = Some(fee_estimate.max_fee_per_gas);
        }
        if tx.max_priority_fee_per_gas.is_none() {
            tx.max_priority_fee_per_gas = Some(fee_estimate.max_priority_fee_per_gas);
        }
    }

    if tx.gas.is_none() {
        let gas_estimate = provider.estimate_gas(tx.clone()).await?;
        // 20% headroom
        tx.gas = Some(gas_estimate + gas_estimate / 5);
    }

    debug!(
        from = %from,
        nonce = ?tx.nonce,
        gas = ?tx.gas,
        "Filled transaction"
    );

    Ok(tx)
}
