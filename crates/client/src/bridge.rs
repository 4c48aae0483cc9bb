//! Wallet bridge abstraction.
//!
//! The bridge is the only component holding key material. Callers ask it to
//! authorize accounts and then obtain a [`SignerHandle`] bound to one of the
//! authorized accounts.

use crate::{local_signer_fn, remote_signer_fn, ClientError, RemoteSigner, SignerFn};
use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use std::{fmt, future::Future};
use tracing::info;

/// A wallet able to authorize accounts and sign transactions for them.
pub trait WalletBridge: Send + Sync {
    /// Ask for account access. May prompt the user.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, ClientError>> + Send;

    /// Accounts currently authorized, without prompting.
    fn accounts(&self) -> impl Future<Output = Result<Vec<Address>, ClientError>> + Send;

    /// Obtain a signing handle bound to `account`.
    fn signer(&self, account: Address) -> Result<SignerHandle, ClientError>;
}

/// Signing capability bound to a single authorized account.
#[derive(Clone)]
pub struct SignerHandle {
    address: Address,
    sign: SignerFn,
}

impl SignerHandle {
    pub fn new(address: Address, sign: SignerFn) -> Self {
        Self { address, sign }
    }

    /// The account this handle signs for.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Fill and sign a transaction, returning the EIP-2718 encoded bytes.
    pub async fn sign(&self, tx: TransactionRequest) -> eyre::Result<Bytes> {
        (self.sign)(tx).await
    }
}

impl fmt::Debug for SignerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerHandle")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Bridge backed by a private key held in process.
pub struct LocalBridge<P> {
    signer: PrivateKeySigner,
    chain_id: u64,
    provider: P,
}

impl<P> LocalBridge<P>
where
    P: Provider + Clone + 'static,
{
    pub const fn new(signer: PrivateKeySigner, chain_id: u64, provider: P) -> Self {
        Self {
            signer,
            chain_id,
            provider,
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl<P> WalletBridge for LocalBridge<P>
where
    P: Provider + Clone + 'static,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, ClientError> {
        Ok(vec![self.address()])
    }

    async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
        Ok(vec![self.address()])
    }

    fn signer(&self, account: Address) -> Result<SignerHandle, ClientError> {
        if account != self.address() {
            return Err(ClientError::UnknownAccount(account));
        }

        let sign = local_signer_fn(self.signer.clone(), self.chain_id, self.provider.clone());
        Ok(SignerHandle::new(account, sign))
    }
}

/// Bridge backed by a remote signer service.
pub struct RemoteBridge<P> {
    remote: RemoteSigner,
    chain_id: u64,
    provider: P,
}

impl<P> RemoteBridge<P>
where
    P: Provider + Clone + 'static,
{
    pub const fn new(remote: RemoteSigner, chain_id: u64, provider: P) -> Self {
        Self {
            remote,
            chain_id,
            provider,
        }
    }
}

impl<P> WalletBridge for RemoteBridge<P>
where
    P: Provider + Clone + 'static,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, ClientError> {
        let accounts = self.remote.request_accounts().await?;
        info!(url = %self.remote.url(), count = accounts.len(), "Wallet authorized accounts");
        Ok(accounts)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
        self.remote.accounts().await
    }

    fn signer(&self, account: Address) -> Result<SignerHandle, ClientError> {
        let sign = remote_signer_fn(
            self.remote.clone(),
            account,
            self.chain_id,
            self.provider.clone(),
        );
        Ok(SignerHandle::new(account, sign))
    }
}

/// Any of the supported bridges.
pub enum Bridge<P> {
    Local(LocalBridge<P>),
    Remote(RemoteBridge<P>),
}

impl<P> WalletBridge for Bridge<P>
where
    P: Provider + Clone + 'static,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, ClientError> {
        match self {
            Self::Local(bridge) => bridge.request_accounts().await,
            Self::Remote(bridge) => bridge.request_accounts().await,
        }
    }

    async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
        match self {
            Self::Local(bridge) => bridge.accounts().await,
            Self::Remote(bridge) => bridge.accounts().await,
        }
    }

    fn signer(&self, account: Address) -> Result<SignerHandle, ClientError> {
        match self {
            Self::Local(bridge) => bridge.signer(account),
            Self::Remote(bridge) => bridge.signer(account),
        }
    }
}
