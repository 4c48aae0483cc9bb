//! Contract clients for the token.
//!
//! Two flavours exist: a read-only client ([`TokenReader`]) that never signs
//! and is safe to share between concurrent reads, and a signing client
//! ([`TokenWriter`]) bound to one authorized account whose state-changing
//! calls resolve only once the transaction is confirmed.

pub mod rpc;

use alloy_primitives::{Address, TxHash, U256};
use client::SignerHandle;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use rpc::{ReadOnlyToken, RpcConnector, SigningToken};

/// Read-only view of the token contract.
pub trait TokenReader: Send + Sync {
    fn name(&self) -> impl Future<Output = eyre::Result<String>> + Send;

    fn symbol(&self) -> impl Future<Output = eyre::Result<String>> + Send;

    /// Address reported by the contract's `owner()`.
    fn owner(&self) -> impl Future<Output = eyre::Result<Address>> + Send;

    /// Balance of `account` in base units.
    fn balance_of(&self, account: Address) -> impl Future<Output = eyre::Result<U256>> + Send;

    /// Amount `spender` may move out of `owner`'s balance, in base units.
    fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = eyre::Result<U256>> + Send;
}

/// Signing client bound to one account.
///
/// Every write waits for the transaction receipt and fails if the
/// transaction reverted.
pub trait TokenWriter: TokenReader {
    /// The account that signs for this client.
    fn account(&self) -> Address;

    fn transfer(
        &self,
        recipient: Address,
        amount: U256,
    ) -> impl Future<Output = eyre::Result<TxOutcome>> + Send;

    fn approve(
        &self,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = eyre::Result<TxOutcome>> + Send;

    fn transfer_from(
        &self,
        sender: Address,
        recipient: Address,
        amount: U256,
    ) -> impl Future<Output = eyre::Result<TxOutcome>> + Send;

    fn mint(&self, to: Address, amount: U256)
        -> impl Future<Output = eyre::Result<TxOutcome>> + Send;

    fn burn(&self, amount: U256) -> impl Future<Output = eyre::Result<TxOutcome>> + Send;
}

/// Builds both client flavours for a fixed deployment.
pub trait Connector: Send + Sync {
    type Reader: TokenReader;
    type Writer: TokenWriter;

    /// A client that only reads.
    fn read_only(&self) -> Self::Reader;

    /// A client that signs with `handle`.
    fn signing(&self, handle: SignerHandle) -> Self::Writer;
}

/// Result of a confirmed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutcome {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: u64,
}
