//! JSON-RPC backed token clients.

use crate::{Connector, TokenReader, TokenWriter, TxOutcome};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use binding::token::IToken;
use client::SignerHandle;
use eyre::Result;
use tracing::{debug, info};

/// Read-only token client over a plain provider.
#[derive(Debug, Clone)]
pub struct ReadOnlyToken<P> {
    provider: P,
    token: Address,
}

impl<P> ReadOnlyToken<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, token: Address) -> Self {
        Self { provider, token }
    }
}

impl<P> TokenReader for ReadOnlyToken<P>
where
    P: Provider + Clone,
{
    async fn name(&self) -> Result<String> {
        let contract = IToken::new(self.token, &self.provider);
        Ok(contract.name().call().await?)
    }

    async fn symbol(&self) -> Result<String> {
        let contract = IToken::new(self.token, &self.provider);
        Ok(contract.symbol().call().await?)
    }

    async fn owner(&self) -> Result<Address> {
        let contract = IToken::new(self.token, &self.provider);
        Ok(contract.owner().call().await?)
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        debug!("Querying token {} balance: address={}", self.token, account);

        let contract = IToken::new(self.token, &self.provider);
        Ok(contract.balanceOf(account).call().await?)
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        debug!(
            "Querying token {} allowance: owner={}, spender={}",
            self.token, owner, spender
        );

        let contract = IToken::new(self.token, &self.provider);
        Ok(contract.allowance(owner, spender).call().await?)
    }
}

/// Token client that signs through a wallet bridge handle.
///
/// Transactions are signed by the handle and broadcast raw, so the same
/// client works for local keys and remote signer services.
#[derive(Debug, Clone)]
pub struct SigningToken<P> {
    reader: ReadOnlyToken<P>,
    handle: SignerHandle,
}

impl<P> SigningToken<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, token: Address, handle: SignerHandle) -> Self {
        Self {
            reader: ReadOnlyToken::new(provider, token),
            handle,
        }
    }

    /// Sign, broadcast and wait for the receipt of a call to the token.
    async fn submit<C: SolCall>(&self, call: C) -> Result<TxOutcome> {
        let tx = TransactionRequest::default()
            .with_from(self.handle.address())
            .with_to(self.reader.token)
            .with_input(call.abi_encode());

        let raw = self.handle.sign(tx).await?;
        let pending = self.reader.provider.send_raw_transaction(&raw).await?;
        let tx_hash = *pending.tx_hash();

        info!(
            tx_hash = %tx_hash,
            call = C::SIGNATURE,
            from = %self.handle.address(),
            "Transaction submitted, waiting for confirmation"
        );

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            eyre::bail!("Transaction {tx_hash} reverted");
        }

        Ok(TxOutcome {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

impl<P> TokenReader for SigningToken<P>
where
    P: Provider + Clone,
{
    async fn name(&self) -> Result<String> {
        self.reader.name().await
    }

    async fn symbol(&self) -> Result<String> {
        self.reader.symbol().await
    }

    async fn owner(&self) -> Result<Address> {
        self.reader.owner().await
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        self.reader.balance_of(account).await
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        self.reader.allowance(owner, spender).await
    }
}

impl<P> TokenWriter for SigningToken<P>
where
    P: Provider + Clone,
{
    fn account(&self) -> Address {
        self.handle.address()
    }

    async fn transfer(&self, recipient: Address, amount: U256) -> Result<TxOutcome> {
        self.submit(IToken::transferCall { recipient, amount }).await
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TxOutcome> {
        self.submit(IToken::approveCall { spender, amount }).await
    }

    async fn transfer_from(
        &self,
        sender: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<TxOutcome> {
        self.submit(IToken::transferFromCall {
            sender,
            recipient,
            amount,
        })
        .await
    }

    async fn mint(&self, to: Address, amount: U256) -> Result<TxOutcome> {
        self.submit(IToken::mintCall { to, amount }).await
    }

    async fn burn(&self, amount: U256) -> Result<TxOutcome> {
        self.submit(IToken::burnCall { amount }).await
    }
}

/// Connector for a token reachable over an RPC provider.
#[derive(Debug, Clone)]
pub struct RpcConnector<P> {
    provider: P,
    token: Address,
}

impl<P> RpcConnector<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, token: Address) -> Self {
        Self { provider, token }
    }

    pub const fn token(&self) -> Address {
        self.token
    }
}

impl<P> Connector for RpcConnector<P>
where
    P: Provider + Clone,
{
    type Reader = ReadOnlyToken<P>;
    type Writer = SigningToken<P>;

    fn read_only(&self) -> Self::Reader {
        ReadOnlyToken::new(self.provider.clone(), self.token)
    }

    fn signing(&self, handle: SignerHandle) -> Self::Writer {
        SigningToken::new(self.provider.clone(), self.token, handle)
    }
}
