//! The session orchestrator.

use crate::{
    error::{
        OrchestratorError, AMOUNT_INPUT_MESSAGE, APPROVE_INPUT_MESSAGE,
        TRANSFER_FROM_INPUT_MESSAGE, TRANSFER_INPUT_MESSAGE,
    },
    state::{
        ApprovalIntent, Balance, Controls, DelegatedTransferIntent, OperationKind, Session,
        TokenInfo, TransferIntent, UiState,
    },
    units::{format_amount, parse_address, parse_amount},
};
use alloy_primitives::Address;
use client::{ClientError, WalletBridge};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use token::{Connector, TokenReader, TokenWriter, TxOutcome};
use tracing::{debug, info, warn};

const APPROVE_SUCCESS: &str = "Phê duyệt thành công!";
const TRANSFER_FROM_SUCCESS: &str = "Chuyển token thay mặt thành công!";
const MINT_SUCCESS: &str = "Mint token thành công!";
const BURN_SUCCESS: &str = "Burn token thành công!";

type Result<T> = std::result::Result<T, OrchestratorError>;

/// Orchestrates wallet session, contract calls and display state.
///
/// All methods take `&self`; wrap the orchestrator in an [`Arc`] to run
/// operations concurrently. State is kept behind a mutex that is never held
/// across a suspension point.
pub struct Orchestrator<B, C: Connector> {
    bridge: Option<B>,
    connector: C,
    decimals: u8,
    inner: Mutex<Inner<C::Writer>>,
}

struct Inner<W> {
    ui: UiState,
    /// Signing client of the connected account, created at connect time.
    handle: Option<Arc<W>>,
}

/// Clears the busy flag of one operation kind when dropped.
struct BusyGuard<'a, W> {
    inner: &'a Mutex<Inner<W>>,
    kind: OperationKind,
}

impl<W> Drop for BusyGuard<'_, W> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.ui.busy.release(self.kind);
    }
}

impl<B, C> Orchestrator<B, C>
where
    B: WalletBridge,
    C: Connector,
{
    /// Create an orchestrator. `bridge` is `None` when no wallet is available.
    pub fn new(bridge: Option<B>, connector: C, decimals: u8) -> Self {
        Self {
            bridge,
            connector,
            decimals,
            inner: Mutex::new(Inner {
                ui: UiState::default(),
                handle: None,
            }),
        }
    }

    /// Snapshot of the display state.
    pub fn state(&self) -> UiState {
        self.lock().ui.clone()
    }

    pub fn controls(&self) -> Controls {
        self.lock().ui.controls()
    }

    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.lock().ui.busy.is_busy(kind)
    }

    pub fn session(&self) -> Option<Session> {
        self.lock().ui.session.clone()
    }

    /// Authorize an account with the wallet and open a session for it.
    pub async fn connect(&self) -> Result<Session> {
        let _guard = self.begin(OperationKind::Connect)?;
        let result = self.open_session().await;
        self.settle(OperationKind::Connect, result)
    }

    /// Re-read the balance of the connected account.
    pub async fn check_balance(&self) -> Result<Balance> {
        let _guard = self.begin(OperationKind::CheckBalance)?;
        let result = self.read_balance().await;
        self.settle(OperationKind::CheckBalance, result)
    }

    /// Transfer `amount` tokens to `recipient`.
    pub async fn transfer(&self, recipient: &str, amount: &str) -> Result<TxOutcome> {
        let kind = OperationKind::Transfer;
        let _guard = self.begin(kind)?;
        self.lock().ui.forms.transfer = TransferIntent::new(recipient, amount);
        let result = self.run_transfer().await;
        self.settle(kind, result)
    }

    /// Allow `spender` to move up to `amount` tokens of the connected account.
    pub async fn approve(&self, spender: &str, amount: &str) -> Result<TxOutcome> {
        let kind = OperationKind::Approve;
        let _guard = self.begin(kind)?;
        self.lock().ui.forms.approval = ApprovalIntent::new(spender, amount);
        let result = self.run_approve().await;
        self.settle(kind, result)
    }

    /// Move `amount` tokens from `from` to `to` using the allowance `from`
    /// granted to the connected account.
    pub async fn transfer_from(&self, from: &str, to: &str, amount: &str) -> Result<TxOutcome> {
        let kind = OperationKind::TransferFrom;
        let _guard = self.begin(kind)?;
        self.lock().ui.forms.delegated = DelegatedTransferIntent::new(from, to, amount);
        let result = self.run_transfer_from().await;
        self.settle(kind, result)
    }

    /// Mint `amount` tokens to the connected account.
    ///
    /// Ownership is not checked here. The console disables the control for
    /// non-owners, and the contract rejects unauthorized calls.
    pub async fn mint(&self, amount: &str) -> Result<TxOutcome> {
        let kind = OperationKind::Mint;
        let _guard = self.begin(kind)?;
        self.lock().ui.forms.mint_amount = amount.to_string();
        let result = self.run_mint().await;
        self.settle(kind, result)
    }

    /// Burn `amount` tokens from the connected account.
    pub async fn burn(&self, amount: &str) -> Result<TxOutcome> {
        let kind = OperationKind::Burn;
        let _guard = self.begin(kind)?;
        self.lock().ui.forms.burn_amount = amount.to_string();
        let result = self.run_burn().await;
        self.settle(kind, result)
    }

    /// Run an operation again from the fields retained after a failure.
    pub async fn resubmit(&self, kind: OperationKind) -> Result<()> {
        let _guard = self.begin(kind)?;
        let result = match kind {
            OperationKind::Connect => self.open_session().await.map(drop),
            OperationKind::CheckBalance => self.read_balance().await.map(drop),
            OperationKind::Transfer => self.run_transfer().await.map(drop),
            OperationKind::Approve => self.run_approve().await.map(drop),
            OperationKind::TransferFrom => self.run_transfer_from().await.map(drop),
            OperationKind::Mint => self.run_mint().await.map(drop),
            OperationKind::Burn => self.run_burn().await.map(drop),
        };
        self.settle(kind, result)
    }

    /// Drop the session and everything derived from it.
    pub fn disconnect(&self) {
        let mut inner = self.lock();
        if let Some(session) = inner.ui.session.take() {
            info!(address = %session.address, "Session closed");
        }
        inner.handle = None;
        inner.ui.token = None;
        inner.ui.balance = None;
    }

    /// React to the wallet reporting a new account list.
    ///
    /// Closes the session when the connected account is no longer the
    /// active one. Returns whether the session was closed.
    pub fn accounts_changed(&self, accounts: &[Address]) -> bool {
        let Some(current) = self.session_address() else {
            return false;
        };

        if accounts.first() == Some(&current) {
            return false;
        }

        info!(
            previous = %current,
            active = ?accounts.first(),
            "Wallet account changed, closing session"
        );
        self.disconnect();
        true
    }

    /// Ask the wallet for its active account and close a stale session.
    pub async fn sync_accounts(&self) -> Result<bool> {
        let Some(bridge) = self.bridge.as_ref() else {
            return Ok(false);
        };
        if self.session_address().is_none() {
            return Ok(false);
        }

        let accounts = bridge.accounts().await?;
        Ok(self.accounts_changed(&accounts))
    }

    async fn open_session(&self) -> Result<Session> {
        let bridge = self
            .bridge
            .as_ref()
            .ok_or(OrchestratorError::WalletUnavailable)?;

        let accounts = bridge.request_accounts().await?;
        let address = *accounts.first().ok_or(ClientError::NoAccounts)?;

        let writer = self.connector.signing(bridge.signer(address)?);
        let name = writer.name().await?;
        let symbol = writer.symbol().await?;
        let owner = writer.owner().await?;

        let session = Session {
            address,
            is_owner: owner == address,
        };

        info!(
            address = %address,
            token = %name,
            symbol = %symbol,
            is_owner = session.is_owner,
            "Wallet connected"
        );

        {
            let mut inner = self.lock();
            inner.handle = Some(Arc::new(writer));
            inner.ui.session = Some(session.clone());
            inner.ui.token = Some(TokenInfo { name, symbol });
            inner.ui.balance = None;
        }

        self.refresh_balance(address).await;
        Ok(session)
    }

    async fn read_balance(&self) -> Result<Balance> {
        let address = self
            .session_address()
            .ok_or(OrchestratorError::NotConnected(OperationKind::CheckBalance))?;
        self.load_balance(address).await
    }

    async fn run_transfer(&self) -> Result<TxOutcome> {
        let kind = OperationKind::Transfer;
        let intent = self.lock().ui.forms.transfer.clone();
        if !intent.is_complete() {
            return Err(OrchestratorError::InvalidInput(TRANSFER_INPUT_MESSAGE.into()));
        }

        let writer = self.writer(kind)?;
        let recipient = parse_address(&intent.recipient)?;
        let amount = parse_amount(&intent.amount, self.decimals)?;

        info!(to = %recipient, amount = %intent.amount, "Submitting transfer");
        let outcome = writer.transfer(recipient, amount).await?;
        self.confirmed(kind, &outcome);

        self.lock().ui.forms.transfer = TransferIntent::default();
        self.refresh_balance(writer.account()).await;
        Ok(outcome)
    }

    async fn run_approve(&self) -> Result<TxOutcome> {
        let kind = OperationKind::Approve;
        let intent = self.lock().ui.forms.approval.clone();
        if !intent.is_complete() {
            return Err(OrchestratorError::InvalidInput(APPROVE_INPUT_MESSAGE.into()));
        }

        let writer = self.writer(kind)?;
        let spender = parse_address(&intent.spender)?;
        let amount = parse_amount(&intent.amount, self.decimals)?;

        info!(spender = %spender, amount = %intent.amount, "Submitting approval");
        let outcome = writer.approve(spender, amount).await?;
        self.confirmed(kind, &outcome);

        // Approval leaves the caller's balance unchanged, no refresh.
        let mut inner = self.lock();
        inner.ui.forms.approval = ApprovalIntent::default();
        inner.ui.notice = Some(APPROVE_SUCCESS.into());
        Ok(outcome)
    }

    async fn run_transfer_from(&self) -> Result<TxOutcome> {
        let kind = OperationKind::TransferFrom;
        let intent = self.lock().ui.forms.delegated.clone();
        if !intent.is_complete() {
            return Err(OrchestratorError::InvalidInput(
                TRANSFER_FROM_INPUT_MESSAGE.into(),
            ));
        }

        let writer = self.writer(kind)?;
        let from = parse_address(&intent.from)?;
        let to = parse_address(&intent.to)?;
        let amount = parse_amount(&intent.amount, self.decimals)?;
        let spender = writer.account();

        // The contract enforces the allowance too; checking first avoids
        // paying for a transaction that is certain to revert.
        let allowance = self
            .connector
            .read_only()
            .allowance(from, spender)
            .await?;
        if allowance < amount {
            let available = format_amount(allowance, self.decimals);
            debug!(from = %from, spender = %spender, %available, "Allowance too low");
            return Err(OrchestratorError::InsufficientAllowance { available });
        }

        info!(from = %from, to = %to, amount = %intent.amount, "Submitting delegated transfer");
        let outcome = writer.transfer_from(from, to, amount).await?;
        self.confirmed(kind, &outcome);

        {
            let mut inner = self.lock();
            inner.ui.forms.delegated = DelegatedTransferIntent::default();
            inner.ui.notice = Some(TRANSFER_FROM_SUCCESS.into());
        }
        self.refresh_balance(spender).await;
        Ok(outcome)
    }

    async fn run_mint(&self) -> Result<TxOutcome> {
        let kind = OperationKind::Mint;
        let input = self.lock().ui.forms.mint_amount.clone();
        if input.trim().is_empty() {
            return Err(OrchestratorError::InvalidInput(AMOUNT_INPUT_MESSAGE.into()));
        }

        let writer = self.writer(kind)?;
        let amount = parse_amount(&input, self.decimals)?;
        let to = writer.account();

        info!(to = %to, amount = %input, "Submitting mint");
        let outcome = writer.mint(to, amount).await?;
        self.confirmed(kind, &outcome);

        {
            let mut inner = self.lock();
            inner.ui.forms.mint_amount.clear();
            inner.ui.notice = Some(MINT_SUCCESS.into());
        }
        self.refresh_balance(to).await;
        Ok(outcome)
    }

    async fn run_burn(&self) -> Result<TxOutcome> {
        let kind = OperationKind::Burn;
        let input = self.lock().ui.forms.burn_amount.clone();
        if input.trim().is_empty() {
            return Err(OrchestratorError::InvalidInput(AMOUNT_INPUT_MESSAGE.into()));
        }

        let writer = self.writer(kind)?;
        let amount = parse_amount(&input, self.decimals)?;

        info!(from = %writer.account(), amount = %input, "Submitting burn");
        let outcome = writer.burn(amount).await?;
        self.confirmed(kind, &outcome);

        {
            let mut inner = self.lock();
            inner.ui.forms.burn_amount.clear();
            inner.ui.notice = Some(BURN_SUCCESS.into());
        }
        self.refresh_balance(writer.account()).await;
        Ok(outcome)
    }

    /// Read the balance of `address` and publish it if `address` is still
    /// the connected account.
    async fn load_balance(&self, address: Address) -> Result<Balance> {
        let amount = self.connector.read_only().balance_of(address).await?;

        let mut inner = self.lock();
        let symbol = inner
            .ui
            .token
            .as_ref()
            .map(|token| token.symbol.clone())
            .unwrap_or_default();
        let balance = Balance {
            amount: format_amount(amount, self.decimals),
            symbol,
        };

        if inner.ui.session.as_ref().map(|s| s.address) == Some(address) {
            inner.ui.balance = Some(balance.clone());
        } else {
            debug!(address = %address, "Session changed during balance read, result dropped");
        }

        Ok(balance)
    }

    /// Balance refresh after a confirmed write. A failed read is reported in
    /// the error slot but does not fail the write that triggered it.
    async fn refresh_balance(&self, address: Address) {
        if let Err(err) = self.load_balance(address).await {
            warn!(address = %address, error = %err, "Balance refresh failed");
            self.lock().ui.error = Some(err.to_string());
        }
    }

    /// Signing client of the current session.
    fn writer(&self, kind: OperationKind) -> Result<Arc<C::Writer>> {
        if self.bridge.is_none() {
            return Err(OrchestratorError::WalletUnavailable);
        }

        self.lock()
            .handle
            .clone()
            .ok_or(OrchestratorError::NotConnected(kind))
    }

    fn session_address(&self) -> Option<Address> {
        self.lock().ui.session.as_ref().map(|s| s.address)
    }

    /// Mark `kind` busy and reset the message slots for a new attempt.
    fn begin(&self, kind: OperationKind) -> Result<BusyGuard<'_, C::Writer>> {
        let mut inner = self.lock();
        if !inner.ui.busy.try_acquire(kind) {
            debug!(op = %kind, "Operation already in flight, ignoring");
            return Err(OrchestratorError::AlreadyPending(kind));
        }

        inner.ui.error = None;
        inner.ui.notice = None;
        debug!(op = %kind, "Operation started");

        Ok(BusyGuard {
            inner: &self.inner,
            kind,
        })
    }

    /// Publish the outcome of an operation to the error slot.
    fn settle<T>(&self, kind: OperationKind, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => debug!(op = %kind, "Operation succeeded"),
            Err(err) => {
                warn!(op = %kind, error = %err, "Operation failed");
                self.lock().ui.error = Some(err.to_string());
            }
        }
        result
    }

    fn confirmed(&self, kind: OperationKind, outcome: &TxOutcome) {
        info!(
            op = %kind,
            tx_hash = %outcome.tx_hash,
            block = ?outcome.block_number,
            gas_used = outcome.gas_used,
            "Transaction confirmed"
        );
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C::Writer>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
