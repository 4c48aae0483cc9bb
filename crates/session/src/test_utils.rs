//! In-memory token and wallet used by the orchestrator tests.

use alloy_primitives::{Address, TxHash, U256};
use client::{ClientError, SignerFn, SignerHandle, WalletBridge};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use token::{Connector, TokenReader, TokenWriter, TxOutcome};
use tokio::sync::Semaphore;

pub const WEI: u64 = 1_000_000_000_000_000_000;

pub fn owner() -> Address {
    Address::repeat_byte(0x0a)
}

pub fn alice() -> Address {
    Address::repeat_byte(0x0b)
}

pub fn bob() -> Address {
    Address::repeat_byte(0x0c)
}

pub fn tokens(n: u64) -> U256 {
    U256::from(n) * U256::from(WEI)
}

/// Contract state plus a log of every call that reached it.
pub struct Ledger {
    pub owner: Address,
    pub balances: HashMap<Address, U256>,
    pub allowances: HashMap<(Address, Address), U256>,
    pub calls: Vec<&'static str>,
    /// Fail the next writes with this message
    pub fail_writes: Option<String>,
    /// Hold writes until a permit is added
    pub write_gate: Option<Arc<Semaphore>>,
    /// Hold balance reads until a permit is added
    pub read_gate: Option<Arc<Semaphore>>,
    block: u64,
}

impl Ledger {
    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| **call == name).count()
    }

    fn debit(&mut self, account: Address, amount: U256) -> eyre::Result<()> {
        let balance = self.balances.entry(account).or_default();
        if *balance < amount {
            eyre::bail!("execution reverted: ERC20InsufficientBalance");
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, account: Address, amount: U256) {
        *self.balances.entry(account).or_default() += amount;
    }

    fn outcome(&mut self) -> TxOutcome {
        self.block += 1;
        TxOutcome {
            tx_hash: TxHash::with_last_byte(self.block as u8),
            block_number: Some(self.block),
            gas_used: 21_000,
        }
    }
}

#[derive(Clone)]
pub struct MockConnector {
    ledger: Arc<Mutex<Ledger>>,
}

impl MockConnector {
    /// A token owned by [`owner`] where [`alice`] holds 100 tokens.
    pub fn new() -> Self {
        let mut balances = HashMap::new();
        balances.insert(alice(), tokens(100));
        balances.insert(owner(), tokens(1_000));

        Self {
            ledger: Arc::new(Mutex::new(Ledger {
                owner: owner(),
                balances,
                allowances: HashMap::new(),
                calls: Vec::new(),
                fail_writes: None,
                write_gate: None,
                read_gate: None,
                block: 0,
            })),
        }
    }

    pub fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap()
    }
}

impl Connector for MockConnector {
    type Reader = MockToken;
    type Writer = MockToken;

    fn read_only(&self) -> MockToken {
        MockToken {
            ledger: self.ledger.clone(),
            caller: None,
        }
    }

    fn signing(&self, handle: SignerHandle) -> MockToken {
        MockToken {
            ledger: self.ledger.clone(),
            caller: Some(handle.address()),
        }
    }
}

pub struct MockToken {
    ledger: Arc<Mutex<Ledger>>,
    caller: Option<Address>,
}

impl MockToken {
    fn record(&self, call: &'static str) -> MutexGuard<'_, Ledger> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.calls.push(call);
        ledger
    }

    /// Record a write and wait for the write gate, if any.
    async fn enter_write(&self, call: &'static str) -> eyre::Result<Address> {
        let gate = self.record(call).write_gate.clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }

        if let Some(message) = self.ledger.lock().unwrap().fail_writes.clone() {
            eyre::bail!(message);
        }

        self.caller
            .ok_or_else(|| eyre::eyre!("write on read-only client"))
    }
}

impl TokenReader for MockToken {
    async fn name(&self) -> eyre::Result<String> {
        drop(self.record("name"));
        Ok("Shadow2 token".to_string())
    }

    async fn symbol(&self) -> eyre::Result<String> {
        drop(self.record("symbol"));
        Ok("SDT".to_string())
    }

    async fn owner(&self) -> eyre::Result<Address> {
        Ok(self.record("owner").owner)
    }

    async fn balance_of(&self, account: Address) -> eyre::Result<U256> {
        let gate = self.record("balanceOf").read_gate.clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }

        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.balances.get(&account).copied().unwrap_or_default())
    }

    async fn allowance(&self, owner: Address, spender: Address) -> eyre::Result<U256> {
        let ledger = self.record("allowance");
        Ok(ledger
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default())
    }
}

impl TokenWriter for MockToken {
    fn account(&self) -> Address {
        self.caller.unwrap_or_default()
    }

    async fn transfer(&self, recipient: Address, amount: U256) -> eyre::Result<TxOutcome> {
        let caller = self.enter_write("transfer").await?;
        let mut ledger = self.ledger.lock().unwrap();
        ledger.debit(caller, amount)?;
        ledger.credit(recipient, amount);
        Ok(ledger.outcome())
    }

    async fn approve(&self, spender: Address, amount: U256) -> eyre::Result<TxOutcome> {
        let caller = self.enter_write("approve").await?;
        let mut ledger = self.ledger.lock().unwrap();
        ledger.allowances.insert((caller, spender), amount);
        Ok(ledger.outcome())
    }

    async fn transfer_from(
        &self,
        sender: Address,
        recipient: Address,
        amount: U256,
    ) -> eyre::Result<TxOutcome> {
        let caller = self.enter_write("transferFrom").await?;
        let mut ledger = self.ledger.lock().unwrap();
        let allowance = ledger.allowances.entry((sender, caller)).or_default();
        if *allowance < amount {
            eyre::bail!("execution reverted: ERC20InsufficientAllowance");
        }
        *allowance -= amount;
        ledger.debit(sender, amount)?;
        ledger.credit(recipient, amount);
        Ok(ledger.outcome())
    }

    async fn mint(&self, to: Address, amount: U256) -> eyre::Result<TxOutcome> {
        let caller = self.enter_write("mint").await?;
        let mut ledger = self.ledger.lock().unwrap();
        if caller != ledger.owner {
            eyre::bail!("execution reverted: OwnableUnauthorizedAccount({caller})");
        }
        ledger.credit(to, amount);
        Ok(ledger.outcome())
    }

    async fn burn(&self, amount: U256) -> eyre::Result<TxOutcome> {
        let caller = self.enter_write("burn").await?;
        let mut ledger = self.ledger.lock().unwrap();
        ledger.debit(caller, amount)?;
        Ok(ledger.outcome())
    }
}

/// Wallet exposing a fixed, changeable account list.
#[derive(Clone)]
pub struct MockBridge {
    accounts: Arc<Mutex<Vec<Address>>>,
    reject: bool,
}

impl MockBridge {
    pub fn with_account(account: Address) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(vec![account])),
            reject: false,
        }
    }

    /// A wallet whose user declines every prompt.
    pub fn rejecting() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(Vec::new())),
            reject: true,
        }
    }

    pub fn switch_to(&self, account: Address) {
        *self.accounts.lock().unwrap() = vec![account];
    }
}

impl WalletBridge for MockBridge {
    async fn request_accounts(&self) -> Result<Vec<Address>, ClientError> {
        if self.reject {
            return Err(ClientError::Rejected("User rejected the request.".to_string()));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    fn signer(&self, account: Address) -> Result<SignerHandle, ClientError> {
        Ok(SignerHandle::new(account, mock_signer()))
    }
}

/// Create a mock signer that panics if called.
/// The mock token applies writes without signing.
pub fn mock_signer() -> SignerFn {
    Arc::new(|_tx| Box::pin(async { panic!("mock signer should not be called") }))
}
