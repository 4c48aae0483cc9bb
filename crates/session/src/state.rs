//! Display state shared between the orchestrator and the console.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// Every user-triggerable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    Connect,
    CheckBalance,
    Transfer,
    Approve,
    TransferFrom,
    Mint,
    Burn,
}

impl OperationKind {
    pub const ALL: [Self; 7] = [
        Self::Connect,
        Self::CheckBalance,
        Self::Transfer,
        Self::Approve,
        Self::TransferFrom,
        Self::Mint,
        Self::Burn,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::CheckBalance => "balance",
            Self::Transfer => "transfer",
            Self::Approve => "approve",
            Self::TransferFrom => "transfer-from",
            Self::Mint => "mint",
            Self::Burn => "burn",
        }
    }

    /// Whether a successful run changes chain state.
    pub const fn is_write(&self) -> bool {
        !matches!(self, Self::Connect | Self::CheckBalance)
    }

    pub(crate) const fn not_connected_message(&self) -> &'static str {
        match self {
            Self::CheckBalance => "Vui lòng kết nối ví trước khi kiểm tra số dư.",
            _ => "Vui lòng kết nối ví trước khi thực hiện giao dịch.",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown operation: {s}"))
    }
}

/// Operations currently in flight, one slot per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyFlags {
    in_flight: BTreeSet<OperationKind>,
}

impl BusyFlags {
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.in_flight.contains(&kind)
    }

    pub fn any(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Kinds in flight, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = OperationKind> + '_ {
        self.in_flight.iter().copied()
    }

    /// Mark `kind` busy. Returns false if it already was.
    pub(crate) fn try_acquire(&mut self, kind: OperationKind) -> bool {
        self.in_flight.insert(kind)
    }

    pub(crate) fn release(&mut self, kind: OperationKind) {
        self.in_flight.remove(&kind);
    }
}

/// The connected wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Account authorized by the wallet
    pub address: Address,
    /// Whether the account is the contract owner. Only used to grey out
    /// owner controls; the contract decides who may mint.
    pub is_owner: bool,
}

/// Token metadata read at connect time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
}

/// Balance of the connected account, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferIntent {
    pub recipient: String,
    pub amount: String,
}

impl TransferIntent {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        filled(&self.recipient) && filled(&self.amount)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalIntent {
    pub spender: String,
    pub amount: String,
}

impl ApprovalIntent {
    pub fn new(spender: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            spender: spender.into(),
            amount: amount.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        filled(&self.spender) && filled(&self.amount)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedTransferIntent {
    pub from: String,
    pub to: String,
    pub amount: String,
}

impl DelegatedTransferIntent {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount: amount.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        filled(&self.from) && filled(&self.to) && filled(&self.amount)
    }
}

fn filled(field: &str) -> bool {
    !field.trim().is_empty()
}

/// Input fields of every form. Cleared on success, kept on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forms {
    pub transfer: TransferIntent,
    pub approval: ApprovalIntent,
    pub delegated: DelegatedTransferIntent,
    pub mint_amount: String,
    pub burn_amount: String,
}

/// Everything the console renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub session: Option<Session>,
    pub token: Option<TokenInfo>,
    pub balance: Option<Balance>,
    pub busy: BusyFlags,
    /// Latest failure of any operation
    pub error: Option<String>,
    /// Latest success confirmation of any operation
    pub notice: Option<String>,
    pub forms: Forms,
}

impl UiState {
    pub fn is_owner(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.is_owner)
    }

    /// Which controls are enabled.
    pub fn controls(&self) -> Controls {
        let idle = |kind| !self.busy.is_busy(kind);
        let owner = self.is_owner();

        Controls {
            connect: idle(OperationKind::Connect),
            check_balance: idle(OperationKind::CheckBalance),
            transfer: idle(OperationKind::Transfer),
            approve: idle(OperationKind::Approve),
            transfer_from: idle(OperationKind::TransferFrom),
            mint: owner && idle(OperationKind::Mint),
            burn: owner && idle(OperationKind::Burn),
        }
    }
}

/// Enabled state of each control.
///
/// Mint and burn are disabled for accounts that are not the contract owner.
/// This is a usability hint only: the orchestrator submits whatever it is
/// asked to, and the contract rejects unauthorized calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub connect: bool,
    pub check_balance: bool,
    pub transfer: bool,
    pub approve: bool,
    pub transfer_from: bool,
    pub mint: bool,
    pub burn: bool,
}

impl Controls {
    pub const fn is_enabled(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Connect => self.connect,
            OperationKind::CheckBalance => self.check_balance,
            OperationKind::Transfer => self.transfer,
            OperationKind::Approve => self.approve,
            OperationKind::TransferFrom => self.transfer_from,
            OperationKind::Mint => self.mint,
            OperationKind::Burn => self.burn,
        }
    }
}
