//! Errors surfaced to the user.
//!
//! Every failure an operation can hit is mapped into [`OrchestratorError`]
//! at the operation boundary. The `Display` text is the message shown in the
//! error region of the console.

use crate::state::OperationKind;
use client::ClientError;
use thiserror::Error;

pub(crate) const TRANSFER_INPUT_MESSAGE: &str =
    "Vui lòng nhập đầy đủ địa chỉ nhận và số lượng token.";
pub(crate) const APPROVE_INPUT_MESSAGE: &str =
    "Vui lòng nhập đầy đủ địa chỉ được ủy quyền và số lượng token.";
pub(crate) const TRANSFER_FROM_INPUT_MESSAGE: &str =
    "Vui lòng nhập đầy đủ địa chỉ gửi, địa chỉ nhận và số lượng token.";
pub(crate) const AMOUNT_INPUT_MESSAGE: &str = "Vui lòng nhập số lượng token.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// No wallet bridge is available
    #[error("MetaMask chưa được cài đặt!")]
    WalletUnavailable,

    /// The operation needs a connected session
    #[error("{}", .0.not_connected_message())]
    NotConnected(OperationKind),

    /// A required field is empty or malformed
    #[error("{0}")]
    InvalidInput(String),

    /// Delegated transfer pre-check failed; carries the available allowance
    #[error("Số lượng được ủy quyền không đủ! Hiện có: {available}")]
    InsufficientAllowance { available: String },

    /// The wallet, the node or the contract rejected the call
    #[error("{0}")]
    RemoteCallFailed(String),

    /// An operation of the same kind is still in flight
    #[error("Thao tác {0} đang được xử lý, vui lòng chờ.")]
    AlreadyPending(OperationKind),
}

impl From<eyre::Report> for OrchestratorError {
    fn from(report: eyre::Report) -> Self {
        Self::RemoteCallFailed(format!("{report:#}"))
    }
}

impl From<ClientError> for OrchestratorError {
    fn from(err: ClientError) -> Self {
        Self::RemoteCallFailed(err.to_string())
    }
}
