//! Session orchestration for the token console.
//!
//! The [`Orchestrator`] owns the wallet session and the display state, and
//! sequences every user action as connect → read → write → re-read:
//! - inputs are validated locally before any remote call
//! - writes go through the signing client created at connect time and
//!   resolve only once confirmed
//! - the balance is re-read after each confirmed write that can change it
//! - each operation kind has its own busy flag and single-flight guard
//! - failures land in one shared error slot as a user-facing message

pub mod error;
pub mod orchestrator;
pub mod state;
pub mod units;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::OrchestratorError;
pub use orchestrator::Orchestrator;
pub use state::{
    ApprovalIntent, Balance, BusyFlags, Controls, DelegatedTransferIntent, Forms, OperationKind,
    Session, TokenInfo, TransferIntent, UiState,
};
