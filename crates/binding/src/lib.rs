//! Contract bindings for the SDT token.
//!
//! The token is a standard ERC20 extended with owner-gated `mint` and a
//! holder `burn`. Bindings are generated using alloy's `sol!` macro.

pub mod token;
