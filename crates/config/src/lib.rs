//! Configuration types for the token console.
//!
//! This crate provides:
//! - The fixed SDT token deployment (chain, contract address, decimals)
//! - A builder to override deployment fields for local nodes and forks

pub mod deployment;

pub use deployment::{DeploymentBuilder, TokenDeployment, TOKEN_DECIMALS};
