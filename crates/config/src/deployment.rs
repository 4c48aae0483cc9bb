//! Token deployment configuration.
//!
//! The console talks to exactly one deployed token contract. The defaults
//! point at the public SDT deployment; tests and local nodes override them
//! through [`DeploymentBuilder`].

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Fixed-point scale of every SDT amount.
pub const TOKEN_DECIMALS: u8 = 18;

/// A single token deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeployment {
    /// Human readable label shown in the console header
    pub label: String,
    /// Chain ID the contract is deployed on
    pub chain_id: u64,
    /// Token contract address
    pub address: Address,
    /// Number of decimals used to convert between display and base units
    pub decimals: u8,
}

impl TokenDeployment {
    /// The SDT deployment on Ethereum Sepolia.
    pub fn sdt() -> Self {
        Self {
            label: "Shadow2 token - SDT".to_string(),
            chain_id: 11155111,
            address: address!("0x69a155ddd740167Ff5022A96a6Ff98af0E6Cb0Aa"),
            decimals: TOKEN_DECIMALS,
        }
    }
}

impl Default for TokenDeployment {
    fn default() -> Self {
        Self::sdt()
    }
}

/// Builder for custom deployments.
#[derive(Debug, Clone)]
pub struct DeploymentBuilder {
    deployment: TokenDeployment,
}

impl DeploymentBuilder {
    /// Start with the SDT defaults.
    pub fn sdt() -> Self {
        Self {
            deployment: TokenDeployment::sdt(),
        }
    }

    /// Override the token contract address.
    pub const fn address(mut self, address: Address) -> Self {
        self.deployment.address = address;
        self
    }

    /// Override the chain ID.
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.deployment.chain_id = chain_id;
        self
    }

    /// Override the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.deployment.label = label.into();
        self
    }

    /// Build the deployment.
    pub fn build(self) -> TokenDeployment {
        self.deployment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdt_deployment() {
        let deployment = TokenDeployment::sdt();
        assert_eq!(deployment.chain_id, 11155111);
        assert_eq!(deployment.decimals, 18);
        assert_eq!(
            deployment.address,
            address!("69a155ddd740167ff5022a96a6ff98af0e6cb0aa")
        );
    }

    #[test]
    fn test_custom_deployment_builder() {
        let local_token = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

        let deployment = DeploymentBuilder::sdt()
            .address(local_token)
            .chain_id(31337)
            .label("anvil")
            .build();

        assert_eq!(deployment.address, local_token);
        assert_eq!(deployment.chain_id, 31337);
        assert_eq!(deployment.label, "anvil");
        assert_eq!(deployment.decimals, TOKEN_DECIMALS);
    }
}
