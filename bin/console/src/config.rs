use ::config::{DeploymentBuilder, TokenDeployment};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint url of the chain the token lives on
    pub rpc_url: String,

    /// Token contract address, defaults to the SDT deployment
    #[serde(default)]
    pub token_address: Option<Address>,

    /// Chain ID used for signing, defaults to the SDT deployment
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Remote signer service url, used when no private key is given
    #[serde(default)]
    pub signer_proxy_url: Option<String>,

    /// Port of the Prometheus exporter, disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// The token deployment with overrides from this config applied.
    pub fn deployment(&self) -> TokenDeployment {
        let mut builder = DeploymentBuilder::sdt();
        if let Some(address) = self.token_address {
            builder = builder.address(address);
        }
        if let Some(chain_id) = self.chain_id {
            builder = builder.chain_id(chain_id);
        }
        builder.build()
    }
}
