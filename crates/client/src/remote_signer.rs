//! Remote wallet that delegates account access and signing to a signer service.
//!
//! The service speaks the wallet subset of JSON-RPC: `eth_requestAccounts`
//! prompts for account access, `eth_accounts` lists the currently authorized
//! accounts without prompting, and `eth_signTransaction` returns the signed
//! raw transaction. A declined prompt is reported with the EIP-1193 code 4001.

use crate::{ClientError, USER_REJECTED_CODE};
use alloy_primitives::{Address, Bytes};
use alloy_rpc_types::eth::TransactionRequest;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

/// Serializes to an empty JSON array.
const NO_PARAMS: [(); 0] = [];

/// JSON-RPC client for a remote signer service.
///
/// # Example
///
/// ```ignore
/// let remote = RemoteSigner::new("http://localhost:9060");
/// let accounts = remote.request_accounts().await?;
/// let signed_tx = remote.sign_transaction(tx_request).await?;
/// provider.send_raw_transaction(&signed_tx).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    client: reqwest::Client,
    proxy_url: String,
}

impl RemoteSigner {
    /// Creates a new remote signer for the service at `proxy_url`.
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), proxy_url)
    }

    /// Creates a new remote signer with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, proxy_url: impl Into<String>) -> Self {
        Self {
            client,
            proxy_url: proxy_url.into(),
        }
    }

    /// Returns the service url.
    pub fn url(&self) -> &str {
        &self.proxy_url
    }

    /// Ask the wallet to authorize accounts, prompting the user if needed.
    pub async fn request_accounts(&self) -> Result<Vec<Address>, ClientError> {
        self.call("eth_requestAccounts", NO_PARAMS).await
    }

    /// List the accounts the wallet currently exposes, without prompting.
    pub async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
        self.call("eth_accounts", NO_PARAMS).await
    }

    /// Signs a transaction via the remote service.
    ///
    /// Returns the signed transaction as raw bytes, ready to be broadcast
    /// via `provider.send_raw_transaction()`.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes, ClientError> {
        let response: SignedTransactionResponse = self.call("eth_signTransaction", [tx]).await?;
        Ok(response.raw)
    }

    async fn call<P, T>(&self, method: &'static str, params: P) -> Result<T, ClientError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        debug!(method, url = %self.proxy_url, "Sending wallet request");

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .client
            .post(&self.proxy_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(ClientError::Connection(format!(
                "signer service returned {status}: {body}"
            )));
        }

        let rpc_response: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        rpc_response.into_result()
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

impl<T> JsonRpcResponse<T> {
    fn into_result(self) -> Result<T, ClientError> {
        match (self.result, self.error) {
            (Some(result), None) => Ok(result),
            (_, Some(error)) if error.code == USER_REJECTED_CODE => {
                Err(ClientError::Rejected(error.message))
            }
            (_, Some(error)) => Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (None, None) => Err(ClientError::Rpc {
                code: -1,
                message: "empty response".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Response from eth_signTransaction containing the signed transaction.
#[derive(Debug, Deserialize)]
struct SignedTransactionResponse {
    /// The signed transaction as hex-encoded RLP.
    raw: Bytes,
}
