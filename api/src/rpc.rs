//! Ethereum JSON-RPC client.

use std::sync::atomic::{AtomicU64, Ordering};

use primitive_types::U256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::abi::{self, Address};
use crate::chain::ChainAccessor;
use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::event::{RawLog, RpcLog};
use crate::normalize::parse_rpc_log;
use crate::sdk::TransactionRequest;

#[derive(Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Deserialize, Debug)]
struct RpcBlock {
    timestamp: String,
}

#[derive(Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &ChainConfig) -> Self {
        Self::new(config.rpc_url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Vec<serde_json::Value>,
    ) -> Result<Option<T>, ChainError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let rpc_response: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            tracing::debug!("{} failed: {} {}", method, error.code, error.message);
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(rpc_response.result)
    }

    async fn request_some<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Vec<serde_json::Value>,
    ) -> Result<T, ChainError> {
        self.request(method, params)
            .await?
            .ok_or(ChainError::MissingResult(method))
    }

    /// `eth_chainId`.
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let id: String = self.request_some("eth_chainId", vec![]).await?;
        Ok(abi::parse_quantity_u64(&id)?)
    }

    /// `eth_getBalance` at the latest block, in the relay's units.
    pub async fn get_balance(&self, address: Address) -> Result<U256, ChainError> {
        let balance: String = self
            .request_some(
                "eth_getBalance",
                vec![serde_json::json!(address.to_string()), serde_json::json!("latest")],
            )
            .await?;
        Ok(abi::parse_quantity(&balance)?)
    }

    /// `eth_sendTransaction`, signed by the node. Returns the transaction hash.
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ChainError> {
        let params = serde_json::to_value(tx.to_rpc())
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        self.request_some("eth_sendTransaction", vec![params]).await
    }
}

impl ChainAccessor for RpcClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        let number: String = self.request_some("eth_blockNumber", vec![]).await?;
        Ok(abi::parse_quantity_u64(&number)?)
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let result: String = self
            .request_some(
                "eth_call",
                vec![
                    serde_json::json!({
                        "to": to.to_string(),
                        "data": abi::encode_hex(&data),
                    }),
                    serde_json::json!("latest"),
                ],
            )
            .await?;
        Ok(abi::decode_hex(&result)?)
    }

    async fn get_logs(&self, address: Address, from: u64, to: u64) -> Result<Vec<RawLog>, ChainError> {
        let logs: Vec<RpcLog> = self
            .request_some(
                "eth_getLogs",
                vec![serde_json::json!({
                    "address": address.to_string(),
                    "fromBlock": abi::quantity(from),
                    "toBlock": abi::quantity(to),
                })],
            )
            .await?;

        // A malformed entry is dropped, not fatal to the batch.
        Ok(logs
            .iter()
            .filter_map(|log| match parse_rpc_log(log) {
                Ok(log) => Some(log),
                Err(e) => {
                    tracing::debug!("skipping malformed log: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, ChainError> {
        let result: Option<RpcBlock> = self
            .request(
                "eth_getBlockByNumber",
                vec![serde_json::json!(abi::quantity(block)), serde_json::json!(false)],
            )
            .await?;
        let block_info = result.ok_or(ChainError::BlockNotFound(block))?;
        Ok(abi::parse_quantity_u64(&block_info.timestamp)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_blockNumber",
            params: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"jsonrpc": "2.0", "id": 7, "method": "eth_blockNumber", "params": []})
        );
    }

    #[test]
    fn test_response_envelope() {
        let ok: RpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#).unwrap();
        assert_eq!(ok.result.as_deref(), Some("0x10"));
        assert!(ok.error.is_none());

        let err: RpcResponse<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap();
        assert!(err.result.is_none());
        assert_eq!(err.error.unwrap().code, -32000);

        let missing_block: RpcResponse<RpcBlock> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(missing_block.result.is_none());
    }
}
