use std::str::FromStr;

use primitive_types::U256;

use crate::abi::Address;

pub const DEFAULT_CHAIN_ID: u64 = 296;
pub const DEFAULT_CHAIN_NAME: &str = "Hedera Testnet";
pub const DEFAULT_RPC_URL: &str = "https://testnet.hashio.io/rpc";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xDBdB83000b490b239ddA8E9efcAB2f3b9c3c2BdC";
pub const DEFAULT_EXPLORER_URL: &str = "https://hashscan.io/testnet";

/// Network and contract the client talks to.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub chain_name: String,
    pub contract: Address,
    pub explorer_url: String,
    pub native_symbol: String,

    /// Decimals of the amounts the contract stores and emits.
    pub native_decimals: u32,

    /// Factor from contract units to the `value` field of a transaction.
    /// Hedera's JSON-RPC relay takes weibars (18 decimals) while the EVM
    /// accounts in tinybars (8 decimals).
    pub value_scale: U256,

    /// Decimals of balances reported by the relay.
    pub balance_decimals: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            chain_name: DEFAULT_CHAIN_NAME.to_string(),
            contract: Address::from_str(DEFAULT_CONTRACT_ADDRESS).unwrap_or_default(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            native_symbol: "HBAR".to_string(),
            native_decimals: 8,
            value_scale: U256::exp10(10),
            balance_decimals: 18,
        }
    }
}

impl ChainConfig {
    /// Defaults overridden by `LSW_*` environment variables. `RPC` is honored
    /// as an alias of `LSW_RPC_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ChainConfig::from_env`], reading values through `lookup`.
    /// Unparseable values fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("LSW_RPC_URL").or_else(|| lookup("RPC")) {
            config.rpc_url = url;
        }
        if let Some(id) = lookup("LSW_CHAIN_ID") {
            match id.parse() {
                Ok(id) => config.chain_id = id,
                Err(_) => tracing::warn!("ignoring invalid LSW_CHAIN_ID {:?}", id),
            }
        }
        if let Some(name) = lookup("LSW_CHAIN_NAME") {
            config.chain_name = name;
        }
        if let Some(address) = lookup("LSW_CONTRACT_ADDRESS") {
            match Address::from_str(&address) {
                Ok(address) => config.contract = address,
                Err(_) => tracing::warn!("ignoring invalid LSW_CONTRACT_ADDRESS {:?}", address),
            }
        }
        if let Some(url) = lookup("LSW_EXPLORER_URL") {
            config.explorer_url = url;
        }
        config
    }

    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}/transaction/{}", self.explorer_url, hash)
    }

    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }
}
