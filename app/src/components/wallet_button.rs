use dioxus::prelude::*;
use futures::StreamExt;
use lsw_api::prelude::*;

use crate::hooks::{push_toast, use_config, use_toasts, use_wallet_balance};
use crate::{ToastKind, WalletState};

#[derive(Clone)]
enum WalletAction {
    Connect,
}

#[component]
pub fn WalletButton() -> Element {
    let mut wallet = use_context::<Signal<WalletState>>();
    let config = use_config();
    let toasts = use_toasts();
    let balance = use_wallet_balance();

    // Use coroutine for lifecycle-safe async operations
    let wallet_coro = use_coroutine(move |mut rx: UnboundedReceiver<WalletAction>| async move {
        while let Some(action) = rx.next().await {
            match action {
                WalletAction::Connect => match connect_wallet().await {
                    Ok((address, chain_id)) => {
                        tracing::info!("Wallet {} connected on chain {}", address, chain_id);
                        wallet.set(WalletState {
                            address: Some(address),
                            chain_id: Some(chain_id),
                        });
                    }
                    Err(e) => {
                        tracing::error!("Wallet connection failed: {}", e);
                        push_toast(toasts, ToastKind::Error, e.to_string(), None);
                    }
                },
            }
        }
    });

    let connect = move |_| {
        wallet_coro.send(WalletAction::Connect);
    };

    let disconnect = move |_| {
        wallet.set(WalletState::default());
    };

    let state = wallet();
    let Some(address) = state.address else {
        return rsx! {
            button {
                class: "btn btn-primary",
                onclick: connect,
                "Connect Wallet"
            }
        };
    };

    let short_address = address.short();
    let balance_text = (*balance.read())
        .flatten()
        .map(|b| format!("{} {}", format_units(b, config.balance_decimals), config.native_symbol));
    let network_warning = state.wrong_network(config.chain_id).then(|| {
        format!(
            "Wrong network! Please switch to {} (Chain ID: {}) in your wallet.",
            config.chain_name, config.chain_id
        )
    });

    rsx! {
        div { class: "flex items-center space-x-2",
            if let Some(warning) = network_warning {
                span { class: "text-sm text-red-400", "{warning}" }
            }
            if let Some(balance_text) = balance_text {
                span { class: "text-sm text-mid", "{balance_text}" }
            }
            span { class: "text-sm text-gray-400 font-mono", "{short_address}" }
            button {
                class: "btn btn-secondary text-sm",
                onclick: disconnect,
                "Disconnect"
            }
        }
    }
}

#[cfg(feature = "web")]
fn provider() -> Result<wasm_bindgen::JsValue, WalletError> {
    use js_sys::Reflect;
    use wasm_bindgen::JsValue;

    let window = web_sys::window().ok_or(WalletError::NoProvider)?;
    let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum"))
        .map_err(|_| WalletError::NoProvider)?;
    if ethereum.is_undefined() || ethereum.is_null() {
        return Err(WalletError::NoProvider);
    }
    Ok(ethereum)
}

/// EIP-1193 `request({ method, params })`.
#[cfg(feature = "web")]
async fn request(method: &str, params: js_sys::Array) -> Result<wasm_bindgen::JsValue, WalletError> {
    use js_sys::{Object, Promise, Reflect};
    use wasm_bindgen::prelude::*;

    let ethereum = provider()?;
    let request_fn: js_sys::Function = Reflect::get(&ethereum, &JsValue::from_str("request"))
        .map_err(|_| WalletError::NoProvider)?
        .dyn_into()
        .map_err(|_| WalletError::NoProvider)?;

    let args = Object::new();
    Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
        .map_err(|e| WalletError::Rejected(format!("{:?}", e)))?;
    Reflect::set(&args, &JsValue::from_str("params"), &params)
        .map_err(|e| WalletError::Rejected(format!("{:?}", e)))?;

    let promise: Promise = request_fn
        .call1(&ethereum, &args)
        .map_err(|e| WalletError::Rejected(js_message(&e)))?
        .dyn_into()
        .map_err(|_| WalletError::Rejected(format!("{} did not return a promise", method)))?;

    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| WalletError::Rejected(js_message(&e)))
}

/// Wallet errors arrive as `{ code, message }` objects.
#[cfg(feature = "web")]
fn js_message(value: &wasm_bindgen::JsValue) -> String {
    js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Asks the wallet for an account and reports the chain it is on.
#[cfg(feature = "web")]
async fn connect_wallet() -> Result<(Address, u64), WalletError> {
    use std::str::FromStr;

    let accounts = request("eth_requestAccounts", js_sys::Array::new()).await?;
    let first = js_sys::Array::from(&accounts)
        .get(0)
        .as_string()
        .ok_or(WalletError::NotConnected)?;
    let address = Address::from_str(&first)
        .map_err(|e| WalletError::Rejected(format!("wallet returned a bad address: {}", e)))?;

    let chain_id = request("eth_chainId", js_sys::Array::new())
        .await?
        .as_string()
        .ok_or_else(|| WalletError::Rejected("wallet returned no chain id".to_string()))?;
    let chain_id = lsw_api::abi::parse_quantity_u64(&chain_id).map_err(ChainError::from)?;

    Ok((address, chain_id))
}

/// Sends a transaction through the injected wallet. Returns the hash.
#[cfg(feature = "web")]
pub async fn send_transaction(tx: &TransactionRequest) -> Result<String, WalletError> {
    let json = serde_json::to_string(&tx.to_rpc())
        .map_err(|e| WalletError::Rejected(e.to_string()))?;
    let params = js_sys::JSON::parse(&json).map_err(|e| WalletError::Rejected(js_message(&e)))?;

    let hash = request("eth_sendTransaction", js_sys::Array::of1(&params)).await?;
    hash.as_string()
        .ok_or_else(|| WalletError::Rejected("wallet returned no transaction hash".to_string()))
}

#[cfg(not(feature = "web"))]
async fn connect_wallet() -> Result<(Address, u64), WalletError> {
    Err(WalletError::NoProvider)
}

#[cfg(not(feature = "web"))]
pub async fn send_transaction(_tx: &TransactionRequest) -> Result<String, WalletError> {
    Err(WalletError::NoProvider)
}
