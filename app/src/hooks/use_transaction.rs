use dioxus::prelude::*;
use lsw_api::prelude::*;

use super::rpc::sleep_ms;
use crate::components::send_transaction;
use crate::{Toast, ToastKind, WalletState};

pub fn use_toasts() -> Signal<Vec<Toast>> {
    use_context::<Signal<Vec<Toast>>>()
}

/// Shows a toast and removes it after [`TOAST_DISMISS_MS`].
pub fn push_toast(mut toasts: Signal<Vec<Toast>>, kind: ToastKind, message: String, link: Option<String>) {
    let id = toasts.peek().iter().map(|t| t.id + 1).max().unwrap_or(1);
    toasts.write().push(Toast { id, kind, message, link });

    spawn(async move {
        sleep_ms(TOAST_DISMISS_MS).await;
        toasts.write().retain(|t| t.id != id);
    });
}

/// Sends a built transaction through the injected wallet, after checking the
/// wallet is on the configured network.
pub async fn submit(
    config: &ChainConfig,
    wallet: WalletState,
    tx: Result<TransactionRequest, WalletError>,
) -> Result<String, WalletError> {
    let tx = tx?;
    if let Some(actual) = wallet.chain_id {
        if actual != config.chain_id {
            return Err(WalletError::WrongNetwork {
                expected: config.chain_id,
                actual,
            });
        }
    }
    send_transaction(&tx).await
}

/// Runs [`submit`] and reports the outcome as a toast. Returns whether the
/// transaction was accepted by the wallet.
pub async fn submit_with_toast(
    config: &ChainConfig,
    wallet: WalletState,
    toasts: Signal<Vec<Toast>>,
    tx: Result<TransactionRequest, WalletError>,
    success: &str,
) -> bool {
    match submit(config, wallet, tx).await {
        Ok(hash) => {
            tracing::info!("{}: {}", success, hash);
            let short = hash.get(..10).unwrap_or(&hash);
            push_toast(
                toasts,
                ToastKind::Success,
                format!("{}: {}...", success, short),
                Some(config.tx_url(&hash)),
            );
            true
        }
        Err(e) => {
            tracing::error!("Transaction failed: {}", e);
            push_toast(toasts, ToastKind::Error, e.to_string(), None);
            false
        }
    }
}
