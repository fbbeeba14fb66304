use dioxus::prelude::*;
use lsw_api::prelude::*;

use super::rpc::{use_client, use_config};
use crate::WalletState;

/// Native balance of the connected wallet, `None` while disconnected or
/// when the read fails.
pub fn use_wallet_balance() -> Resource<Option<U256>> {
    let wallet = use_context::<Signal<WalletState>>();
    let client = use_client();

    use_resource(move || {
        let client = client.clone();
        let address = wallet.read().address;
        async move {
            let address = address?;
            match client.get_balance(address).await {
                Ok(balance) => Some(balance),
                Err(e) => {
                    tracing::warn!("Balance read failed for {}: {}", address, e);
                    None
                }
            }
        }
    })
}

/// Whether the connected wallet owns the game contract.
pub fn use_is_owner() -> Resource<bool> {
    let wallet = use_context::<Signal<WalletState>>();
    let client = use_client();
    let contract = use_config().contract;

    use_resource(move || {
        let client = client.clone();
        let address = wallet.read().address;
        async move {
            let Some(address) = address else {
                return false;
            };
            is_owner(&*client, contract, address).await.unwrap_or_else(|e| {
                tracing::warn!("Owner read failed: {}", e);
                false
            })
        }
    })
}

/// The on-chain minimum stake, in contract units.
pub fn use_stake_amount() -> Resource<Option<U256>> {
    let client = use_client();
    let contract = use_config().contract;

    use_resource(move || {
        let client = client.clone();
        async move {
            read_stake_amount(&*client, contract)
                .await
                .map_err(|e| tracing::warn!("Stake amount read failed: {}", e))
                .ok()
        }
    })
}
