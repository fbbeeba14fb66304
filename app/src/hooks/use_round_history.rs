use dioxus::prelude::*;
use lsw_api::prelude::*;

use super::rpc::{use_client, use_config};
use crate::RoundView;

/// The last [`HISTORY_LIMIT`] finished rounds, reloaded when a new round
/// begins.
pub fn use_round_history() -> Resource<Vec<RoundRecord>> {
    let round = use_context::<Signal<RoundView>>();
    let client = use_client();
    let contract = use_config().contract;

    let round_id = use_memo(move || round.read().poll().map(|p| p.round_id()));

    use_resource(move || {
        let client = client.clone();
        // Subscribe to round changes.
        let _ = round_id();
        async move {
            match fetch_recent_rounds(&*client, contract, HISTORY_LIMIT).await {
                Ok(rounds) => rounds,
                Err(e) => {
                    tracing::warn!("Round history failed: {}", e);
                    Vec::new()
                }
            }
        }
    })
}
