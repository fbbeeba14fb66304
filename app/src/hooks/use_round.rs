use std::rc::Rc;

use dioxus::prelude::*;
use lsw_api::prelude::*;

use super::rpc::{now_ms, sleep_ms, use_client, use_config, use_liveness};
use crate::RoundView;

/// Polls the round snapshot every [`SNAPSHOT_POLL_MS`] and ticks the countdown
/// every [`COUNTDOWN_TICK_MS`] between polls.
pub fn use_round() -> Signal<RoundView> {
    let round = use_context::<Signal<RoundView>>();
    let client = use_client();
    let contract = use_config().contract;
    let liveness = use_liveness();

    // Loops start once per mount and end with the component.
    use_hook(move || {
        spawn(snapshot_loop(round, client, contract, liveness.clone()));
        spawn(countdown_loop(round, liveness));
    });

    round
}

async fn snapshot_loop(
    round: Signal<RoundView>,
    client: Rc<RpcClient>,
    contract: Address,
    liveness: Liveness,
) {
    let sequencer = round.peek().tracker.sequencer();
    while liveness.is_alive() {
        // Polls are not awaited here: a slow response may land after a newer
        // one, and the sequencer drops it.
        let seq = sequencer.issue();
        spawn(fetch_round(round, client.clone(), contract, liveness.clone(), seq));
        sleep_ms(SNAPSHOT_POLL_MS).await;
    }
}

async fn fetch_round(
    mut round: Signal<RoundView>,
    client: Rc<RpcClient>,
    contract: Address,
    liveness: Liveness,
    seq: u64,
) {
    let result = read_round_poll(&*client, contract).await;
    if !liveness.is_alive() {
        return;
    }
    match result {
        Ok(poll) => {
            let mut view = round.write();
            if let Some(update) = view.tracker.apply(seq, poll, now_ms()) {
                if update.round_changed {
                    tracing::info!("Round {} is current", poll.round_id());
                }
                view.countdown = view.tracker.countdown().copied();
                view.loading = false;
                view.error = None;
            }
        }
        Err(e) => {
            tracing::warn!("Round poll failed: {}", e);
            let mut view = round.write();
            view.loading = false;
            view.error = Some(e.to_string());
        }
    }
}

async fn countdown_loop(mut round: Signal<RoundView>, liveness: Liveness) {
    loop {
        sleep_ms(COUNTDOWN_TICK_MS).await;
        if !liveness.is_alive() {
            break;
        }
        let mut view = round.write();
        if let Some(state) = view.tracker.tick(now_ms()) {
            view.countdown = Some(state);
        }
    }
}
