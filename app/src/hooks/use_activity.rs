use std::rc::Rc;

use dioxus::prelude::*;
use lsw_api::prelude::*;

use super::rpc::{now_ms, sleep_ms, use_client, use_config, use_liveness};
use crate::{ActivityView, RoundView};

/// The activity feed: backfilled whenever the round id changes, then kept
/// current by polling new logs every [`LIVE_POLL_MS`].
pub fn use_activity() -> Signal<ActivityView> {
    let activity = use_context::<Signal<ActivityView>>();
    let round = use_context::<Signal<RoundView>>();
    let client = use_client();
    let contract = use_config().contract;
    let liveness = use_liveness();
    let backfills = use_hook(PollSequencer::new);

    let round_id = use_memo(move || round.read().poll().map(|p| p.round_id()));

    use_hook({
        let client = client.clone();
        let liveness = liveness.clone();
        move || {
            spawn(live_loop(activity, client, contract, liveness));
        }
    });

    use_effect(move || {
        let Some(round_id) = round_id() else {
            return;
        };
        let seq = backfills.issue();
        spawn(backfill(
            activity,
            client.clone(),
            contract,
            round_id,
            liveness.clone(),
            backfills.clone(),
            seq,
        ));
    });

    activity
}

async fn backfill(
    mut activity: Signal<ActivityView>,
    client: Rc<RpcClient>,
    contract: Address,
    round_id: U256,
    liveness: Liveness,
    backfills: PollSequencer,
    seq: u64,
) {
    activity.write().loading = true;
    let result = load_historical_events(&*client, contract, round_id).await;
    if !liveness.is_alive() || !backfills.accept(seq) {
        return;
    }
    let mut view = activity.write();
    view.loading = false;
    match result {
        Ok(events) => view.feed.load_historical(events),
        Err(e) => tracing::warn!("Backfill for round {} failed: {}", round_id, e),
    }
}

async fn live_loop(
    mut activity: Signal<ActivityView>,
    client: Rc<RpcClient>,
    contract: Address,
    liveness: Liveness,
) {
    let mut poller = LiveLogPoller::new(contract);
    while liveness.is_alive() {
        match poller.poll(&*client, now_ms()).await {
            Ok(events) if liveness.is_alive() && !events.is_empty() => {
                let mut view = activity.write();
                for event in events {
                    view.feed.append_live(event);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Live log poll failed: {}", e),
        }
        sleep_ms(LIVE_POLL_MS).await;
    }
}
