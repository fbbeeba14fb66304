use std::rc::Rc;

use dioxus::prelude::*;
use lsw_api::prelude::*;

pub fn use_client() -> Rc<RpcClient> {
    use_context::<Rc<RpcClient>>()
}

pub fn use_config() -> ChainConfig {
    use_context::<ChainConfig>()
}

/// Wall-clock milliseconds since the epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(ms: u32) {
    tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
}

/// A `Liveness` flag stopped when the calling component is dropped.
pub fn use_liveness() -> Liveness {
    let liveness = use_hook(Liveness::new);
    use_drop({
        let liveness = liveness.clone();
        move || liveness.stop()
    });
    liveness
}

/// Current time, refreshed every [`COUNTDOWN_TICK_MS`] for relative
/// timestamps.
pub fn use_clock() -> Signal<u64> {
    let mut clock = use_signal(now_ms);
    let liveness = use_liveness();

    use_hook(move || {
        spawn(async move {
            loop {
                sleep_ms(COUNTDOWN_TICK_MS).await;
                if !liveness.is_alive() {
                    break;
                }
                clock.set(now_ms());
            }
        });
    });

    clock
}
