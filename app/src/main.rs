#![allow(non_snake_case)]

mod components;
mod hooks;
mod pages;
mod route;

use std::rc::Rc;

use dioxus::prelude::*;
use lsw_api::prelude::*;
use route::Route;

fn main() {
    #[cfg(feature = "web")]
    {
        tracing_wasm::set_as_global_default();
        dioxus::launch(App);
    }

    #[cfg(feature = "desktop")]
    {
        dioxus::launch(App);
    }
}

/// Network settings, overridable at build time with the same `LSW_*`
/// variables the CLI reads at run time.
fn build_config() -> ChainConfig {
    ChainConfig::from_lookup(|key| {
        let value = match key {
            "LSW_RPC_URL" => option_env!("LSW_RPC_URL"),
            "LSW_CHAIN_ID" => option_env!("LSW_CHAIN_ID"),
            "LSW_CHAIN_NAME" => option_env!("LSW_CHAIN_NAME"),
            "LSW_CONTRACT_ADDRESS" => option_env!("LSW_CONTRACT_ADDRESS"),
            "LSW_EXPLORER_URL" => option_env!("LSW_EXPLORER_URL"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

#[component]
fn App() -> Element {
    // Global state providers
    let config = use_context_provider(build_config);
    use_context_provider(|| Rc::new(RpcClient::from_config(&config)));
    use_context_provider(|| Signal::new(WalletState::default()));
    use_context_provider(|| Signal::new(RoundView::default()));
    use_context_provider(|| Signal::new(ActivityView::default()));
    use_context_provider(|| Signal::new(Vec::<Toast>::new()));

    rsx! {
        Router::<Route> {}
    }
}

// Global state types
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct WalletState {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
}

impl WalletState {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// Connected, but to a chain other than `expected`.
    pub fn wrong_network(&self, expected: u64) -> bool {
        matches!(self.chain_id, Some(id) if id != expected)
    }
}

#[derive(Clone, Debug)]
pub struct RoundView {
    pub tracker: RoundTracker,
    pub countdown: Option<CountdownState>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for RoundView {
    fn default() -> Self {
        Self {
            tracker: RoundTracker::new(),
            countdown: None,
            loading: true,
            error: None,
        }
    }
}

impl RoundView {
    pub fn poll(&self) -> Option<&RoundPoll> {
        self.tracker.poll()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        self.tracker.poll().map(|p| p.snapshot).unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActivityView {
    pub feed: ActivityFeed,
    pub loading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub link: Option<String>,
}
