use dioxus::prelude::*;
use lsw_api::prelude::*;

use crate::hooks::{use_activity, use_clock, use_config};

#[component]
pub fn ActivityFeed() -> Element {
    let activity = use_activity();
    let clock = use_clock();
    let view = activity.read();

    rsx! {
        div { class: "elevated-card border elevated-border rounded-lg p-6 space-y-4",
            h3 { class: "text-lg font-semibold", "Live Activity" }
            div { class: "space-y-3 max-h-96 overflow-y-auto",
                if view.feed.is_empty() {
                    div { class: "text-center py-8",
                        p { class: "text-sm text-mid", "Waiting for activity..." }
                    }
                } else {
                    for event in view.feed.iter().cloned() {
                        ActivityRow { key: "{event.id}", event: event, now_ms: clock() }
                    }
                }
            }
        }
    }
}

#[component]
fn ActivityRow(event: DomainEvent, now_ms: u64) -> Element {
    let config = use_config();
    let amount = |value: &U256| format!("{} {}", format_units(*value, config.native_decimals), config.native_symbol);
    let ago = time_ago(event.timestamp_ms, now_ms);

    let (icon, subject, action, detail) = match &event.payload {
        EventPayload::Stake { staker, amount: staked, .. } => {
            ("📍", staker.short(), "staked", amount(staked))
        }
        EventPayload::RoundEnded { winner, total_amount, .. } => (
            "🏆",
            winner.short(),
            "won the round",
            format!("Prize: {}", amount(total_amount)),
        ),
        EventPayload::RoundStarted { .. } => (
            "🎮",
            String::new(),
            "Round started",
            format!("Round #{}", event.round_id),
        ),
    };

    rsx! {
        div { class: "flex items-start gap-3 p-3 rounded border elevated-border",
            div { class: "text-lg mt-0.5", "{icon}" }
            div { class: "flex-1 min-w-0",
                p { class: "text-sm font-medium",
                    if !subject.is_empty() {
                        span { class: "text-gold", "{subject} " }
                    }
                    "{action}"
                }
                p { class: "text-xs text-mid", "{detail}" }
            }
            span { class: "text-xs text-low whitespace-nowrap", "{ago}" }
        }
    }
}
