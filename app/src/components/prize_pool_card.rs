use dioxus::prelude::*;
use lsw_api::prelude::*;

use crate::hooks::use_config;
use crate::RoundView;

#[component]
pub fn PrizePoolCard() -> Element {
    let round = use_context::<Signal<RoundView>>();
    let config = use_config();
    let snapshot = round.read().snapshot();

    let amount = |value: U256| format!("{} {}", format_units(value, config.native_decimals), config.native_symbol);
    let total = amount(snapshot.total_amount);
    let winner = amount(snapshot.projected_share(WINNER_SHARE_PCT));
    let participants = amount(snapshot.projected_share(PARTICIPANT_SHARE_PCT));
    let treasury = amount(snapshot.projected_share(TREASURY_SHARE_PCT));
    let stakers = snapshot.stakers_count;
    let last_staker = snapshot
        .leader()
        .map(|a| a.short())
        .unwrap_or_else(|| "None".to_string());

    rsx! {
        div { class: "elevated-card border elevated-border rounded-lg p-6 space-y-6",
            div { class: "space-y-2",
                h2 { class: "text-2xl font-bold text-gold", "Prize Pool" }
                div { class: "text-4xl font-bold", "{total}" }
            }

            div { class: "grid grid-cols-2 gap-4",
                div { class: "rounded p-4",
                    div { class: "text-xs text-low uppercase tracking-wider mb-1", "Participants" }
                    div { class: "text-2xl font-bold", "{stakers}" }
                }
                div { class: "rounded p-4",
                    div { class: "text-xs text-low uppercase tracking-wider mb-1", "Last Staker" }
                    div { class: "text-sm font-mono text-gold", "{last_staker}" }
                }
            }

            div { class: "space-y-3 pt-4 border-t elevated-border",
                ShareRow { label: "Winner ({WINNER_SHARE_PCT}%)", value: winner }
                ShareRow { label: "Random Participants ({PARTICIPANT_SHARE_PCT}%)", value: participants }
                ShareRow { label: "Treasury ({TREASURY_SHARE_PCT}%)", value: treasury }
            }
        }
    }
}

#[component]
fn ShareRow(label: String, value: String) -> Element {
    rsx! {
        div { class: "flex justify-between items-center",
            span { class: "text-sm text-mid", "{label}" }
            span { class: "font-semibold", "{value}" }
        }
    }
}
