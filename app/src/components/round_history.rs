use dioxus::prelude::*;
use lsw_api::prelude::*;

use crate::hooks::{use_clock, use_config, use_round_history};

#[component]
pub fn RoundHistory() -> Element {
    let history = use_round_history();
    let clock = use_clock();
    let rounds = history.cloned().unwrap_or_default();

    rsx! {
        div { class: "elevated-card border elevated-border rounded-lg p-6 space-y-4",
            h3 { class: "text-lg font-semibold", "Round History" }
            div { class: "space-y-3 max-h-96 overflow-y-auto",
                if rounds.is_empty() {
                    div { class: "text-center py-8",
                        p { class: "text-sm text-mid", "No completed rounds yet" }
                    }
                } else {
                    for record in rounds {
                        RoundRow { key: "{record.round_id}", record: record, now_ms: clock() }
                    }
                }
            }
        }
    }
}

#[component]
fn RoundRow(record: RoundRecord, now_ms: u64) -> Element {
    let config = use_config();
    let amount = |value: U256| format!("{} {}", format_units(value, config.native_decimals), config.native_symbol);

    let winner = record.winner.short();
    let prize = amount(record.total_amount);
    let ago = time_ago(record.ended_at_ms, now_ms);
    let stakers = record.stakers.as_option().map(|s| format!("{} stakers", s.len()));
    let explorer = record.tx_hash_hex().map(|hash| config.tx_url(&hash));
    let rewards = record.rewards.as_option().cloned();

    rsx! {
        div { class: "p-3 rounded border elevated-border",
            div { class: "flex items-center gap-2 mb-1",
                span { class: "text-sm font-semibold", "Round #{record.round_id}" }
                if let Some(stakers) = stakers {
                    span { class: "text-xs text-gold px-2 py-1 rounded", "{stakers}" }
                }
                span { class: "text-xs text-low ml-auto", "{ago}" }
            }
            div { class: "text-xs text-mid truncate", "Winner: {winner}" }
            div { class: "text-xs text-gold font-semibold", "Prize: {prize}" }
            if let Some(rewards) = rewards {
                RewardDetails { rewards: rewards }
            }
            if let Some(explorer) = explorer {
                a { class: "text-xs text-low hover:text-gold", href: "{explorer}", target: "_blank", "View transaction" }
            }
        }
    }
}

#[component]
fn RewardDetails(rewards: RewardBreakdown) -> Element {
    let config = use_config();
    let amount = |value: U256| format!("{} {}", format_units(value, config.native_decimals), config.native_symbol);
    let winner = amount(rewards.winner_amount);
    let participants = amount(rewards.participant_amount);
    let treasury = amount(rewards.treasury_amount);
    let random_winners = rewards
        .random_winners
        .as_option()
        .map(|winners| winners.iter().map(Address::short).collect::<Vec<_>>().join(" "));

    rsx! {
        div { class: "mt-2 text-xs space-y-1",
            div { "Winner Reward: " span { class: "text-green-400 font-bold", "{winner}" } }
            div { "Random Participants: " span { class: "text-blue-400 font-bold", "{participants}" } }
            div { "Treasury: " span { class: "text-yellow-400 font-bold", "{treasury}" } }
            if let Some(random_winners) = random_winners {
                div { "Random Winners: " span { class: "text-mid", "{random_winners}" } }
            }
        }
    }
}
