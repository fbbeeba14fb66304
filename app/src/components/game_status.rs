use dioxus::prelude::*;
use lsw_api::prelude::*;

use crate::RoundView;

const FINAL_STRETCH_SECS: u64 = 1_800;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub title: &'static str,
    pub description: String,
    pub class: &'static str,
}

/// Banner for the current round, from the countdown phase and the seconds it
/// shows.
pub fn status_message(phase: Phase, seconds: u64) -> StatusMessage {
    match phase {
        Phase::Waiting => {
            let minutes = seconds / 60;
            let plural = if minutes == 1 { "" } else { "s" };
            StatusMessage {
                title: "Waiting to Start",
                description: format!("Staking opens in {} minute{}", minutes, plural),
                class: "text-mid border-gray-600",
            }
        }
        Phase::Buffer | Phase::Expired => StatusMessage {
            title: "Buffer Period Active",
            description: "Staking extends the deadline by 5 minutes each time".to_string(),
            class: "text-orange-400 border-orange-500",
        },
        Phase::Active if seconds <= FINAL_STRETCH_SECS => StatusMessage {
            title: "Final 30 Minutes",
            description: "The round is heating up - place your stake now".to_string(),
            class: "text-gold border-gold",
        },
        Phase::Active => StatusMessage {
            title: "Round Active",
            description: "Place your stake to compete for the prize pool".to_string(),
            class: "text-gold border-gold",
        },
    }
}

#[component]
pub fn GameStatus() -> Element {
    let round = use_context::<Signal<RoundView>>();
    let Some(countdown) = round.read().countdown else {
        return rsx! {};
    };
    let status = status_message(countdown.phase, countdown.seconds_remaining);

    rsx! {
        div { class: "elevated-card border rounded-lg p-6 {status.class}",
            h2 { class: "text-2xl font-bold mb-2", "{status.title}" }
            p { class: "text-mid", "{status.description}" }
        }
    }
}
