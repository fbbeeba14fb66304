use dioxus::prelude::*;

use crate::components::{
    ActivityFeed, GameStatus, NavLink, PrizePoolCard, RoundHistory, StakingPanel, TimerDisplay,
};
use crate::hooks::{use_is_owner, use_round};
use crate::route::Route;

#[component]
pub fn Play() -> Element {
    let round = use_round();
    let is_owner = use_is_owner();

    let view = round.read();
    let round_id = view.poll().map(|p| p.round_id());
    let is_loading = view.loading;
    let error = view.error.clone();
    drop(view);

    let show_admin = (*is_owner.read()).unwrap_or(false);

    if is_loading {
        return rsx! {
            div { class: "flex items-center justify-center py-24",
                div { class: "text-center space-y-4",
                    div { class: "text-4xl font-bold text-gold", "Last Staker Wins" }
                    div { class: "text-mid", "Loading game data..." }
                }
            }
        };
    }

    // No snapshot yet: nothing to show but the failure.
    let Some(round_id) = round_id else {
        let message = error.unwrap_or_else(|| "Failed to load game data".to_string());
        return rsx! {
            div { class: "flex items-center justify-center py-24",
                div { class: "text-center space-y-4",
                    div { class: "text-4xl font-bold text-gold", "Last Staker Wins" }
                    div { class: "text-red-400", "{message}" }
                    div { class: "text-sm text-mid mt-4", "Make sure you're connected to the right network" }
                }
            }
        };
    };

    rsx! {
        div { class: "space-y-8",
            div { class: "flex items-center justify-between",
                div { class: "text-sm text-mid", "Round #{round_id}" }
                if show_admin {
                    NavLink { to: Route::Admin {}, label: "Admin Panel" }
                }
            }

            GameStatus {}

            div { class: "grid grid-cols-1 lg:grid-cols-3 gap-8",
                div { class: "lg:col-span-2 space-y-8",
                    TimerDisplay {}
                    PrizePoolCard {}
                }
                div { class: "space-y-8",
                    StakingPanel {}
                }
            }

            div { class: "grid grid-cols-1 lg:grid-cols-2 gap-8",
                ActivityFeed {}
                RoundHistory {}
            }
        }
    }
}
