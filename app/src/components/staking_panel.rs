use dioxus::prelude::*;
use lsw_api::prelude::*;

use crate::hooks::{submit_with_toast, use_config, use_stake_amount, use_toasts};
use crate::{RoundView, WalletState};

/// What the staking panel offers for the current round and wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeAction {
    StartNewRound,
    Waiting,
    Unavailable,
    ConnectWallet,
    Stake,
}

pub fn stake_action(phase: Phase, staking_available: bool, connected: bool) -> StakeAction {
    match phase {
        Phase::Expired => StakeAction::StartNewRound,
        Phase::Waiting => StakeAction::Waiting,
        _ if !staking_available => StakeAction::Unavailable,
        _ if !connected => StakeAction::ConnectWallet,
        _ => StakeAction::Stake,
    }
}

#[component]
pub fn StakingPanel() -> Element {
    let round = use_context::<Signal<RoundView>>();
    let wallet = use_context::<Signal<WalletState>>();
    let toasts = use_toasts();
    let config = use_config();
    let minimum = use_stake_amount();
    let mut pending = use_signal(|| false);

    let (Some(poll), Some(countdown)) = (round.read().poll().copied(), round.read().countdown) else {
        return rsx! {};
    };
    let state = wallet();
    let action = stake_action(countdown.phase, poll.staking_available, state.is_connected());
    let symbol = config.native_symbol.clone();
    let minimum_amount = (*minimum.read()).flatten();
    let minimum_text = minimum_amount
        .map(|m| format!("{} {}", format_units(m, config.native_decimals), config.native_symbol))
        .unwrap_or_else(|| "...".to_string());
    let busy = pending();

    let stake = {
        let config = config.clone();
        move |_| {
            let config = config.clone();
            spawn(async move {
                pending.set(true);
                let wallet = wallet();
                let tx = match minimum_amount {
                    Some(minimum) => sdk::stake(&config, wallet.address, minimum, minimum),
                    None => Err(WalletError::Chain(ChainError::MissingResult("stakeAmount"))),
                };
                submit_with_toast(&config, wallet, toasts, tx, "Transaction submitted").await;
                pending.set(false);
            });
        }
    };

    let start_round = {
        let config = config.clone();
        move |_| {
            let config = config.clone();
            spawn(async move {
                pending.set(true);
                let wallet = wallet();
                let tx = sdk::start_new_round(&config, wallet.address);
                submit_with_toast(&config, wallet, toasts, tx, "Transaction submitted").await;
                pending.set(false);
            });
        }
    };

    rsx! {
        div { class: "elevated-card border elevated-border rounded-lg p-6 space-y-4",
            div { class: "space-y-2",
                h3 { class: "text-lg font-semibold", "Stake {symbol}" }
                p { class: "text-sm text-mid", "Minimum stake: {minimum_text}" }
            }

            {match action {
                StakeAction::StartNewRound => rsx! {
                    div { class: "space-y-3",
                        div { class: "border border-red-500 rounded p-3",
                            p { class: "text-sm text-red-400", "Round has expired. Start a new round to continue playing." }
                        }
                        button {
                            class: "btn btn-primary w-full",
                            disabled: busy || !state.is_connected(),
                            onclick: start_round,
                            if busy { "Starting Round..." } else { "Start New Round" }
                        }
                    }
                },
                StakeAction::Waiting => rsx! {
                    div { class: "space-y-3",
                        div { class: "border rounded p-3",
                            p { class: "text-sm text-mid", "Waiting for the round to start..." }
                        }
                        button { class: "btn w-full", disabled: true, "Staking Not Available" }
                    }
                },
                StakeAction::Unavailable => rsx! {
                    div { class: "space-y-3",
                        div { class: "border border-orange-500 rounded p-3",
                            p { class: "text-sm text-orange-400", "Staking is temporarily unavailable. Please wait..." }
                        }
                        button { class: "btn w-full", disabled: true, "Staking Unavailable" }
                    }
                },
                StakeAction::ConnectWallet => rsx! {
                    button { class: "btn btn-primary w-full", onclick: stake, "Connect Wallet to Stake" }
                },
                StakeAction::Stake => rsx! {
                    button {
                        class: "btn btn-primary w-full",
                        disabled: busy || minimum_amount.is_none(),
                        onclick: stake,
                        if busy { "Processing..." } else { "Stake {minimum_text}" }
                    }
                },
            }}

            div { class: "pt-4 border-t elevated-border text-xs text-low space-y-1",
                p { "• Each stake extends the deadline by 5 minutes" }
                p { "• Last staker wins {WINNER_SHARE_PCT}% of the prize pool" }
                p { "• Random participants win {PARTICIPANT_SHARE_PCT}%" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_action() {
        assert_eq!(stake_action(Phase::Expired, true, true), StakeAction::StartNewRound);
        assert_eq!(stake_action(Phase::Waiting, false, true), StakeAction::Waiting);
        assert_eq!(stake_action(Phase::Buffer, false, true), StakeAction::Unavailable);
        assert_eq!(stake_action(Phase::Active, true, false), StakeAction::ConnectWallet);
        assert_eq!(stake_action(Phase::Buffer, true, true), StakeAction::Stake);
    }
}
