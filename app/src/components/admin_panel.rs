use dioxus::prelude::*;
use lsw_api::prelude::*;

use crate::hooks::{submit_with_toast, use_config, use_toasts};
use crate::WalletState;

type Build = Box<dyn FnOnce(&ChainConfig, Option<Address>) -> Result<TransactionRequest, WalletError>>;

/// Owner controls. Parameter inputs are validated here and never reach the
/// wallet when malformed.
#[component]
pub fn AdminPanel() -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let toasts = use_toasts();
    let config = use_config();
    let mut pending = use_signal(|| false);

    let mut stake_amount = use_signal(String::new);
    let mut stake_buffer = use_signal(String::new);
    let mut buffer_delay = use_signal(String::new);
    let mut wait_period = use_signal(String::new);
    let mut input_error = use_signal(|| None::<ValidationError>);

    // Builds the transaction on click and hands it to the wallet.
    let run = use_callback(move |build: Build| {
        let config = config.clone();
        spawn(async move {
            pending.set(true);
            let wallet = wallet();
            let tx = build(&config, wallet.address);
            submit_with_toast(&config, wallet, toasts, tx, "Transaction submitted").await;
            pending.set(false);
        });
    });

    let busy = pending() || !wallet().is_connected();
    let error_text = input_error.read().as_ref().map(|e| e.to_string());

    rsx! {
        div { class: "elevated-card border elevated-border rounded-lg p-6 space-y-4 mt-8",
            h3 { class: "text-lg font-semibold", "Admin Controls (Owner Only)" }

            div { class: "space-y-2",
                button {
                    class: "btn btn-primary w-full",
                    disabled: busy,
                    onclick: move |_| run.call(Box::new(sdk::start_new_round)),
                    "Start New Round"
                }
                button {
                    class: "btn btn-secondary w-full",
                    disabled: busy,
                    onclick: move |_| run.call(Box::new(sdk::emergency_withdraw)),
                    "Emergency Withdraw"
                }
            }

            div { class: "space-y-2",
                div {
                    label { class: "block text-sm", "Stake Amount" }
                    input {
                        class: "input w-full",
                        r#type: "number",
                        min: "0",
                        value: "{stake_amount}",
                        oninput: move |e| stake_amount.set(e.value()),
                    }
                    button {
                        class: "btn btn-secondary w-full mt-2",
                        disabled: busy,
                        onclick: move |_| match parse_whole(&stake_amount.read(), "Stake amount") {
                            Ok(amount) => {
                                input_error.set(None);
                                run.call(Box::new(move |c: &ChainConfig, from: Option<Address>| sdk::update_stake_amount(c, from, amount)));
                            }
                            Err(e) => input_error.set(Some(e)),
                        },
                        "Update Stake Amount"
                    }
                }
                div {
                    label { class: "block text-sm", "Stake Buffer" }
                    input {
                        class: "input w-full",
                        r#type: "number",
                        min: "0",
                        value: "{stake_buffer}",
                        oninput: move |e| stake_buffer.set(e.value()),
                    }
                    label { class: "block text-sm mt-1", "Buffer Delay" }
                    input {
                        class: "input w-full",
                        r#type: "number",
                        min: "0",
                        value: "{buffer_delay}",
                        oninput: move |e| buffer_delay.set(e.value()),
                    }
                    button {
                        class: "btn btn-secondary w-full mt-2",
                        disabled: busy,
                        onclick: move |_| {
                            let parsed = parse_whole(&stake_buffer.read(), "Stake buffer").and_then(|buffer| {
                                parse_whole(&buffer_delay.read(), "Buffer delay").map(|delay| (buffer, delay))
                            });
                            match parsed {
                                Ok((buffer, delay)) => {
                                    input_error.set(None);
                                    run.call(Box::new(move |c: &ChainConfig, from: Option<Address>| sdk::update_buffer_settings(c, from, buffer, delay)));
                                }
                                Err(e) => input_error.set(Some(e)),
                            }
                        },
                        "Update Buffer Settings"
                    }
                }
                div {
                    label { class: "block text-sm", "Staking Wait Period" }
                    input {
                        class: "input w-full",
                        r#type: "number",
                        min: "0",
                        value: "{wait_period}",
                        oninput: move |e| wait_period.set(e.value()),
                    }
                    button {
                        class: "btn btn-secondary w-full mt-2",
                        disabled: busy,
                        onclick: move |_| match parse_whole(&wait_period.read(), "Staking wait period") {
                            Ok(seconds) => {
                                input_error.set(None);
                                run.call(Box::new(move |c: &ChainConfig, from: Option<Address>| sdk::update_staking_wait_period(c, from, seconds)));
                            }
                            Err(e) => input_error.set(Some(e)),
                        },
                        "Update Staking Wait Period"
                    }
                }
            }

            if let Some(error) = error_text {
                div { class: "text-red-400 mt-2", "{error}" }
            }
        }
    }
}
