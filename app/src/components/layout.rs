use dioxus::prelude::*;
use crate::route::Route;
use crate::components::{Toasts, WalletButton};
use crate::hooks::use_config;

#[component]
pub fn Layout() -> Element {
    let config = use_config();
    let contract = config.contract.to_string();
    let contract_url = config.address_url(&config.contract);
    let network = config.chain_name.clone();

    rsx! {
        div { class: "min-h-screen",
            style: "background-color: var(--surface-base);",
            // Navigation
            nav { class: "border-b elevated-border backdrop-blur sticky top-0 z-50",
                style: "background-color: var(--surface-base);",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8",
                    div { class: "flex justify-between h-16",
                        // Logo - links to game
                        div { class: "flex items-center",
                            Link { to: Route::Play {}, class: "flex items-center space-x-2",
                                span { class: "w-10 h-10 rounded-lg flex items-center justify-center font-bold text-gold", "LSW" }
                                div {
                                    span { class: "text-lg font-bold", "Last Staker Wins" }
                                    p { class: "text-xs text-low", "{network}" }
                                }
                            }
                        }

                        // Wallet button
                        div { class: "flex items-center",
                            WalletButton {}
                        }
                    }
                }
            }

            // Main content
            main { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8",
                Outlet::<Route> {}
            }

            // Footer
            footer { class: "border-t elevated-border py-8 mt-auto",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 text-center text-low",
                    p { "Last Staker Wins - the final stake before the deadline takes the pool" }
                    p { class: "text-sm mt-2",
                        "Contract: "
                        a { href: "{contract_url}", target: "_blank",
                            code { class: "text-gold", "{contract}" }
                        }
                    }
                }
            }

            Toasts {}
        }
    }
}

#[component]
pub fn NavLink(to: Route, label: &'static str) -> Element {
    rsx! {
        Link {
            to: to,
            class: "text-mid hover:text-gold px-3 py-2 text-sm font-medium transition-colors",
            "{label}"
        }
    }
}
