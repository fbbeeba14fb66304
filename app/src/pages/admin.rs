use dioxus::prelude::*;

use crate::components::{AdminPanel, NavLink};
use crate::hooks::use_is_owner;
use crate::route::Route;
use crate::WalletState;

#[component]
pub fn Admin() -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let is_owner = use_is_owner();

    if !wallet().is_connected() {
        return rsx! {
            Gate { message: "Please connect your wallet to access the admin panel." }
        };
    }

    match *is_owner.read() {
        None => rsx! {
            div { class: "flex items-center justify-center py-8",
                div { class: "text-mid", "Loading..." }
            }
        },
        Some(false) => rsx! {
            Gate { message: "Access Denied: Only the contract owner can access this page." }
        },
        Some(true) => rsx! {
            div { class: "max-w-2xl mx-auto",
                AdminPanel {}
            }
        },
    }
}

#[component]
fn Gate(message: &'static str) -> Element {
    rsx! {
        div { class: "flex items-center justify-center py-8",
            div { class: "text-center space-y-4",
                div { class: "text-red-400", "{message}" }
                NavLink { to: Route::Play {}, label: "Back to Game" }
            }
        }
    }
}
