use dioxus::prelude::*;

use crate::hooks::use_toasts;
use crate::{Toast, ToastKind};

#[component]
pub fn Toasts() -> Element {
    let toasts = use_toasts();

    rsx! {
        div { class: "fixed bottom-4 right-4 z-50 space-y-2",
            for toast in toasts.read().iter().cloned() {
                ToastItem { key: "{toast.id}", toast: toast }
            }
        }
    }
}

#[component]
fn ToastItem(toast: Toast) -> Element {
    let mut toasts = use_toasts();
    let id = toast.id;
    let class = match toast.kind {
        ToastKind::Success => "toast border border-gold text-gold rounded p-3",
        ToastKind::Error => "toast border border-red-500 text-red-400 rounded p-3",
    };

    rsx! {
        div {
            class: "{class}",
            onclick: move |_| toasts.write().retain(|t| t.id != id),
            p { class: "text-sm", "{toast.message}" }
            if let Some(link) = toast.link.clone() {
                a { class: "text-xs underline", href: "{link}", target: "_blank", "View on explorer" }
            }
        }
    }
}
