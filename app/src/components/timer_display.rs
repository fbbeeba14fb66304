use dioxus::prelude::*;
use lsw_api::prelude::*;

use crate::RoundView;

fn phase_class(phase: Phase) -> &'static str {
    match phase {
        Phase::Waiting => "text-mid",
        Phase::Active => "text-gold pulse-glow",
        Phase::Buffer => "text-orange-400 countdown-pulse",
        Phase::Expired => "text-red-400",
    }
}

#[component]
pub fn TimerDisplay() -> Element {
    let round = use_context::<Signal<RoundView>>();
    let countdown = round.read().countdown;

    let (display, phase) = match countdown {
        Some(state) => (state.display(), state.phase),
        None => (format_mmss(0), Phase::Waiting),
    };
    let class = phase_class(phase);
    let label = phase.label();

    rsx! {
        div { class: "elevated-card flex flex-col items-center gap-4 p-8 rounded-lg border elevated-border",
            div { class: "text-6xl font-bold font-mono {class}", "{display}" }
            div { class: "space-y-1 text-center",
                p { class: "text-sm font-medium text-mid", "{label}" }
                if phase == Phase::Buffer {
                    p { class: "text-xs text-orange-400", "Each stake adds 5 minutes to the deadline" }
                }
            }
        }
    }
}
