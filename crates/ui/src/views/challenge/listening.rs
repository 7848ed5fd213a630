use dioxus::prelude::*;
use lingo_core::input::{ChallengeInput, PLAYBACK_SPEEDS, ReplayCounter};

use super::ChallengeAudio;
use super::choice::ChoiceChallenge;
use crate::context::AppContext;
use crate::vm::PracticeVm;

/// Reference audio of the mounted challenge, resolved to a playable URL.
pub(super) fn use_reference_audio(vm: Signal<Option<PracticeVm>>) -> Option<String> {
    let ctx = use_context::<AppContext>();
    vm.read()
        .as_ref()
        .and_then(PracticeVm::challenge)
        .and_then(|challenge| challenge.audio_src.as_ref())
        .and_then(|src| ctx.media_url(src))
}

fn replays(vm: &PracticeVm) -> Option<ReplayCounter> {
    match vm.input() {
        ChallengeInput::Listening { replays, .. } => Some(*replays),
        ChallengeInput::Blanks { replays, .. } => *replays,
        _ => None,
    }
}

/// LISTENING multiple choice: capped replays over an option grid.
#[component]
pub fn ListeningChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    rsx! {
        ReplayControls { vm }
        ChoiceChallenge { vm }
    }
}

#[component]
pub(super) fn ReplayControls(vm: Signal<Option<PracticeVm>>) -> Element {
    let audio = use_context::<ChallengeAudio>();
    let src = use_reference_audio(vm);
    let counter = vm.read().as_ref().and_then(replays);
    let can_play = src.is_some() && counter.is_none_or(|counter| counter.can_play());
    let remaining = counter.and_then(|counter| counter.remaining());
    let speed_index = counter.map(|counter| counter.speed_index());
    let play_label = if src.is_some() { "▶ Play" } else { "No audio" };

    rsx! {
        div { class: "replay",
            button {
                class: "replay__play",
                id: "challenge-play",
                r#type: "button",
                disabled: !can_play,
                onclick: move |_| {
                    let Some(src) = src.as_deref() else {
                        return;
                    };
                    let rate = vm.write().as_mut().and_then(PracticeVm::register_replay);
                    if let Some(rate) = rate {
                        audio.play(src, rate);
                    }
                },
                "{play_label}"
            }
            if let Some(left) = remaining {
                span { class: "replay__remaining",
                    if left == 0 { "No replays left" } else { "{left} plays left" }
                }
            }
            if let Some(active) = speed_index {
                div { class: "replay__speeds", role: "group", aria_label: "Playback speed",
                    for (index, speed) in PLAYBACK_SPEEDS.iter().enumerate() {
                        button {
                            key: "{index}",
                            class: if index == active { "replay__speed replay__speed--active" } else { "replay__speed" },
                            r#type: "button",
                            onclick: move |_| {
                                if let Some(state) = vm.write().as_mut() {
                                    state.set_replay_speed(index);
                                }
                            },
                            "{speed}×"
                        }
                    }
                }
            }
        }
    }
}
