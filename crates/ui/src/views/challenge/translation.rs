use dioxus::prelude::*;
use lingo_core::input::ChallengeInput;
use lingo_core::text::MAX_FIELD_CHARS;

use super::listening::use_reference_audio;
use super::{ChallengeAudio, edit_input};
use crate::vm::PracticeVm;

/// TRANSLATION, with a "listen and write" button when the challenge has audio.
#[component]
pub fn TranslationChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    let audio = use_context::<ChallengeAudio>();
    let clip = use_reference_audio(vm);
    let (text, locked) = {
        let guard = vm.read();
        match guard.as_ref() {
            Some(state) => match state.input() {
                ChallengeInput::Translation(text) => (text.text().to_string(), state.is_locked()),
                _ => return rsx! {},
            },
            None => return rsx! {},
        }
    };
    let chars = text.chars().count();

    rsx! {
        if let Some(clip) = clip {
            button {
                class: "replay__play",
                id: "challenge-play",
                r#type: "button",
                onclick: move |_| {
                    audio.play(&clip, 1.0);
                },
                "▶ Listen"
            }
        }
        textarea {
            class: "translation__field",
            id: "challenge-text",
            rows: "3",
            placeholder: "Type your translation",
            aria_label: "Your translation",
            maxlength: "{MAX_FIELD_CHARS}",
            spellcheck: "false",
            disabled: locked,
            value: "{text}",
            oninput: move |evt: FormEvent| {
                let value = evt.value();
                edit_input(vm, |input| {
                    if let ChallengeInput::Translation(text) = input {
                        text.set(&value);
                    }
                });
            },
        }
        span { class: "translation__count", "{chars}/{MAX_FIELD_CHARS}" }
    }
}
