use dioxus::prelude::*;
use lingo_core::input::{ChallengeInput, MAX_OPTIONS};
use lingo_core::model::{ChallengeKind, OptionId};

use super::{ChallengeAudio, edit_input, option_class};
use crate::context::AppContext;
use crate::vm::PracticeVm;

#[derive(Clone, Debug, PartialEq)]
struct OptionView {
    id: OptionId,
    number: usize,
    text: String,
    image: Option<String>,
    audio: Option<String>,
    selected: bool,
}

/// SELECT, ASSIST, LISTENING choices and unresolved TRUE_FALSE sets.
#[component]
pub fn ChoiceChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    let ctx = use_context::<AppContext>();
    let audio = use_context::<ChallengeAudio>();

    let (options, locked, status, cards) = {
        let guard = vm.read();
        let Some(state) = guard.as_ref() else {
            return rsx! {};
        };
        let Some(challenge) = state.challenge() else {
            return rsx! {};
        };
        let selected = match state.input() {
            ChallengeInput::Choice(choice) | ChallengeInput::Listening { choice, .. } => {
                choice.selected()
            }
            _ => None,
        };
        let options = challenge
            .options
            .iter()
            .take(MAX_OPTIONS)
            .enumerate()
            .map(|(index, option)| OptionView {
                id: option.id,
                number: index + 1,
                text: option.text.clone(),
                image: option.image_src.as_ref().and_then(|src| ctx.media_url(src)),
                audio: option.audio_src.as_ref().and_then(|src| ctx.media_url(src)),
                selected: selected == Some(option.id),
            })
            .collect::<Vec<_>>();
        (
            options,
            state.is_locked(),
            state.status(),
            challenge.kind == ChallengeKind::Select,
        )
    };

    rsx! {
        div {
            class: if cards { "choice-grid choice-grid--cards" } else { "choice-grid" },
            role: "radiogroup",
            for option in options {
                button {
                    key: "{option.id.value()}",
                    class: option_class(option.selected, status),
                    r#type: "button",
                    role: "radio",
                    aria_checked: "{option.selected}",
                    disabled: locked,
                    onclick: {
                        let audio = audio.clone();
                        let clip = option.audio.clone();
                        let id = option.id;
                        move |_| {
                            edit_input(vm, |input| {
                                if let ChallengeInput::Choice(choice)
                                | ChallengeInput::Listening { choice, .. } = input
                                {
                                    choice.select(id);
                                }
                            });
                            if let Some(clip) = clip.as_deref() {
                                audio.play(clip, 1.0);
                            }
                        }
                    },
                    if let Some(image) = option.image.as_deref() {
                        img { class: "option__image", src: "{image}", alt: "{option.text}" }
                    }
                    span { class: "option__number", "{option.number}" }
                    span { class: "option__text", "{option.text}" }
                }
            }
        }
    }
}
