use dioxus::prelude::*;
use lingo_core::input::ChallengeInput;

use super::{edit_input, option_class};
use crate::vm::PracticeVm;

#[derive(Clone, Debug, PartialEq)]
struct Choice {
    value: bool,
    label: String,
    selected: bool,
}

fn choices(vm: &PracticeVm) -> Option<(Vec<Choice>, bool)> {
    let ChallengeInput::TrueFalse(input) = vm.input() else {
        return None;
    };
    let challenge = vm.challenge()?;
    let ids = input.ids();
    let label = |id, fallback: &str| {
        challenge
            .option(id)
            .map_or_else(|| fallback.to_string(), |option| option.text.clone())
    };
    let choices = vec![
        Choice {
            value: true,
            label: label(ids.true_id, "True"),
            selected: input.selected() == Some(true),
        },
        Choice {
            value: false,
            label: label(ids.false_id, "False"),
            selected: input.selected() == Some(false),
        },
    ];
    Some((choices, vm.is_locked()))
}

/// TRUE_FALSE: two buttons mapped onto the resolved option ids.
#[component]
pub fn TrueFalseChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    let Some((choices, locked)) = vm.read().as_ref().and_then(choices) else {
        return rsx! {};
    };
    let status = vm.read().as_ref().map(PracticeVm::status).unwrap_or_default();

    rsx! {
        div { class: "true-false", role: "radiogroup",
            for choice in choices {
                button {
                    key: "{choice.value}",
                    class: option_class(choice.selected, status),
                    r#type: "button",
                    role: "radio",
                    aria_checked: "{choice.selected}",
                    disabled: locked,
                    onclick: move |_| {
                        edit_input(vm, |input| {
                            if let ChallengeInput::TrueFalse(tf) = input {
                                tf.choose(choice.value);
                            }
                        });
                    },
                    span { class: if choice.value { "true-false__icon true-false__icon--true" } else { "true-false__icon true-false__icon--false" } }
                    span { class: "option__text", "{choice.label}" }
                }
            }
        }
    }
}
