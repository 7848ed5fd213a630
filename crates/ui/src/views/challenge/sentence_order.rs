use dioxus::prelude::*;
use lingo_core::input::ChallengeInput;
use lingo_core::model::OptionId;

use super::edit_input;
use crate::vm::PracticeVm;

#[derive(Clone, Debug, PartialEq)]
struct Word {
    id: OptionId,
    text: String,
    used: bool,
}

fn words(vm: &PracticeVm) -> Option<(Vec<Word>, Vec<Word>, bool)> {
    let ChallengeInput::SentenceOrder(order) = vm.input() else {
        return None;
    };
    let placed = order
        .placed()
        .map(|(id, text)| Word {
            id: *id,
            text: text.clone(),
            used: true,
        })
        .collect();
    let pool = order
        .pool_with_state()
        .map(|((id, text), used)| Word {
            id: *id,
            text: text.clone(),
            used,
        })
        .collect();
    Some((placed, pool, vm.is_locked()))
}

/// SENTENCE_ORDER: click pool words to append, click placed words to return them.
#[component]
pub fn SentenceOrderChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    let Some((placed, pool, locked)) = vm.read().as_ref().and_then(words) else {
        return rsx! {};
    };

    rsx! {
        div { class: "order__line", aria_label: "Your sentence",
            if placed.is_empty() {
                span { class: "order__placeholder", "Tap the words below" }
            }
            for (position, word) in placed.into_iter().enumerate() {
                button {
                    key: "{word.id.value()}",
                    class: "word word--placed",
                    r#type: "button",
                    disabled: locked,
                    onclick: move |_| {
                        edit_input(vm, |input| {
                            if let ChallengeInput::SentenceOrder(order) = input {
                                order.remove_at(position);
                            }
                        });
                    },
                    "{word.text}"
                }
            }
        }
        div { class: "order__pool",
            for word in pool {
                button {
                    key: "{word.id.value()}",
                    class: if word.used { "word word--used" } else { "word" },
                    r#type: "button",
                    disabled: locked || word.used,
                    onclick: move |_| {
                        edit_input(vm, |input| {
                            if let ChallengeInput::SentenceOrder(order) = input {
                                order.pick(word.id);
                            }
                        });
                    },
                    "{word.text}"
                }
            }
        }
    }
}
