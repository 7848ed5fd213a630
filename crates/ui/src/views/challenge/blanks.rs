use dioxus::prelude::*;
use lingo_core::input::{ChallengeInput, Segment};
use lingo_core::text::MAX_FIELD_CHARS;

use super::edit_input;
use super::listening::ReplayControls;
use crate::vm::PracticeVm;

#[derive(Clone, Debug, PartialEq)]
struct BlanksView {
    segments: Vec<Segment>,
    values: Vec<String>,
    inline: bool,
    dictation: bool,
    locked: bool,
}

fn blanks_view(vm: &PracticeVm) -> Option<BlanksView> {
    let ChallengeInput::Blanks { blanks, replays } = vm.input() else {
        return None;
    };
    Some(BlanksView {
        segments: blanks.segments().to_vec(),
        values: (0..blanks.len())
            .map(|index| blanks.value(index).to_string())
            .collect(),
        inline: blanks.has_inline_blanks(),
        dictation: replays.is_some(),
        locked: vm.is_locked(),
    })
}

fn set_blank(vm: Signal<Option<PracticeVm>>, index: usize, value: &str) {
    edit_input(vm, |input| {
        if let ChallengeInput::Blanks { blanks, .. } = input {
            blanks.set(index, value);
        }
    });
}

/// FILL_BLANK and LISTENING dictation: one field per run of underscores.
#[component]
pub fn BlanksChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    let Some(view) = vm.read().as_ref().and_then(blanks_view) else {
        return rsx! {};
    };
    let max_len = MAX_FIELD_CHARS.to_string();
    let single_value = view.values.first().cloned().unwrap_or_default();

    rsx! {
        if view.dictation {
            ReplayControls { vm }
        }
        if view.inline {
            p { class: "blanks",
                for (position, segment) in view.segments.iter().enumerate() {
                    match segment {
                        Segment::Text(text) => rsx! {
                            span { key: "{position}", class: "blanks__text", "{text}" }
                        },
                        Segment::Blank(index) => {
                            let index = *index;
                            let value = view.values.get(index).cloned().unwrap_or_default();
                            let label = format!("Blank {}", index + 1);
                            rsx! {
                                input {
                                    key: "{position}",
                                    class: "blanks__field",
                                    r#type: "text",
                                    aria_label: "{label}",
                                    autocomplete: "off",
                                    spellcheck: "false",
                                    maxlength: "{max_len}",
                                    disabled: view.locked,
                                    value: "{value}",
                                    oninput: move |evt: FormEvent| set_blank(vm, index, &evt.value()),
                                }
                            }
                        }
                    }
                }
            }
        } else {
            p { class: "blanks__prompt",
                for (position, segment) in view.segments.iter().enumerate() {
                    if let Segment::Text(text) = segment {
                        span { key: "{position}", "{text}" }
                    }
                }
            }
            input {
                class: "blanks__field blanks__field--wide",
                r#type: "text",
                aria_label: "Your answer",
                autocomplete: "off",
                spellcheck: "false",
                maxlength: "{max_len}",
                disabled: view.locked,
                value: "{single_value}",
                oninput: move |evt: FormEvent| set_blank(vm, 0, &evt.value()),
            }
        }
    }
}
