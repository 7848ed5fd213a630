use dioxus::prelude::*;
use lingo_core::input::ChallengeInput;
use lingo_core::model::OptionId;

use super::edit_input;
use crate::vm::PracticeVm;

#[derive(Clone, Debug, PartialEq)]
struct LeftItem {
    id: OptionId,
    text: String,
    armed: bool,
    /// 1-based pair badge, shared with the partner on the right.
    badge: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
struct RightItem {
    index: usize,
    text: String,
    badge: Option<usize>,
}

fn columns(vm: &PracticeVm) -> Option<(Vec<LeftItem>, Vec<RightItem>, bool)> {
    let ChallengeInput::MatchPairs(pairs) = vm.input() else {
        return None;
    };
    let badge_of = |left: OptionId| {
        pairs
            .left()
            .iter()
            .position(|(id, _)| *id == left)
            .map(|position| position + 1)
    };
    let left = pairs
        .left()
        .iter()
        .map(|(id, text)| LeftItem {
            id: *id,
            text: text.clone(),
            armed: pairs.active_left() == Some(*id),
            badge: pairs.partner_of(*id).and_then(|_| badge_of(*id)),
        })
        .collect();
    let right = pairs
        .right()
        .iter()
        .enumerate()
        .map(|(index, text)| RightItem {
            index,
            text: text.clone(),
            badge: pairs.owner_of(index).and_then(badge_of),
        })
        .collect();
    Some((left, right, vm.is_locked()))
}

fn left_class(item: &LeftItem) -> &'static str {
    match (item.armed, item.badge.is_some()) {
        (true, _) => "pair pair--armed",
        (false, true) => "pair pair--matched",
        (false, false) => "pair",
    }
}

/// MATCH_PAIRS: arm a left item, then pick its partner on the right.
#[component]
pub fn MatchPairsChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    let Some((left, right, locked)) = vm.read().as_ref().and_then(columns) else {
        return rsx! {};
    };

    rsx! {
        div { class: "pairs",
            ul { class: "pairs__column",
                for item in left {
                    li { key: "{item.id.value()}",
                        button {
                            class: left_class(&item),
                            r#type: "button",
                            aria_pressed: "{item.armed}",
                            disabled: locked,
                            onclick: move |_| {
                                edit_input(vm, |input| {
                                    if let ChallengeInput::MatchPairs(pairs) = input {
                                        pairs.select_left(item.id);
                                    }
                                });
                            },
                            if let Some(badge) = item.badge {
                                span { class: "pair__badge", "{badge}" }
                            }
                            "{item.text}"
                        }
                    }
                }
            }
            ul { class: "pairs__column",
                for item in right {
                    li { key: "{item.index}",
                        button {
                            class: if item.badge.is_some() { "pair pair--matched" } else { "pair" },
                            r#type: "button",
                            disabled: locked,
                            onclick: move |_| {
                                edit_input(vm, |input| {
                                    if let ChallengeInput::MatchPairs(pairs) = input {
                                        pairs.select_right(item.index);
                                    }
                                });
                            },
                            if let Some(badge) = item.badge {
                                span { class: "pair__badge", "{badge}" }
                            }
                            "{item.text}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_items_win_over_matched_styling() {
        let item = LeftItem {
            id: OptionId::new(1),
            text: "dog".into(),
            armed: true,
            badge: Some(1),
        };
        assert_eq!(left_class(&item), "pair pair--armed");
        let item = LeftItem {
            armed: false,
            ..item
        };
        assert_eq!(left_class(&item), "pair pair--matched");
    }
}
