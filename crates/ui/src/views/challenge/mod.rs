//! Challenge renderer: one component per input variant.
//!
//! Every component reads the mounted [`PracticeVm`] and edits its input
//! through [`edit_input`], which mirrors the resulting answer into the
//! session controller.

mod blanks;
mod choice;
mod listening;
mod match_pairs;
mod sentence_order;
mod speaking;
mod translation;
mod true_false;

use std::rc::Rc;

use dioxus::prelude::*;
use lingo_core::input::ChallengeInput;
use lingo_core::model::{Challenge, ChallengeKind, ListeningMode};
use services::{AudioLease, ChallengeStatus};

use crate::context::AppContext;
use crate::vm::{PracticeVm, inline_markdown_to_html};

use blanks::BlanksChallenge;
use choice::ChoiceChallenge;
use listening::ListeningChallenge;
use match_pairs::MatchPairsChallenge;
use sentence_order::SentenceOrderChallenge;
use speaking::SpeakingChallenge;
use translation::TranslationChallenge;
use true_false::TrueFalseChallenge;

/// Playback right of the mounted challenge. Released when it unmounts.
#[derive(Clone)]
pub(crate) struct ChallengeAudio(Rc<AudioLease>);

impl ChallengeAudio {
    pub(crate) fn play(&self, src: &str, rate: f32) -> bool {
        self.0.play(src, rate)
    }
}

pub(crate) fn edit_input(
    mut vm: Signal<Option<PracticeVm>>,
    edit: impl FnOnce(&mut ChallengeInput),
) {
    if let Some(state) = vm.write().as_mut() {
        state.update_input(edit);
    }
}

/// CSS modifier for an option given whether it is picked and the grading.
pub(crate) fn option_class(selected: bool, status: ChallengeStatus) -> &'static str {
    match (selected, status) {
        (true, ChallengeStatus::Correct) => "option option--selected option--correct",
        (true, ChallengeStatus::Wrong) => "option option--selected option--wrong",
        (true, ChallengeStatus::None) => "option option--selected",
        (false, _) => "option",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Body {
    Choice,
    Blanks,
    Translation,
    Listening,
    Speaking,
    MatchPairs,
    SentenceOrder,
    TrueFalse,
    Unconfigured,
}

impl Body {
    fn of(input: &ChallengeInput) -> Self {
        match input {
            ChallengeInput::Choice(_) => Self::Choice,
            ChallengeInput::Blanks { .. } => Self::Blanks,
            ChallengeInput::Translation(_) => Self::Translation,
            ChallengeInput::Listening { .. } => Self::Listening,
            ChallengeInput::Speaking(_) => Self::Speaking,
            ChallengeInput::MatchPairs(_) => Self::MatchPairs,
            ChallengeInput::SentenceOrder(_) => Self::SentenceOrder,
            ChallengeInput::TrueFalse(_) => Self::TrueFalse,
            ChallengeInput::Unconfigured => Self::Unconfigured,
        }
    }
}

fn instruction(challenge: &Challenge) -> Option<&'static str> {
    match challenge.kind {
        ChallengeKind::Select => None,
        ChallengeKind::Assist => Some("Select the correct meaning"),
        ChallengeKind::FillBlank => Some("Fill in the blank"),
        ChallengeKind::Translation => Some("Translate this sentence"),
        ChallengeKind::Listening => Some(match challenge.listening_mode() {
            Some(ListeningMode::Dictation) => "Type what you hear",
            _ => "Listen and choose",
        }),
        ChallengeKind::Speaking => Some("Speak this sentence"),
        ChallengeKind::MatchPairs => Some("Tap the matching pairs"),
        ChallengeKind::SentenceOrder => Some("Put the words in order"),
        ChallengeKind::TrueFalse => Some("True or false?"),
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Prompt {
    kind_class: &'static str,
    instruction: Option<&'static str>,
    question_html: Option<String>,
    hint_html: Option<String>,
    body: Body,
}

impl Prompt {
    fn from_vm(vm: &PracticeVm) -> Option<Self> {
        let challenge = vm.challenge()?;
        let body = Body::of(vm.input());
        // blanks render the question themselves, one field per run of underscores
        let question_html = (body != Body::Blanks && !challenge.question.trim().is_empty())
            .then(|| inline_markdown_to_html(&challenge.question));
        Some(Self {
            kind_class: challenge.kind.as_str(),
            instruction: instruction(challenge),
            question_html,
            hint_html: challenge.hint.as_deref().map(inline_markdown_to_html),
            body,
        })
    }
}

/// Renders the active challenge. Mount it keyed by [`PracticeVm::mount_key`]
/// so each challenge gets fresh component state and its own audio lease.
#[component]
pub fn ChallengeBody(vm: Signal<Option<PracticeVm>>) -> Element {
    let ctx = use_context::<AppContext>();
    let lease = use_hook(|| Rc::new(ctx.audio().acquire()));
    use_context_provider(|| ChallengeAudio(lease));

    let Some(prompt) = vm.read().as_ref().and_then(Prompt::from_vm) else {
        return rsx! {};
    };

    rsx! {
        section { class: "challenge", "data-kind": "{prompt.kind_class}",
            if let Some(instruction) = prompt.instruction {
                h2 { class: "challenge__instruction", "{instruction}" }
            }
            if let Some(question) = prompt.question_html.as_deref() {
                div { class: "challenge__question", dangerous_inner_html: "{question}" }
            }
            if let Some(hint) = prompt.hint_html.as_deref() {
                p { class: "challenge__hint", dangerous_inner_html: "{hint}" }
            }
            div { class: "challenge__body",
                match prompt.body {
                    Body::Choice => rsx! { ChoiceChallenge { vm } },
                    Body::Blanks => rsx! { BlanksChallenge { vm } },
                    Body::Translation => rsx! { TranslationChallenge { vm } },
                    Body::Listening => rsx! { ListeningChallenge { vm } },
                    Body::Speaking => rsx! { SpeakingChallenge { vm } },
                    Body::MatchPairs => rsx! { MatchPairsChallenge { vm } },
                    Body::SentenceOrder => rsx! { SentenceOrderChallenge { vm } },
                    Body::TrueFalse => rsx! { TrueFalseChallenge { vm } },
                    Body::Unconfigured => rsx! {
                        p { class: "challenge__empty", "No options configured for this challenge." }
                    },
                }
            }
        }
    }
}
