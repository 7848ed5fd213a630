//! Per-kind local input state for the challenge renderer.
//!
//! Each variant owns the learner's in-progress input and maps it to an
//! [`AnswerPayload`] once complete. Nothing here touches the network.

mod blanks;
mod listening;
mod match_pairs;
mod sentence_order;
mod speaking;
mod true_false;

use rand::Rng;

use crate::model::{AnswerPayload, Challenge, ChallengeKind, ListeningMode, OptionId};
use crate::text::{MAX_FIELD_CHARS, clamp_chars};

pub use blanks::{BlanksInput, MAX_BLANKS, Segment, count_blanks, parse_segments};
pub use listening::{MAX_REPLAYS, PLAYBACK_SPEEDS, ReplayCounter};
pub use match_pairs::MatchPairsInput;
pub use sentence_order::SentenceOrderInput;
pub use speaking::SpeakingInput;
pub use true_false::{TrueFalseIds, TrueFalseInput, resolve_true_false};

/// Options beyond this count are ignored.
pub const MAX_OPTIONS: usize = 50;

//
// ─── SINGLE CHOICE ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceInput {
    allowed: Vec<OptionId>,
    selected: Option<OptionId>,
}

impl ChoiceInput {
    #[must_use]
    pub fn new(allowed: Vec<OptionId>) -> Self {
        Self {
            allowed,
            selected: None,
        }
    }

    /// Selects `id` if it belongs to the challenge. Returns whether it did.
    pub fn select(&mut self, id: OptionId) -> bool {
        if self.allowed.contains(&id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<OptionId> {
        self.selected
    }

    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        self.selected.map(AnswerPayload::Choice)
    }
}

//
// ─── FREE TEXT ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
}

impl TextInput {
    /// Replaces the text, clamping it to `MAX_FIELD_CHARS`.
    pub fn set(&mut self, value: &str) {
        self.text = clamp_chars(value, MAX_FIELD_CHARS);
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then(|| AnswerPayload::Text(trimmed.to_string()))
    }
}

//
// ─── TAGGED UNION ──────────────────────────────────────────────────────────────
//

/// Local input state of the active challenge, one variant per renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeInput {
    /// SELECT and ASSIST.
    Choice(ChoiceInput),
    /// FILL_BLANK and LISTENING dictation. `replays` is set for dictation.
    Blanks {
        blanks: BlanksInput,
        replays: Option<ReplayCounter>,
    },
    /// TRANSLATION, optionally with reference audio ("listen and write").
    Translation(TextInput),
    /// LISTENING multiple choice with a capped replay counter.
    Listening {
        choice: ChoiceInput,
        replays: ReplayCounter,
    },
    Speaking(SpeakingInput),
    MatchPairs(MatchPairsInput),
    SentenceOrder(SentenceOrderInput),
    TrueFalse(TrueFalseInput),
    /// An option-based challenge arrived without options.
    Unconfigured,
}

impl ChallengeInput {
    /// Builds the input state for a freshly mounted challenge.
    ///
    /// Shuffled pools (sentence order, match pairs) are drawn from `rng` once;
    /// they stay stable for the lifetime of the returned value.
    pub fn for_challenge<R: Rng + ?Sized>(challenge: &Challenge, rng: &mut R) -> Self {
        let mut options = challenge.options.clone();
        options.truncate(MAX_OPTIONS);

        if challenge.requires_options() && options.is_empty() {
            return Self::Unconfigured;
        }

        let option_ids = || options.iter().map(|option| option.id).collect::<Vec<_>>();

        match challenge.kind {
            ChallengeKind::Select | ChallengeKind::Assist => {
                Self::Choice(ChoiceInput::new(option_ids()))
            }
            ChallengeKind::FillBlank => Self::Blanks {
                blanks: BlanksInput::new(&challenge.question),
                replays: None,
            },
            ChallengeKind::Translation => Self::Translation(TextInput::default()),
            ChallengeKind::Listening => match challenge.listening_mode() {
                Some(ListeningMode::Dictation) => Self::Blanks {
                    blanks: BlanksInput::new(&challenge.question),
                    replays: Some(ReplayCounter::unlimited()),
                },
                _ => Self::Listening {
                    choice: ChoiceInput::new(option_ids()),
                    replays: ReplayCounter::capped(),
                },
            },
            ChallengeKind::Speaking => Self::Speaking(SpeakingInput::for_challenge(challenge)),
            ChallengeKind::MatchPairs => MatchPairsInput::new(&options, rng)
                .map_or(Self::Unconfigured, Self::MatchPairs),
            ChallengeKind::SentenceOrder => {
                Self::SentenceOrder(SentenceOrderInput::new(&options, rng))
            }
            ChallengeKind::TrueFalse => match resolve_true_false(&options) {
                Some(ids) => Self::TrueFalse(TrueFalseInput::new(ids)),
                None => Self::Choice(ChoiceInput::new(option_ids())),
            },
        }
    }

    /// The normalized answer, or `None` while the input is incomplete.
    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        match self {
            Self::Choice(choice) | Self::Listening { choice, .. } => choice.to_answer_payload(),
            Self::Blanks { blanks, .. } => blanks.to_answer_payload(),
            Self::Translation(text) => text.to_answer_payload(),
            Self::Speaking(speaking) => speaking.to_answer_payload(),
            Self::MatchPairs(pairs) => pairs.to_answer_payload(),
            Self::SentenceOrder(order) => order.to_answer_payload(),
            Self::TrueFalse(tf) => tf.to_answer_payload(),
            Self::Unconfigured => None,
        }
    }

    /// Whether the submit control may be enabled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.to_answer_payload().is_some()
    }

    #[must_use]
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, Self::Unconfigured)
    }

    /// Replay counter of inputs backed by reference audio.
    pub fn replays_mut(&mut self) -> Option<&mut ReplayCounter> {
        match self {
            Self::Listening { replays, .. }
            | Self::Blanks {
                replays: Some(replays),
                ..
            } => Some(replays),
            _ => None,
        }
    }
}
