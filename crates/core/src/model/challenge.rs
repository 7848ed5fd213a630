use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::AnswerPayload;
use crate::model::ids::{ChallengeId, LessonId, OptionId};
use crate::model::media::MediaSrc;
use crate::text::answers_match;

/// Score a speaking attempt must reach to count as acceptable.
pub const DEFAULT_PRONUNCIATION_THRESHOLD: u8 = 70;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error("unknown challenge type: {0}")]
    UnknownKind(String),
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// Type tag of a challenge. Drives both rendering and the answer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeKind {
    Select,
    Assist,
    FillBlank,
    Translation,
    Listening,
    Speaking,
    MatchPairs,
    SentenceOrder,
    TrueFalse,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 9] = [
        Self::Select,
        Self::Assist,
        Self::FillBlank,
        Self::Translation,
        Self::Listening,
        Self::Speaking,
        Self::MatchPairs,
        Self::SentenceOrder,
        Self::TrueFalse,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Assist => "ASSIST",
            Self::FillBlank => "FILL_BLANK",
            Self::Translation => "TRANSLATION",
            Self::Listening => "LISTENING",
            Self::Speaking => "SPEAKING",
            Self::MatchPairs => "MATCH_PAIRS",
            Self::SentenceOrder => "SENTENCE_ORDER",
            Self::TrueFalse => "TRUE_FALSE",
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeKind {
    type Err = ChallengeError;

    /// Accepts the canonical tag in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == canonical)
            .ok_or_else(|| ChallengeError::UnknownKind(s.to_string()))
    }
}

/// The two flavors of a LISTENING challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningMode {
    /// Pick the option matching the clip.
    MultipleChoice,
    /// Write down what was heard.
    Dictation,
}

//
// ─── CHALLENGE ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeOption {
    pub id: OptionId,
    pub text: String,
    pub correct: bool,
    pub image_src: Option<MediaSrc>,
    pub audio_src: Option<MediaSrc>,
    /// Ordinal used by SENTENCE_ORDER to define the expected sequence.
    pub position: u32,
    /// Right-hand column partner for MATCH_PAIRS.
    pub match_text: Option<String>,
}

impl ChallengeOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>, correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            correct,
            image_src: None,
            audio_src: None,
            position: 0,
            match_text: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_match_text(mut self, text: impl Into<String>) -> Self {
        self.match_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_audio(mut self, src: MediaSrc) -> Self {
        self.audio_src = Some(src);
        self
    }

    #[must_use]
    pub fn with_image(mut self, src: MediaSrc) -> Self {
        self.image_src = Some(src);
        self
    }
}

/// One gradable question unit within a lesson. Created server-side, never
/// mutated by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub id: ChallengeId,
    pub lesson_id: LessonId,
    pub order: u32,
    pub kind: ChallengeKind,
    pub question: String,
    pub hint: Option<String>,
    pub audio_src: Option<MediaSrc>,
    pub options: Vec<ChallengeOption>,
}

impl Challenge {
    #[must_use]
    pub fn new(
        id: ChallengeId,
        lesson_id: LessonId,
        order: u32,
        kind: ChallengeKind,
        question: impl Into<String>,
    ) -> Self {
        Self {
            id,
            lesson_id,
            order,
            kind,
            question: question.into(),
            hint: None,
            audio_src: None,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_audio(mut self, src: MediaSrc) -> Self {
        self.audio_src = Some(src);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<ChallengeOption>) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&ChallengeOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// `Some` only for LISTENING challenges.
    ///
    /// A listening prompt without options, with blanks, or whose options are
    /// all accepted transcriptions is a dictation; anything else is multiple
    /// choice.
    #[must_use]
    pub fn listening_mode(&self) -> Option<ListeningMode> {
        if self.kind != ChallengeKind::Listening {
            return None;
        }
        let has_blanks = self.question.contains('_');
        let all_accepted = self.options.iter().all(|option| option.correct);
        if has_blanks || all_accepted {
            Some(ListeningMode::Dictation)
        } else {
            Some(ListeningMode::MultipleChoice)
        }
    }

    /// Whether the renderer needs a configured option list for this challenge.
    #[must_use]
    pub fn requires_options(&self) -> bool {
        match self.kind {
            ChallengeKind::Select
            | ChallengeKind::Assist
            | ChallengeKind::MatchPairs
            | ChallengeKind::SentenceOrder
            | ChallengeKind::TrueFalse => true,
            ChallengeKind::Listening => {
                self.listening_mode() == Some(ListeningMode::MultipleChoice)
            }
            ChallengeKind::FillBlank | ChallengeKind::Translation | ChallengeKind::Speaking => {
                false
            }
        }
    }

    /// The expected answer derived from the option list.
    ///
    /// Returns `None` when the options do not define one (grading then stays
    /// entirely server-side).
    #[must_use]
    pub fn answer_key(&self) -> Option<AnswerKey> {
        let correct_texts = || -> Vec<String> {
            let mut correct: Vec<&ChallengeOption> =
                self.options.iter().filter(|option| option.correct).collect();
            correct.sort_by_key(|option| option.position);
            correct.into_iter().map(|option| option.text.clone()).collect()
        };

        match self.kind {
            ChallengeKind::Select | ChallengeKind::Assist | ChallengeKind::TrueFalse => self
                .options
                .iter()
                .find(|option| option.correct)
                .map(|option| AnswerKey::Choice(option.id)),
            ChallengeKind::Listening => match self.listening_mode() {
                Some(ListeningMode::Dictation) => {
                    let texts = correct_texts();
                    (!texts.is_empty()).then_some(AnswerKey::Blanks(texts))
                }
                _ => self
                    .options
                    .iter()
                    .find(|option| option.correct)
                    .map(|option| AnswerKey::Choice(option.id)),
            },
            ChallengeKind::FillBlank => {
                let texts = correct_texts();
                (!texts.is_empty()).then_some(AnswerKey::Blanks(texts))
            }
            ChallengeKind::Translation => {
                let texts = correct_texts();
                (!texts.is_empty()).then_some(AnswerKey::AnyText(texts))
            }
            ChallengeKind::SentenceOrder => {
                if self.options.is_empty() {
                    return None;
                }
                let mut ordered: Vec<&ChallengeOption> = self.options.iter().collect();
                ordered.sort_by_key(|option| option.position);
                Some(AnswerKey::Ordered(
                    ordered.into_iter().map(|option| option.id).collect(),
                ))
            }
            ChallengeKind::MatchPairs => {
                let pairs: BTreeMap<OptionId, String> = self
                    .options
                    .iter()
                    .filter_map(|option| {
                        option
                            .match_text
                            .as_ref()
                            .map(|text| (option.id, text.clone()))
                    })
                    .collect();
                (!pairs.is_empty()).then_some(AnswerKey::Pairs(pairs))
            }
            ChallengeKind::Speaking => {
                Some(AnswerKey::ScoreThreshold(DEFAULT_PRONUNCIATION_THRESHOLD))
            }
        }
    }
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// The one well-defined correct-answer shape of a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    Choice(OptionId),
    /// Accepted text per blank, in blank order.
    Blanks(Vec<String>),
    /// Any one of these free-text answers is accepted.
    AnyText(Vec<String>),
    Ordered(Vec<OptionId>),
    Pairs(BTreeMap<OptionId, String>),
    ScoreThreshold(u8),
}

impl AnswerKey {
    /// Grades a payload against this key. Mismatched shapes are wrong answers.
    #[must_use]
    pub fn accepts(&self, answer: &AnswerPayload) -> bool {
        match (self, answer) {
            (Self::Choice(expected), AnswerPayload::Choice(given)) => expected == given,
            (Self::Blanks(expected), AnswerPayload::Blanks { values, display }) => {
                if expected.len() == values.len() {
                    expected
                        .iter()
                        .zip(values)
                        .all(|(expected, given)| answers_match(given, expected))
                } else {
                    // a single accepted sentence graded against the joined input
                    expected.len() == 1 && answers_match(display, &expected[0])
                }
            }
            (Self::AnyText(accepted), AnswerPayload::Text(given)) => {
                accepted.iter().any(|expected| answers_match(given, expected))
            }
            (Self::Ordered(expected), AnswerPayload::Ordered(given)) => expected == given,
            (Self::Pairs(expected), AnswerPayload::Pairs(given)) => {
                expected.len() == given.len()
                    && expected.iter().all(|(id, text)| {
                        given
                            .get(id)
                            .is_some_and(|given_text| answers_match(given_text, text))
                    })
            }
            (Self::ScoreThreshold(threshold), AnswerPayload::Speech(analysis)) => {
                analysis.acceptable && analysis.score >= *threshold
            }
            _ => false,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::answer::SpeechAnalysis;

    fn challenge(kind: ChallengeKind, question: &str) -> Challenge {
        Challenge::new(ChallengeId::new(1), LessonId::new(1), 1, kind, question)
    }

    #[test]
    fn kind_parses_loosely() {
        assert_eq!("fill_blank".parse::<ChallengeKind>(), Ok(ChallengeKind::FillBlank));
        assert_eq!("Match-Pairs".parse::<ChallengeKind>(), Ok(ChallengeKind::MatchPairs));
        assert!(matches!(
            "QUIZ".parse::<ChallengeKind>(),
            Err(ChallengeError::UnknownKind(_))
        ));
    }

    #[test]
    fn select_key_is_the_correct_option() {
        let c = challenge(ChallengeKind::Select, "Which one is \"the man\"?").with_options(vec![
            ChallengeOption::new(OptionId::new(1), "el hombre", true),
            ChallengeOption::new(OptionId::new(2), "la mujer", false),
        ]);
        let key = c.answer_key().unwrap();
        assert!(key.accepts(&AnswerPayload::Choice(OptionId::new(1))));
        assert!(!key.accepts(&AnswerPayload::Choice(OptionId::new(2))));
        assert!(!key.accepts(&AnswerPayload::Text("el hombre".into())));
    }

    #[test]
    fn listening_mode_depends_on_options_and_blanks() {
        let mc = challenge(ChallengeKind::Listening, "What did you hear?").with_options(vec![
            ChallengeOption::new(OptionId::new(1), "hola", true),
            ChallengeOption::new(OptionId::new(2), "adiós", false),
        ]);
        assert_eq!(mc.listening_mode(), Some(ListeningMode::MultipleChoice));
        assert!(mc.requires_options());

        let dictation = challenge(ChallengeKind::Listening, "Yo ___ estudiante")
            .with_options(vec![ChallengeOption::new(OptionId::new(3), "soy", true)]);
        assert_eq!(dictation.listening_mode(), Some(ListeningMode::Dictation));
        assert!(!dictation.requires_options());
        assert!(
            dictation
                .answer_key()
                .unwrap()
                .accepts(&AnswerPayload::blanks(vec!["Soy".into()]))
        );

        let bare = challenge(ChallengeKind::Listening, "Write what you hear");
        assert_eq!(bare.listening_mode(), Some(ListeningMode::Dictation));
        assert_eq!(bare.answer_key(), None);

        assert_eq!(challenge(ChallengeKind::Select, "q").listening_mode(), None);
    }

    #[test]
    fn fill_blank_key_follows_positions() {
        let c = challenge(ChallengeKind::FillBlank, "Yo ___ de ___").with_options(vec![
            ChallengeOption::new(OptionId::new(2), "México", true).with_position(2),
            ChallengeOption::new(OptionId::new(1), "soy", true).with_position(1),
        ]);
        let key = c.answer_key().unwrap();
        assert!(!key.accepts(&AnswerPayload::blanks(vec!["soy".into(), "mexico".into()])));
        assert!(key.accepts(&AnswerPayload::blanks(vec!["soy".into(), "méxico".into()])));
    }

    #[test]
    fn translation_accepts_any_listed_text() {
        let c = challenge(ChallengeKind::Translation, "I am a student").with_options(vec![
            ChallengeOption::new(OptionId::new(1), "Soy estudiante", true),
            ChallengeOption::new(OptionId::new(2), "Yo soy estudiante", true),
        ]);
        let key = c.answer_key().unwrap();
        assert!(key.accepts(&AnswerPayload::Text("yo soy estudiante.".into())));
        assert!(!key.accepts(&AnswerPayload::Text("soy maestro".into())));
        assert_eq!(challenge(ChallengeKind::Translation, "q").answer_key(), None);
    }

    #[test]
    fn sentence_order_key_sorted_by_position() {
        let c = challenge(ChallengeKind::SentenceOrder, "Order the words").with_options(vec![
            ChallengeOption::new(OptionId::new(10), "gato", true).with_position(3),
            ChallengeOption::new(OptionId::new(11), "El", true).with_position(1),
            ChallengeOption::new(OptionId::new(12), "negro", true).with_position(4),
            ChallengeOption::new(OptionId::new(13), "es", true).with_position(2),
        ]);
        assert_eq!(
            c.answer_key(),
            Some(AnswerKey::Ordered(vec![
                OptionId::new(11),
                OptionId::new(13),
                OptionId::new(10),
                OptionId::new(12),
            ]))
        );
    }

    #[test]
    fn match_pairs_key_requires_every_pair() {
        let c = challenge(ChallengeKind::MatchPairs, "Match").with_options(vec![
            ChallengeOption::new(OptionId::new(1), "dog", true).with_match_text("perro"),
            ChallengeOption::new(OptionId::new(2), "cat", true).with_match_text("gato"),
        ]);
        let key = c.answer_key().unwrap();
        let mut pairs = BTreeMap::new();
        pairs.insert(OptionId::new(1), "perro".to_string());
        assert!(!key.accepts(&AnswerPayload::Pairs(pairs.clone())));
        pairs.insert(OptionId::new(2), "gato".to_string());
        assert!(key.accepts(&AnswerPayload::Pairs(pairs)));
    }

    #[test]
    fn speaking_uses_acceptable_flag_and_threshold() {
        let key = challenge(ChallengeKind::Speaking, "Say: hola").answer_key().unwrap();
        let good = SpeechAnalysis {
            transcript: "hola".into(),
            score: 90,
            acceptable: true,
        };
        let flagged_bad = SpeechAnalysis {
            acceptable: false,
            ..good.clone()
        };
        assert!(key.accepts(&AnswerPayload::Speech(good)));
        assert!(!key.accepts(&AnswerPayload::Speech(flagged_bad)));
    }
}
