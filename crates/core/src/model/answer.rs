use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::OptionId;

/// Outcome of the speaking sub-flow: what was heard and how close it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAnalysis {
    pub transcript: String,
    /// Pronunciation score on a 0..=100 scale.
    pub score: u8,
    pub acceptable: bool,
}

/// Normalized answer emitted by a challenge renderer.
///
/// Each challenge kind produces exactly one of these shapes; the gateway maps
/// them onto the submission request fields.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerPayload {
    /// A single chosen option (select, assist, listening choice, true/false).
    Choice(OptionId),
    /// One trimmed value per blank plus the joined display string.
    Blanks { values: Vec<String>, display: String },
    /// Free text (translation).
    Text(String),
    /// Option ids in the order the learner arranged them.
    Ordered(Vec<OptionId>),
    /// Left-column option id to the chosen right-column text.
    Pairs(BTreeMap<OptionId, String>),
    Speech(SpeechAnalysis),
}

impl AnswerPayload {
    /// Builds a blanks payload, joining trimmed values with single spaces.
    #[must_use]
    pub fn blanks(values: Vec<String>) -> Self {
        let values: Vec<String> = values.into_iter().map(|v| v.trim().to_string()).collect();
        let display = values.join(" ");
        Self::Blanks { values, display }
    }

    /// Short label used in logs; never contains learner input.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Choice(_) => "choice",
            Self::Blanks { .. } => "blanks",
            Self::Text(_) => "text",
            Self::Ordered(_) => "ordered",
            Self::Pairs(_) => "pairs",
            Self::Speech(_) => "speech",
        }
    }
}
