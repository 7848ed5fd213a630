use crate::model::{AnswerPayload, Challenge, DEFAULT_PRONUNCIATION_THRESHOLD, SpeechAnalysis};
use crate::text::{MAX_FIELD_CHARS, clamp_chars, pronunciation_score};

/// Holds the result of the recording sub-flow for a SPEAKING challenge.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakingInput {
    expected: String,
    threshold: u8,
    analysis: Option<SpeechAnalysis>,
}

impl SpeakingInput {
    /// The phrase to say is the first correct option, else the question itself.
    #[must_use]
    pub fn for_challenge(challenge: &Challenge) -> Self {
        let expected = challenge
            .options
            .iter()
            .find(|option| option.correct)
            .map_or_else(|| challenge.question.clone(), |option| option.text.clone());
        Self {
            expected,
            threshold: DEFAULT_PRONUNCIATION_THRESHOLD,
            analysis: None,
        }
    }

    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&SpeechAnalysis> {
        self.analysis.as_ref()
    }

    /// Scores a recognizer transcript and stores the analysis.
    pub fn record(&mut self, transcript: &str, confidence: Option<f32>) -> &SpeechAnalysis {
        let transcript = clamp_chars(transcript.trim(), MAX_FIELD_CHARS);
        let score = pronunciation_score(&self.expected, &transcript, confidence);
        self.analysis.insert(SpeechAnalysis {
            transcript,
            score,
            acceptable: score >= self.threshold,
        })
    }

    pub fn clear(&mut self) {
        self.analysis = None;
    }

    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        self.analysis
            .as_ref()
            .filter(|analysis| !analysis.transcript.is_empty())
            .cloned()
            .map(AnswerPayload::Speech)
    }
}
