use crate::model::AnswerPayload;
use crate::text::{MAX_FIELD_CHARS, clamp_chars};

/// Blanks beyond this count are rendered as plain text.
pub const MAX_BLANKS: usize = 20;

/// A piece of a fill-in-the-blank prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Input field with its zero-based blank index.
    Blank(usize),
}

/// Splits a prompt into text and blanks. Every maximal run of underscores is
/// one blank.
#[must_use]
pub fn parse_segments(question: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut blanks = 0;
    let mut in_run = false;

    for ch in question.chars() {
        if ch == '_' {
            if in_run {
                continue;
            }
            if blanks >= MAX_BLANKS {
                text.push(ch);
                continue;
            }
            in_run = true;
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Blank(blanks));
            blanks += 1;
        } else {
            in_run = false;
            text.push(ch);
        }
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

#[must_use]
pub fn count_blanks(question: &str) -> usize {
    parse_segments(question)
        .iter()
        .filter(|segment| matches!(segment, Segment::Blank(_)))
        .count()
}

/// One text field per blank. A prompt without underscores gets a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlanksInput {
    segments: Vec<Segment>,
    values: Vec<String>,
}

impl BlanksInput {
    #[must_use]
    pub fn new(question: &str) -> Self {
        let segments = parse_segments(question);
        let count = segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Blank(_)))
            .count()
            .max(1);
        Self {
            segments,
            values: vec![String::new(); count],
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the prompt carried inline blanks (otherwise one trailing field).
    #[must_use]
    pub fn has_inline_blanks(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Blank(_)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map_or("", String::as_str)
    }

    /// Sets one field, clamped to `MAX_FIELD_CHARS`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = clamp_chars(value, MAX_FIELD_CHARS);
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.values.iter().all(|value| !value.trim().is_empty())
    }

    #[must_use]
    pub fn to_answer_payload(&self) -> Option<AnswerPayload> {
        self.is_ready().then(|| AnswerPayload::blanks(self.values.clone()))
    }
}
