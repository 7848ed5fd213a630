//! JSON shapes of the practice API and their mapping to domain types.

use std::collections::BTreeMap;

use lingo_core::model::{
    AnswerPayload, Challenge, ChallengeError, ChallengeId, ChallengeKind, ChallengeOption,
    CourseId, Lesson, LessonId, MediaSrc, OptionId, UserProgress,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{ChallengeSubmission, ProgressCounters, SubmissionResult};
use crate::error::ApiError;

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct LessonDto {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    challenges: Vec<ChallengeDto>,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Deserialize)]
struct ChallengeDto {
    id: u64,
    #[serde(rename = "type")]
    kind: String,
    question: String,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    audio_src: Option<String>,
    #[serde(default)]
    order: u32,
    #[serde(default)]
    lesson: Option<u64>,
    #[serde(default)]
    options: Vec<OptionDto>,
}

#[derive(Debug, Deserialize)]
struct OptionDto {
    id: u64,
    text: String,
    #[serde(default)]
    correct: bool,
    #[serde(default)]
    image_src: Option<String>,
    #[serde(default)]
    audio_src: Option<String>,
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    match_text: Option<String>,
}

/// `active_course` arrives either as a bare id or as a nested course object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CourseRef {
    Id(u64),
    Object { id: u64 },
}

impl CourseRef {
    fn id(&self) -> CourseId {
        match self {
            Self::Id(id) | Self::Object { id } => CourseId::new(*id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressDto {
    hearts: u32,
    #[serde(default)]
    points: u64,
    #[serde(default)]
    active_course: Option<CourseRef>,
    #[serde(default)]
    streak: u32,
}

#[derive(Debug, Deserialize)]
struct CountersDto {
    hearts: u32,
    points: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponseDto {
    correct: bool,
    #[serde(default)]
    user_progress: Option<CountersDto>,
    #[serde(default, alias = "heartsUsed")]
    hearts_used: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeartsDto {
    pub(crate) hearts: u32,
}

fn parse_media(raw: Option<String>, owner: &str) -> Option<MediaSrc> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match MediaSrc::parse(&raw) {
        Ok(src) => Some(src),
        Err(err) => {
            tracing::warn!(owner, error = %err, "ignoring unusable media source");
            None
        }
    }
}

impl LessonDto {
    /// # Errors
    ///
    /// Returns `ApiError::Decode` when a challenge carries an unknown type tag.
    pub(crate) fn into_lesson(self) -> Result<Lesson, ApiError> {
        let lesson_id = LessonId::new(self.id);
        let challenges = self
            .challenges
            .into_iter()
            .map(|challenge| challenge.into_challenge(lesson_id))
            .collect::<Result<Vec<_>, _>>()?;
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| format!("Lesson {}", self.id));
        Ok(Lesson::new(lesson_id, title, challenges, self.completed))
    }
}

impl ChallengeDto {
    fn into_challenge(self, lesson_id: LessonId) -> Result<Challenge, ApiError> {
        let kind: ChallengeKind = self
            .kind
            .parse()
            .map_err(|err: ChallengeError| ApiError::Decode(err.to_string()))?;
        let owner = format!("challenge {}", self.id);
        let options = self
            .options
            .into_iter()
            .enumerate()
            .map(|(index, option)| option.into_option(index))
            .collect();

        Ok(Challenge {
            id: ChallengeId::new(self.id),
            lesson_id: self.lesson.map_or(lesson_id, LessonId::new),
            order: self.order,
            kind,
            question: self.question,
            hint: self.hint.filter(|hint| !hint.trim().is_empty()),
            audio_src: parse_media(self.audio_src, &owner),
            options,
        })
    }
}

impl OptionDto {
    /// Options without an explicit position keep their list order.
    fn into_option(self, index: usize) -> ChallengeOption {
        let owner = format!("option {}", self.id);
        let fallback = u32::try_from(index + 1).unwrap_or(u32::MAX);
        ChallengeOption {
            id: OptionId::new(self.id),
            text: self.text,
            correct: self.correct,
            image_src: parse_media(self.image_src, &owner),
            audio_src: parse_media(self.audio_src, &owner),
            position: self.position.unwrap_or(fallback),
            match_text: self.match_text.filter(|text| !text.trim().is_empty()),
        }
    }
}

impl From<ProgressDto> for UserProgress {
    fn from(dto: ProgressDto) -> Self {
        UserProgress::new(
            dto.hearts,
            dto.points,
            dto.active_course.as_ref().map(CourseRef::id),
            dto.streak,
        )
    }
}

impl From<SubmitResponseDto> for SubmissionResult {
    fn from(dto: SubmitResponseDto) -> Self {
        let hearts_used = match (dto.correct, dto.hearts_used) {
            (_, Some(used)) => used,
            (true, None) => 0,
            (false, None) => 1,
        };
        SubmissionResult {
            correct: dto.correct,
            progress: dto.user_progress.map(|counters| ProgressCounters {
                hearts: counters.hearts,
                points: counters.points,
            }),
            hearts_used,
        }
    }
}

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Serialize)]
pub(crate) struct SubmitRequest {
    challenge_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_option: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blank_answers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordered_options: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paired_options: Option<BTreeMap<u64, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pronunciation_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_acceptable: Option<bool>,
    time_spent: u32,
    attempts: u32,
    attempt_id: Option<Uuid>,
}

impl From<&ChallengeSubmission> for SubmitRequest {
    fn from(submission: &ChallengeSubmission) -> Self {
        let base = Self {
            challenge_id: submission.challenge_id.value(),
            time_spent: submission.time_spent_secs,
            attempts: submission.attempts,
            attempt_id: Some(submission.attempt_id),
            ..Self::default()
        };
        match &submission.answer {
            AnswerPayload::Choice(id) => Self {
                selected_option: Some(id.value()),
                ..base
            },
            AnswerPayload::Blanks { values, display } => Self {
                text_answer: Some(display.clone()),
                blank_answers: Some(values.clone()),
                ..base
            },
            AnswerPayload::Text(text) => Self {
                text_answer: Some(text.clone()),
                ..base
            },
            AnswerPayload::Ordered(ids) => Self {
                ordered_options: Some(ids.iter().map(|id| id.value()).collect()),
                ..base
            },
            AnswerPayload::Pairs(pairs) => Self {
                paired_options: Some(
                    pairs
                        .iter()
                        .map(|(id, text)| (id.value(), text.clone()))
                        .collect(),
                ),
                ..base
            },
            AnswerPayload::Speech(analysis) => Self {
                text_answer: Some(analysis.transcript.clone()),
                pronunciation_score: Some(analysis.score),
                is_acceptable: Some(analysis.acceptable),
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::SpeechAnalysis;
    use serde_json::json;

    #[test]
    fn lesson_payload_maps_to_sorted_domain_lesson() {
        let dto: LessonDto = serde_json::from_value(json!({
            "id": 7,
            "title": "Basics",
            "completed": false,
            "challenges": [
                {"id": 2, "type": "TRANSLATION", "question": "I am", "order": 2, "options": []},
                {"id": 1, "type": "SELECT", "question": "the man", "order": 1,
                 "hint": "", "audio_src": "/media/man.mp3",
                 "options": [
                    {"id": 10, "text": "el hombre", "correct": true, "image_src": "/man.svg"},
                    {"id": 11, "text": "la mujer", "correct": false, "image_src": "not a path"}
                 ]}
            ]
        }))
        .unwrap();

        let lesson = dto.into_lesson().unwrap();
        assert_eq!(lesson.title, "Basics");
        let first = &lesson.challenges()[0];
        assert_eq!(first.id, ChallengeId::new(1));
        assert_eq!(first.kind, ChallengeKind::Select);
        assert_eq!(first.hint, None);
        assert!(first.audio_src.is_some());
        assert!(first.options[0].image_src.is_some());
        assert!(first.options[1].image_src.is_none());
        assert_eq!(first.options[1].position, 2);
    }

    #[test]
    fn unknown_kind_is_a_decode_error() {
        let dto: LessonDto = serde_json::from_value(json!({
            "id": 1,
            "challenges": [{"id": 1, "type": "CROSSWORD", "question": "?"}]
        }))
        .unwrap();
        assert!(matches!(dto.into_lesson(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn progress_accepts_nested_course() {
        let dto: ProgressDto = serde_json::from_value(json!({
            "hearts": 9, "points": 40, "active_course": {"id": 3, "title": "Spanish"}
        }))
        .unwrap();
        let progress = UserProgress::from(dto);
        assert_eq!(progress.hearts(), 5);
        assert_eq!(progress.active_course, Some(CourseId::new(3)));

        let dto: ProgressDto =
            serde_json::from_value(json!({"hearts": 2, "active_course": null})).unwrap();
        assert_eq!(UserProgress::from(dto).active_course, None);
    }

    #[test]
    fn hearts_used_accepts_both_spellings_and_defaults() {
        let camel: SubmitResponseDto = serde_json::from_value(json!({
            "correct": false, "user_progress": {"hearts": 3, "points": 10}, "heartsUsed": 2
        }))
        .unwrap();
        assert_eq!(SubmissionResult::from(camel).hearts_used, 2);

        let missing: SubmitResponseDto = serde_json::from_value(json!({
            "correct": false, "user_progress": {"hearts": 4, "points": 10}
        }))
        .unwrap();
        assert_eq!(SubmissionResult::from(missing).hearts_used, 1);
    }

    #[test]
    fn counters_are_optional_in_submit_responses() {
        let bare: SubmitResponseDto =
            serde_json::from_value(json!({"correct": false, "hearts_used": 2})).unwrap();
        let result = SubmissionResult::from(bare);
        assert_eq!(result.progress, None);
        assert_eq!(result.hearts_used, 2);

        let full: SubmitResponseDto = serde_json::from_value(json!({
            "correct": true, "user_progress": {"hearts": 5, "points": 20}
        }))
        .unwrap();
        assert_eq!(
            SubmissionResult::from(full).progress,
            Some(ProgressCounters {
                hearts: 5,
                points: 20
            })
        );
    }

    fn submission(answer: AnswerPayload) -> ChallengeSubmission {
        ChallengeSubmission {
            challenge_id: ChallengeId::new(5),
            answer,
            time_spent_secs: 12,
            attempts: 2,
            attempt_id: Uuid::nil(),
        }
    }

    #[test]
    fn submit_request_carries_one_answer_shape() {
        let choice = serde_json::to_value(SubmitRequest::from(&submission(
            AnswerPayload::Choice(OptionId::new(9)),
        )))
        .unwrap();
        assert_eq!(choice["challenge_id"], 5);
        assert_eq!(choice["selected_option"], 9);
        assert_eq!(choice["time_spent"], 12);
        assert_eq!(choice["attempts"], 2);
        assert!(choice.get("text_answer").is_none());

        let blanks = serde_json::to_value(SubmitRequest::from(&submission(
            AnswerPayload::blanks(vec!["soy".into(), "de".into()]),
        )))
        .unwrap();
        assert_eq!(blanks["text_answer"], "soy de");
        assert_eq!(blanks["blank_answers"], json!(["soy", "de"]));

        let speech = serde_json::to_value(SubmitRequest::from(&submission(
            AnswerPayload::Speech(SpeechAnalysis {
                transcript: "hola".into(),
                score: 88,
                acceptable: true,
            }),
        )))
        .unwrap();
        assert_eq!(speech["pronunciation_score"], 88);
        assert_eq!(speech["is_acceptable"], true);

        let mut map = BTreeMap::new();
        map.insert(OptionId::new(1), "perro".to_string());
        let pairs = serde_json::to_value(SubmitRequest::from(&submission(AnswerPayload::Pairs(
            map,
        ))))
        .unwrap();
        assert_eq!(pairs["paired_options"]["1"], "perro");
    }
}
