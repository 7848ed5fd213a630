//! Seed content for the offline backend.

use lingo_core::model::{
    Challenge, ChallengeId, ChallengeKind, ChallengeOption, CourseId, Lesson, LessonId,
    MAX_HEARTS, OptionId, UserProgress,
};

use crate::error::ApiError;
use crate::memory::InMemoryPracticeApi;

pub const DEMO_LESSON_ID: LessonId = LessonId::new(1);
pub const DEMO_COURSE_ID: CourseId = CourseId::new(1);

fn option(id: u64, text: &str, correct: bool) -> ChallengeOption {
    ChallengeOption::new(OptionId::new(id), text, correct)
}

fn challenge(id: u64, kind: ChallengeKind, question: &str) -> Challenge {
    let order = u32::try_from(id).unwrap_or(u32::MAX);
    Challenge::new(ChallengeId::new(id), DEMO_LESSON_ID, order, kind, question)
}

/// A Spanish starter lesson with one challenge of every kind.
#[must_use]
pub fn demo_lesson() -> Lesson {
    let challenges = vec![
        challenge(1, ChallengeKind::Select, "Which one of these is **\"the man\"**?")
            .with_options(vec![
                option(101, "el hombre", true),
                option(102, "la mujer", false),
                option(103, "el robot", false),
            ]),
        challenge(2, ChallengeKind::Assist, "\"the woman\"").with_options(vec![
            option(201, "el hombre", false),
            option(202, "la mujer", true),
            option(203, "el niño", false),
        ]),
        challenge(3, ChallengeKind::FillBlank, "Yo ___ estudiante.")
            .with_hint("*ser*, first person singular")
            .with_options(vec![option(301, "soy", true)]),
        challenge(4, ChallengeKind::Translation, "I am a student").with_options(vec![
            option(401, "Soy estudiante", true),
            option(402, "Yo soy estudiante", true),
        ]),
        challenge(5, ChallengeKind::Listening, "What did you hear?").with_options(vec![
            option(501, "hola", true),
            option(502, "adiós", false),
            option(503, "gracias", false),
        ]),
        challenge(6, ChallengeKind::Speaking, "Say it out loud")
            .with_options(vec![option(601, "buenos días", true)]),
        challenge(7, ChallengeKind::MatchPairs, "Match the pairs").with_options(vec![
            option(701, "dog", true).with_match_text("perro"),
            option(702, "cat", true).with_match_text("gato"),
            option(703, "bird", true).with_match_text("pájaro"),
        ]),
        challenge(8, ChallengeKind::SentenceOrder, "The cat is black").with_options(vec![
            option(801, "El", true).with_position(1),
            option(802, "gato", true).with_position(2),
            option(803, "es", true).with_position(3),
            option(804, "negro", true).with_position(4),
        ]),
        challenge(9, ChallengeKind::TrueFalse, "*Gato* means \"dog\".").with_options(vec![
            option(901, "Verdadero", false),
            option(902, "Falso", true),
        ]),
    ];
    Lesson::new(DEMO_LESSON_ID, "Spanish basics", challenges, false)
}

#[must_use]
pub fn demo_progress() -> UserProgress {
    UserProgress::new(MAX_HEARTS, 0, Some(DEMO_COURSE_ID), 0)
}

impl InMemoryPracticeApi {
    /// Backend holding the demo lesson and full hearts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn with_demo_content() -> Result<Self, ApiError> {
        let api = Self::new();
        api.insert_lesson(demo_lesson())?;
        api.set_progress(Some(demo_progress()))?;
        Ok(api)
    }
}
