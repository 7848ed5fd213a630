use std::sync::Arc;

use gateway::{ApiError, PracticeApi};
use lingo_core::model::{LessonId, UserProgress};

use super::controller::PracticeController;
use crate::Clock;
use crate::error::PracticeError;

/// Outcome of resolving a lesson page.
#[derive(Clone)]
pub enum LessonBootstrap {
    Ready(PracticeController),
    /// No progress yet, or no active course: the learner picks a course first.
    NeedsCourse,
    /// Unknown or empty lesson: back to the learning hub.
    LessonMissing,
}

impl std::fmt::Debug for LessonBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(controller) => f
                .debug_tuple("Ready")
                .field(&controller.snapshot().lesson_id)
                .finish(),
            Self::NeedsCourse => f.write_str("NeedsCourse"),
            Self::LessonMissing => f.write_str("LessonMissing"),
        }
    }
}

/// Loads lessons and progress and starts practice sessions.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    api: Arc<dyn PracticeApi>,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn PracticeApi>) -> Self {
        Self { clock, api }
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn PracticeApi> {
        Arc::clone(&self.api)
    }

    /// Current learner progress, `None` before any course was started.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Api` on API failures.
    pub async fn user_progress(&self) -> Result<Option<UserProgress>, PracticeError> {
        Ok(self.api.user_progress().await?)
    }

    /// Resolves lesson and progress for the lesson page.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Api` for failures other than a missing lesson.
    pub async fn load_practice(
        &self,
        lesson_id: LessonId,
    ) -> Result<LessonBootstrap, PracticeError> {
        let progress = match self.api.user_progress().await? {
            Some(progress) if progress.active_course.is_some() => progress,
            _ => {
                tracing::info!(lesson = lesson_id.value(), "no active course; redirecting");
                return Ok(LessonBootstrap::NeedsCourse);
            }
        };

        let lesson = match self.api.lesson(lesson_id).await {
            Ok(lesson) => lesson,
            Err(ApiError::NotFound) => {
                tracing::info!(lesson = lesson_id.value(), "lesson not found");
                return Ok(LessonBootstrap::LessonMissing);
            }
            Err(err) => return Err(err.into()),
        };
        if lesson.total() == 0 {
            tracing::warn!(lesson = lesson_id.value(), "lesson has no challenges");
            return Ok(LessonBootstrap::LessonMissing);
        }

        tracing::info!(
            lesson = lesson_id.value(),
            challenges = lesson.total(),
            mode = ?lesson.mode(),
            hearts = progress.hearts(),
            "practice session started"
        );
        Ok(LessonBootstrap::Ready(PracticeController::new(
            Arc::clone(&self.api),
            self.clock,
            lesson,
            progress,
        )))
    }
}
