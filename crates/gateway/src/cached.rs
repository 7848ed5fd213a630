use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lingo_core::model::{Lesson, LessonId, UserProgress};

use crate::api::{ChallengeSubmission, PracticeApi, SubmissionResult};
use crate::error::ApiError;

/// Query cache in front of another `PracticeApi`.
///
/// Lessons are cached by id. The progress entry is dropped by every mutating
/// call, so the next `user_progress` always reaches the backend.
#[derive(Clone)]
pub struct CachedPracticeApi {
    inner: Arc<dyn PracticeApi>,
    lessons: Arc<Mutex<HashMap<LessonId, Lesson>>>,
    progress: Arc<Mutex<Option<Option<UserProgress>>>>,
}

impl CachedPracticeApi {
    #[must_use]
    pub fn new(inner: Arc<dyn PracticeApi>) -> Self {
        Self {
            inner,
            lessons: Arc::new(Mutex::new(HashMap::new())),
            progress: Arc::new(Mutex::new(None)),
        }
    }

    /// Drops the cached progress entry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the cache lock is poisoned.
    pub fn invalidate_progress(&self) -> Result<(), ApiError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        *guard = None;
        Ok(())
    }

    /// Drops every cached lesson, e.g. after a lesson was completed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the cache lock is poisoned.
    pub fn invalidate_lessons(&self) -> Result<(), ApiError> {
        self.lessons
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .clear();
        Ok(())
    }
}

#[async_trait]
impl PracticeApi for CachedPracticeApi {
    async fn lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        {
            let guard = self
                .lessons
                .lock()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            if let Some(lesson) = guard.get(&id) {
                tracing::trace!(lesson = id.value(), "lesson cache hit");
                return Ok(lesson.clone());
            }
        }

        let lesson = self.inner.lesson(id).await?;
        self.lessons
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .insert(id, lesson.clone());
        Ok(lesson)
    }

    async fn user_progress(&self) -> Result<Option<UserProgress>, ApiError> {
        {
            let guard = self
                .progress
                .lock()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            if let Some(progress) = guard.as_ref() {
                return Ok(progress.clone());
            }
        }

        let progress = self.inner.user_progress().await?;
        *self
            .progress
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))? = Some(progress.clone());
        Ok(progress)
    }

    async fn submit_challenge(
        &self,
        submission: &ChallengeSubmission,
    ) -> Result<SubmissionResult, ApiError> {
        // the backend may have applied the attempt even when the response was lost
        let result = self.inner.submit_challenge(submission).await;
        self.invalidate_progress()?;
        let result = result?;
        // completion flags live on the lesson payload
        self.invalidate_lessons()?;
        Ok(result)
    }

    async fn use_heart(&self) -> Result<u32, ApiError> {
        let result = self.inner.use_heart().await;
        self.invalidate_progress()?;
        result
    }

    async fn refill_hearts(&self) -> Result<u32, ApiError> {
        let result = self.inner.refill_hearts().await;
        self.invalidate_progress()?;
        result
    }
}
