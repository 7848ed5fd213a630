use async_trait::async_trait;
use lingo_core::model::{AnswerPayload, ChallengeId, Lesson, LessonId, UserProgress};
use uuid::Uuid;

use crate::error::ApiError;

/// One graded attempt as sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeSubmission {
    pub challenge_id: ChallengeId,
    pub answer: AnswerPayload,
    /// Seconds between the challenge being shown and the submit.
    pub time_spent_secs: u32,
    /// 1-based attempt counter for this challenge within the session.
    pub attempts: u32,
    /// Stable across transport retries of the same attempt.
    pub attempt_id: Uuid,
}

/// Hearts and points after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressCounters {
    pub hearts: u32,
    pub points: u64,
}

/// Authoritative outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionResult {
    pub correct: bool,
    /// `None` when the backend answered without its counters.
    pub progress: Option<ProgressCounters>,
    /// Hearts the backend deducted for this attempt. Charged locally when
    /// `progress` is missing.
    pub hearts_used: u32,
}

/// Remote contract of the practice backend.
///
/// Grading and hearts/points bookkeeping live behind this trait; callers
/// never decide correctness themselves.
#[async_trait]
pub trait PracticeApi: Send + Sync {
    /// Fetch a lesson with its challenges and options.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown lessons, or other API errors.
    async fn lesson(&self, id: LessonId) -> Result<Lesson, ApiError>;

    /// Fetch the learner's progress. `None` when no progress record exists yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or authorization failures.
    async fn user_progress(&self) -> Result<Option<UserProgress>, ApiError>;

    /// Submit an attempt for grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::HeartsExhausted` when the backend refuses the attempt,
    /// or other API errors.
    async fn submit_challenge(
        &self,
        submission: &ChallengeSubmission,
    ) -> Result<SubmissionResult, ApiError>;

    /// Spend one heart outside of grading. Returns the new heart count.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn use_heart(&self) -> Result<u32, ApiError>;

    /// Refill hearts to the maximum. Returns the new heart count.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn refill_hearts(&self) -> Result<u32, ApiError>;
}
