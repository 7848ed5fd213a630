use std::sync::{Arc, Mutex, PoisonError};

use gateway::PracticeApi;
use lingo_core::model::{AnswerPayload, Lesson, MAX_HEARTS, ProgressDelta, UserProgress};

use super::state::{PracticeSession, PracticeSnapshot, SubmitStep};
use crate::Clock;
use crate::error::PracticeError;

/// Result of one `submit_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend graded the attempt.
    Graded { correct: bool },
    /// `wrong` was acknowledged; answer the same challenge again.
    Retry,
    /// Moved to the next challenge.
    Advanced,
    /// Moved past the last challenge.
    Completed,
}

/// Drives one lesson run against a `PracticeApi`.
///
/// Cheap to clone; clones share the same session. The state lock is never
/// held across an `.await`.
#[derive(Clone)]
pub struct PracticeController {
    api: Arc<dyn PracticeApi>,
    clock: Clock,
    session: Arc<Mutex<PracticeSession>>,
}

impl PracticeController {
    #[must_use]
    pub fn new(
        api: Arc<dyn PracticeApi>,
        clock: Clock,
        lesson: Lesson,
        progress: UserProgress,
    ) -> Self {
        let session = PracticeSession::new(lesson, progress, clock.now());
        Self {
            api,
            clock,
            session: Arc::new(Mutex::new(session)),
        }
    }

    fn with_session<R>(&self, f: impl FnOnce(&mut PracticeSession) -> R) -> R {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    #[must_use]
    pub fn snapshot(&self) -> PracticeSnapshot {
        self.with_session(|session| session.snapshot())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.with_session(|session| session.is_complete())
    }

    /// Records the learner's answer. Returns whether it was accepted.
    pub fn select_answer(&self, answer: AnswerPayload) -> bool {
        self.with_session(|session| session.select_answer(answer))
    }

    pub fn clear_answer(&self) {
        self.with_session(PracticeSession::clear_answer);
    }

    pub fn dismiss_error(&self) {
        self.with_session(PracticeSession::dismiss_error);
    }

    /// `true` exactly once after the lesson is complete.
    pub fn take_finish_effect(&self) -> bool {
        self.with_session(PracticeSession::take_finish_effect)
    }

    /// Performs the footer's primary action for the current status.
    ///
    /// With status `none` this sends exactly one submission; `wrong` and
    /// `correct` are local transitions.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError` for local validation failures, for a refused
    /// attempt and for API failures. Nothing is retried automatically.
    pub async fn submit_answer(&self) -> Result<SubmitOutcome, PracticeError> {
        let now = self.clock.now();
        let step = self.with_session(|session| session.begin_submit(now))?;

        let submission = match step {
            SubmitStep::Retry => return Ok(SubmitOutcome::Retry),
            SubmitStep::Advance => {
                return Ok(if self.is_complete() {
                    SubmitOutcome::Completed
                } else {
                    SubmitOutcome::Advanced
                });
            }
            SubmitStep::Send(submission) => submission,
        };

        let challenge = submission.challenge_id.value();
        match self.api.submit_challenge(&submission).await {
            Ok(result) => {
                tracing::debug!(
                    challenge,
                    correct = result.correct,
                    hearts = ?result.progress.map(|p| p.hearts),
                    hearts_used = result.hearts_used,
                    "challenge graded"
                );
                self.with_session(|session| session.apply_result(result));
                self.refresh_progress().await;
                Ok(SubmitOutcome::Graded {
                    correct: result.correct,
                })
            }
            Err(err) => {
                tracing::warn!(challenge, error = %err, "challenge submission failed");
                let err = self.with_session(|session| session.apply_failure(err));
                if err == PracticeError::HeartsExhausted {
                    self.refresh_progress().await;
                }
                Err(err)
            }
        }
    }

    /// Refills hearts, showing the full count until the backend answers.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Api` if the backend refuses; the displayed
    /// hearts are rolled back.
    pub async fn refill_hearts(&self) -> Result<u32, PracticeError> {
        let full = i32::try_from(MAX_HEARTS).unwrap_or(i32::MAX);
        self.mutate_hearts(ProgressDelta::hearts(full), "refill").await
    }

    /// Spends one heart outside of grading.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError` if the backend refuses; the displayed hearts
    /// are rolled back.
    pub async fn use_heart(&self) -> Result<u32, PracticeError> {
        self.mutate_hearts(ProgressDelta::hearts(-1), "use").await
    }

    async fn mutate_hearts(
        &self,
        delta: ProgressDelta,
        action: &'static str,
    ) -> Result<u32, PracticeError> {
        self.with_session(|session| session.apply_optimistic(delta));
        let call = if delta.hearts > 0 {
            self.api.refill_hearts().await
        } else {
            self.api.use_heart().await
        };
        let outcome = match call {
            Ok(hearts) => {
                tracing::debug!(action, hearts, "hearts updated");
                self.with_session(|session| session.confirm_hearts(hearts));
                Ok(hearts)
            }
            Err(err) => {
                tracing::warn!(action, error = %err, "hearts update failed");
                Err(self.with_session(|session| session.rollback_progress(err)))
            }
        };
        self.refresh_progress().await;
        outcome
    }

    /// Re-reads progress from the backend. Failures are logged and ignored.
    pub async fn refresh_progress(&self) {
        match self.api.user_progress().await {
            Ok(Some(progress)) => {
                if !self.with_session(|session| session.reconcile_progress(progress)) {
                    tracing::trace!("progress refresh skipped while a change is unconfirmed");
                }
            }
            Ok(None) => tracing::warn!("progress disappeared during a session"),
            Err(err) => tracing::warn!(error = %err, "progress refresh failed"),
        }
    }
}
