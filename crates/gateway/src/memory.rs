use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use lingo_core::model::{
    ChallengeId, Lesson, LessonId, MAX_HEARTS, POINTS_PER_CHALLENGE, ProgressDelta,
    SessionMode, UserProgress,
};
use uuid::Uuid;

use crate::api::{ChallengeSubmission, PracticeApi, ProgressCounters, SubmissionResult};
use crate::error::ApiError;

/// Which calls a queued failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    /// Fail before the backend does anything.
    BeforeApply,
    /// Apply the submission, then lose the response.
    AfterApply,
}

#[derive(Default)]
struct State {
    lessons: HashMap<LessonId, Lesson>,
    progress: Option<UserProgress>,
    /// Challenges answered correctly at least once, per lesson.
    solved: HashMap<LessonId, HashSet<ChallengeId>>,
    attempts: HashMap<Uuid, SubmissionResult>,
    submit_failures: VecDeque<(FailurePoint, ApiError)>,
    progress_failures: VecDeque<ApiError>,
    heart_failures: VecDeque<ApiError>,
    submissions_received: usize,
    submissions_applied: usize,
    progress_fetches: usize,
    lesson_fetches: usize,
}

/// In-process practice backend for tests and offline runs.
///
/// Grades with each challenge's answer key, keeps hearts and points, replays
/// the stored result for a repeated `attempt_id`, and can be told to fail.
#[derive(Clone, Default)]
pub struct InMemoryPracticeApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryPracticeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn insert_lesson(&self, lesson: Lesson) -> Result<(), ApiError> {
        self.lock()?.lessons.insert(lesson.id, lesson);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn set_progress(&self, progress: Option<UserProgress>) -> Result<(), ApiError> {
        self.lock()?.progress = progress;
        Ok(())
    }

    /// Current server-side progress, bypassing failure injection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn progress(&self) -> Result<Option<UserProgress>, ApiError> {
        Ok(self.lock()?.progress.clone())
    }

    /// Queues a failure for the next submission.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn fail_next_submit(&self, point: FailurePoint, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.submit_failures.push_back((point, error));
        Ok(())
    }

    /// Queues a failure for the next progress fetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn fail_next_progress(&self, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.progress_failures.push_back(error);
        Ok(())
    }

    /// Queues a failure for the next use-heart or refill call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn fail_next_hearts_call(&self, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.heart_failures.push_back(error);
        Ok(())
    }

    /// Submissions that reached the backend, including replays and failures.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn submissions_received(&self) -> Result<usize, ApiError> {
        Ok(self.lock()?.submissions_received)
    }

    /// Submissions that changed hearts or points.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn submissions_applied(&self) -> Result<usize, ApiError> {
        Ok(self.lock()?.submissions_applied)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn progress_fetches(&self) -> Result<usize, ApiError> {
        Ok(self.lock()?.progress_fetches)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn lesson_fetches(&self) -> Result<usize, ApiError> {
        Ok(self.lock()?.lesson_fetches)
    }
}

impl State {
    fn grade(&mut self, submission: &ChallengeSubmission) -> Result<SubmissionResult, ApiError> {
        let (lesson_id, challenge) = self
            .lessons
            .iter()
            .find_map(|(id, lesson)| {
                lesson
                    .challenges()
                    .iter()
                    .find(|challenge| challenge.id == submission.challenge_id)
                    .map(|challenge| (*id, challenge.clone()))
            })
            .ok_or(ApiError::NotFound)?;
        let mode = self
            .lessons
            .get(&lesson_id)
            .map_or(SessionMode::FirstPass, Lesson::mode);
        let progress = self.progress.clone().ok_or(ApiError::NotFound)?;

        if mode == SessionMode::FirstPass && !progress.has_hearts() {
            return Err(ApiError::HeartsExhausted);
        }

        // without a key the challenge cannot be failed
        let correct = challenge
            .answer_key()
            .is_none_or(|key| key.accepts(&submission.answer));

        let (delta, hearts_used) = if correct {
            let regain = i32::from(mode == SessionMode::Practice);
            let points = i64::try_from(POINTS_PER_CHALLENGE).unwrap_or(i64::MAX);
            (
                ProgressDelta {
                    hearts: regain,
                    points,
                },
                0,
            )
        } else {
            let used = u32::from(progress.has_hearts());
            (ProgressDelta::hearts(-1), used)
        };
        let updated = progress.apply(delta);

        if correct {
            let solved = self.solved.entry(lesson_id).or_default();
            solved.insert(challenge.id);
            let solved_count = solved.len();
            if let Some(lesson) = self.lessons.get_mut(&lesson_id) {
                lesson.completed |= solved_count >= lesson.total();
            }
        }

        let result = SubmissionResult {
            correct,
            progress: Some(ProgressCounters {
                hearts: updated.hearts(),
                points: updated.points,
            }),
            hearts_used,
        };
        self.progress = Some(updated);
        self.submissions_applied += 1;
        Ok(result)
    }
}

#[async_trait]
impl PracticeApi for InMemoryPracticeApi {
    async fn lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        let mut state = self.lock()?;
        state.lesson_fetches += 1;
        state.lessons.get(&id).cloned().ok_or(ApiError::NotFound)
    }

    async fn user_progress(&self) -> Result<Option<UserProgress>, ApiError> {
        let mut state = self.lock()?;
        state.progress_fetches += 1;
        if let Some(error) = state.progress_failures.pop_front() {
            return Err(error);
        }
        Ok(state.progress.clone())
    }

    async fn submit_challenge(
        &self,
        submission: &ChallengeSubmission,
    ) -> Result<SubmissionResult, ApiError> {
        let mut state = self.lock()?;
        state.submissions_received += 1;

        let failure = state.submit_failures.pop_front();
        if let Some((FailurePoint::BeforeApply, error)) = failure {
            return Err(error);
        }

        let result = match state.attempts.get(&submission.attempt_id) {
            Some(stored) => *stored,
            None => {
                let result = state.grade(submission)?;
                state.attempts.insert(submission.attempt_id, result);
                result
            }
        };

        match failure {
            Some((_, error)) => Err(error),
            None => Ok(result),
        }
    }

    async fn use_heart(&self) -> Result<u32, ApiError> {
        let mut state = self.lock()?;
        if let Some(error) = state.heart_failures.pop_front() {
            return Err(error);
        }
        let progress = state.progress.clone().ok_or(ApiError::NotFound)?;
        if !progress.has_hearts() {
            return Err(ApiError::HeartsExhausted);
        }
        let updated = progress.apply(ProgressDelta::hearts(-1));
        let hearts = updated.hearts();
        state.progress = Some(updated);
        Ok(hearts)
    }

    async fn refill_hearts(&self) -> Result<u32, ApiError> {
        let mut state = self.lock()?;
        if let Some(error) = state.heart_failures.pop_front() {
            return Err(error);
        }
        let progress = state.progress.clone().ok_or(ApiError::NotFound)?;
        let updated = progress.with_hearts(MAX_HEARTS);
        state.progress = Some(updated);
        Ok(MAX_HEARTS)
    }
}
