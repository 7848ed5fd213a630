use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use gateway::{ApiError, ChallengeSubmission, SubmissionResult};
use lingo_core::model::{
    AnswerPayload, Challenge, ChallengeId, Lesson, LessonId, ProgressCache, ProgressDelta,
    SessionMode, UserProgress,
};
use uuid::Uuid;

use crate::error::PracticeError;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Feedback state of the active challenge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChallengeStatus {
    #[default]
    None,
    Correct,
    Wrong,
}

/// What `submit_answer` has to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStep {
    /// `wrong` acknowledged; the same challenge is answered again.
    Retry,
    /// `correct` acknowledged; the next challenge (or completion) is shown.
    Advance,
    /// A graded attempt must be sent.
    Send(ChallengeSubmission),
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Immutable view of a session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSnapshot {
    pub lesson_id: LessonId,
    pub title: String,
    pub mode: SessionMode,
    pub challenge: Option<Challenge>,
    pub index: usize,
    pub total: usize,
    pub status: ChallengeStatus,
    pub percentage: f32,
    pub hearts: u32,
    pub points: u64,
    pub has_answer: bool,
    pub submitting: bool,
    pub hearts_exhausted: bool,
    pub last_error: Option<PracticeError>,
    pub is_complete: bool,
    /// Changes whenever the renderer must start from fresh input.
    pub mount_key: u64,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Attempt sent but not confirmed, kept so a re-send reuses its id.
#[derive(Debug, Clone, PartialEq)]
struct UnconfirmedAttempt {
    answer: AnswerPayload,
    attempt_id: Uuid,
}

/// Pure state of one lesson run. No I/O; `PracticeController` drives it.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    lesson_id: LessonId,
    title: String,
    mode: SessionMode,
    challenges: Vec<Challenge>,
    active_index: usize,
    pending_answer: Option<AnswerPayload>,
    status: ChallengeStatus,
    submitting: bool,
    percentage: f32,
    progress: ProgressCache,
    attempts: HashMap<ChallengeId, u32>,
    challenge_started_at: DateTime<Utc>,
    unconfirmed: Option<UnconfirmedAttempt>,
    hearts_exhausted: bool,
    last_error: Option<PracticeError>,
    finish_effect_fired: bool,
    mount_key: u64,
}

impl PracticeSession {
    /// `started_at` should come from the services layer clock.
    #[must_use]
    pub fn new(lesson: Lesson, progress: UserProgress, started_at: DateTime<Utc>) -> Self {
        let mode = lesson.mode();
        let lesson_id = lesson.id;
        let title = lesson.title.clone();
        Self {
            lesson_id,
            title,
            mode,
            challenges: lesson.into_challenges(),
            active_index: 0,
            pending_answer: None,
            status: ChallengeStatus::None,
            submitting: false,
            percentage: 0.0,
            progress: ProgressCache::new(progress),
            attempts: HashMap::new(),
            challenge_started_at: started_at,
            unconfirmed: None,
            hearts_exhausted: false,
            last_error: None,
            finish_effect_fired: false,
            mount_key: 0,
        }
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.challenges.len()
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    #[must_use]
    pub fn current_challenge(&self) -> Option<&Challenge> {
        self.challenges.get(self.active_index)
    }

    #[must_use]
    pub fn status(&self) -> ChallengeStatus {
        self.status
    }

    #[must_use]
    pub fn pending_answer(&self) -> Option<&AnswerPayload> {
        self.pending_answer.as_ref()
    }

    #[must_use]
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    #[must_use]
    pub fn progress(&self) -> &UserProgress {
        self.progress.current()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn hearts_exhausted(&self) -> bool {
        self.hearts_exhausted
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&PracticeError> {
        self.last_error.as_ref()
    }

    /// Attempts sent for `challenge` so far, transport retries excluded.
    #[must_use]
    pub fn attempts(&self, challenge: ChallengeId) -> u32 {
        self.attempts.get(&challenge).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.active_index >= self.challenges.len()
    }

    /// Records the answer for the active challenge.
    ///
    /// Ignored once feedback is showing, while a submission is in flight, or
    /// after completion. Returns whether the answer was taken.
    pub fn select_answer(&mut self, answer: AnswerPayload) -> bool {
        if self.status != ChallengeStatus::None || self.submitting || self.is_complete() {
            return false;
        }
        self.pending_answer = Some(answer);
        true
    }

    /// Drops the pending answer when the renderer's input became incomplete.
    pub fn clear_answer(&mut self) {
        if self.status == ChallengeStatus::None && !self.submitting {
            self.pending_answer = None;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Starts the submit action at `now`.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` after the last challenge,
    /// `SubmissionPending` while a request is in flight, `IncompleteAnswer`
    /// without a pending answer and `HeartsExhausted` for a first-pass attempt
    /// with no hearts left.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<SubmitStep, PracticeError> {
        if self.is_complete() {
            return Err(PracticeError::Completed);
        }
        if self.submitting {
            return Err(PracticeError::SubmissionPending);
        }

        match self.status {
            ChallengeStatus::Wrong => {
                self.status = ChallengeStatus::None;
                self.pending_answer = None;
                self.challenge_started_at = now;
                self.mount_key += 1;
                Ok(SubmitStep::Retry)
            }
            ChallengeStatus::Correct => {
                self.active_index += 1;
                self.status = ChallengeStatus::None;
                self.pending_answer = None;
                self.unconfirmed = None;
                self.last_error = None;
                self.challenge_started_at = now;
                self.mount_key += 1;
                Ok(SubmitStep::Advance)
            }
            ChallengeStatus::None => self.prepare_submission(now),
        }
    }

    fn prepare_submission(&mut self, now: DateTime<Utc>) -> Result<SubmitStep, PracticeError> {
        let answer = self
            .pending_answer
            .clone()
            .ok_or(PracticeError::IncompleteAnswer)?;
        let challenge_id = self
            .current_challenge()
            .map(|challenge| challenge.id)
            .ok_or(PracticeError::Completed)?;

        if self.mode == SessionMode::FirstPass && !self.progress.current().has_hearts() {
            self.hearts_exhausted = true;
            return Err(PracticeError::HeartsExhausted);
        }

        let attempt_id = match &self.unconfirmed {
            Some(unconfirmed) if unconfirmed.answer == answer => unconfirmed.attempt_id,
            _ => {
                *self.attempts.entry(challenge_id).or_insert(0) += 1;
                let attempt_id = Uuid::new_v4();
                self.unconfirmed = Some(UnconfirmedAttempt {
                    answer: answer.clone(),
                    attempt_id,
                });
                attempt_id
            }
        };

        let elapsed = (now - self.challenge_started_at).max(Duration::zero());
        self.submitting = true;
        self.last_error = None;
        Ok(SubmitStep::Send(ChallengeSubmission {
            challenge_id,
            answer,
            time_spent_secs: u32::try_from(elapsed.num_seconds()).unwrap_or(u32::MAX),
            attempts: self.attempts(challenge_id),
            attempt_id,
        }))
    }

    /// Applies a graded response for the in-flight attempt.
    pub fn apply_result(&mut self, result: SubmissionResult) {
        self.submitting = false;
        self.unconfirmed = None;

        if result.correct {
            self.status = ChallengeStatus::Correct;
            let step = 100.0 / self.total().max(1) as f32;
            self.percentage = (self.percentage + step).min(100.0);
        } else {
            self.status = ChallengeStatus::Wrong;
        }

        match result.progress {
            // already include the hearts_used deduction and the practice regain
            Some(counters) => self.progress.reconcile_counters(counters.hearts, counters.points),
            None => {
                let hearts = if result.correct {
                    i32::from(self.mode == SessionMode::Practice)
                } else {
                    -i32::try_from(result.hearts_used).unwrap_or(i32::MAX)
                };
                let next = self.progress.confirmed().apply(ProgressDelta::hearts(hearts));
                self.progress.reconcile(next);
            }
        }

        if !result.correct
            && self.mode == SessionMode::FirstPass
            && !self.progress.current().has_hearts()
        {
            self.hearts_exhausted = true;
        }
    }

    /// Applies a failed submission and returns the error to surface.
    pub fn apply_failure(&mut self, err: ApiError) -> PracticeError {
        self.submitting = false;
        self.progress.rollback();
        if !err.is_transient() {
            self.unconfirmed = None;
        }
        let err = PracticeError::from_api(err);
        if err == PracticeError::HeartsExhausted {
            self.hearts_exhausted = true;
        } else {
            self.last_error = Some(err.clone());
        }
        err
    }

    /// Shows `delta` until the backend confirms or rejects it.
    pub fn apply_optimistic(&mut self, delta: ProgressDelta) {
        self.progress.apply_optimistic(delta);
    }

    /// Confirms a hearts-only mutation.
    pub fn confirm_hearts(&mut self, hearts: u32) {
        let points = self.progress.confirmed().points;
        self.progress.reconcile_counters(hearts, points);
        if self.progress.current().has_hearts() {
            self.hearts_exhausted = false;
        }
    }

    /// Discards an unconfirmed hearts change and returns the error to surface.
    pub fn rollback_progress(&mut self, err: ApiError) -> PracticeError {
        self.progress.rollback();
        let err = PracticeError::from_api(err);
        if err == PracticeError::HeartsExhausted {
            self.hearts_exhausted = true;
        } else {
            self.last_error = Some(err.clone());
        }
        err
    }

    /// Adopts freshly fetched progress unless a mutation is unconfirmed.
    pub fn reconcile_progress(&mut self, server: UserProgress) -> bool {
        if self.submitting || self.progress.is_pending() {
            return false;
        }
        self.progress.reconcile(server);
        true
    }

    /// `true` exactly once, on the first call after completion.
    pub fn take_finish_effect(&mut self) -> bool {
        if self.is_complete() && !self.finish_effect_fired {
            self.finish_effect_fired = true;
            return true;
        }
        false
    }

    #[must_use]
    pub fn snapshot(&self) -> PracticeSnapshot {
        let progress = self.progress.current();
        PracticeSnapshot {
            lesson_id: self.lesson_id,
            title: self.title.clone(),
            mode: self.mode,
            challenge: self.current_challenge().cloned(),
            index: self.active_index,
            total: self.total(),
            status: self.status,
            percentage: self.percentage,
            hearts: progress.hearts(),
            points: progress.points,
            has_answer: self.pending_answer.is_some(),
            submitting: self.submitting,
            hearts_exhausted: self.hearts_exhausted,
            last_error: self.last_error.clone(),
            is_complete: self.is_complete(),
            mount_key: self.mount_key,
        }
    }
}
