use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gateway::demo::{DEMO_LESSON_ID, demo_lesson};
use gateway::memory::FailurePoint;
use gateway::{ApiError, ChallengeSubmission, InMemoryPracticeApi, PracticeApi, SubmissionResult};
use lingo_core::model::{
    AnswerKey, AnswerPayload, Challenge, ChallengeId, ChallengeKind, ChallengeOption, CourseId,
    Lesson, LessonId, OptionId, SpeechAnalysis, UserProgress,
};
use lingo_core::time::fixed_now;
use services::{
    ChallengeStatus, Clock, LessonBootstrap, PracticeController, PracticeError, PracticeService,
    SubmitOutcome,
};

/// Records every submission before handing it to the in-memory backend.
#[derive(Clone)]
struct RecordingApi {
    inner: InMemoryPracticeApi,
    submissions: Arc<Mutex<Vec<ChallengeSubmission>>>,
}

impl RecordingApi {
    fn new(inner: InMemoryPracticeApi) -> Self {
        Self {
            inner,
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn submissions(&self) -> Vec<ChallengeSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PracticeApi for RecordingApi {
    async fn lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        self.inner.lesson(id).await
    }

    async fn user_progress(&self) -> Result<Option<UserProgress>, ApiError> {
        self.inner.user_progress().await
    }

    async fn submit_challenge(
        &self,
        submission: &ChallengeSubmission,
    ) -> Result<SubmissionResult, ApiError> {
        self.submissions.lock().unwrap().push(submission.clone());
        self.inner.submit_challenge(submission).await
    }

    async fn use_heart(&self) -> Result<u32, ApiError> {
        self.inner.use_heart().await
    }

    async fn refill_hearts(&self) -> Result<u32, ApiError> {
        self.inner.refill_hearts().await
    }
}

fn progress(hearts: u32) -> UserProgress {
    UserProgress::new(hearts, 0, Some(CourseId::new(1)), 0)
}

fn two_challenge_lesson(completed: bool) -> Lesson {
    let select = Challenge::new(
        ChallengeId::new(1),
        LessonId::new(5),
        1,
        ChallengeKind::Select,
        "Which one of these is \"the man\"?",
    )
    .with_options(vec![
        ChallengeOption::new(OptionId::new(11), "el hombre", true),
        ChallengeOption::new(OptionId::new(12), "la mujer", false),
    ]);
    let translation = Challenge::new(
        ChallengeId::new(2),
        LessonId::new(5),
        2,
        ChallengeKind::Translation,
        "I am a student",
    )
    .with_options(vec![ChallengeOption::new(OptionId::new(21), "Soy estudiante", true)]);
    Lesson::new(LessonId::new(5), "Basics", vec![select, translation], completed)
}

fn backend(lesson: Lesson, hearts: u32) -> InMemoryPracticeApi {
    let api = InMemoryPracticeApi::new();
    api.insert_lesson(lesson).unwrap();
    api.set_progress(Some(progress(hearts))).unwrap();
    api
}

async fn start(api: Arc<dyn PracticeApi>, lesson_id: LessonId) -> PracticeController {
    let service = PracticeService::new(Clock::fixed(fixed_now()), api);
    match service.load_practice(lesson_id).await.unwrap() {
        LessonBootstrap::Ready(controller) => controller,
        other => panic!("expected a ready session, got {other:?}"),
    }
}

fn correct_answer(challenge: &Challenge) -> AnswerPayload {
    match challenge.answer_key().unwrap() {
        AnswerKey::Choice(id) => AnswerPayload::Choice(id),
        AnswerKey::Blanks(values) => AnswerPayload::blanks(values),
        AnswerKey::AnyText(texts) => AnswerPayload::Text(texts[0].clone()),
        AnswerKey::Ordered(ids) => AnswerPayload::Ordered(ids),
        AnswerKey::Pairs(pairs) => AnswerPayload::Pairs(pairs),
        AnswerKey::ScoreThreshold(_) => AnswerPayload::Speech(SpeechAnalysis {
            transcript: "buenos días".into(),
            score: 92,
            acceptable: true,
        }),
    }
}

#[tokio::test]
async fn two_challenge_lesson_runs_to_completion() {
    let api = backend(two_challenge_lesson(false), 5);
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;

    assert!(controller.select_answer(AnswerPayload::Choice(OptionId::new(11))));
    let outcome = controller.submit_answer().await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Graded { correct: true });
    let snap = controller.snapshot();
    assert_eq!(snap.status, ChallengeStatus::Correct);
    assert!((snap.percentage - 50.0).abs() < f32::EPSILON);
    assert_eq!(snap.hearts, 5);

    assert_eq!(controller.submit_answer().await.unwrap(), SubmitOutcome::Advanced);
    assert_eq!(controller.snapshot().index, 1);

    controller.select_answer(AnswerPayload::Text("soy maestro".into()));
    assert_eq!(
        controller.submit_answer().await.unwrap(),
        SubmitOutcome::Graded { correct: false }
    );
    let snap = controller.snapshot();
    assert_eq!(snap.status, ChallengeStatus::Wrong);
    assert_eq!(snap.hearts, 4);

    assert_eq!(controller.submit_answer().await.unwrap(), SubmitOutcome::Retry);
    controller.select_answer(AnswerPayload::Text("Soy estudiante".into()));
    controller.submit_answer().await.unwrap();
    let snap = controller.snapshot();
    assert_eq!(snap.status, ChallengeStatus::Correct);
    assert!((snap.percentage - 100.0).abs() < f32::EPSILON);

    assert_eq!(controller.submit_answer().await.unwrap(), SubmitOutcome::Completed);
    assert!(controller.is_complete());
    assert!(controller.take_finish_effect());
    assert!(!controller.take_finish_effect());
    assert_eq!(
        controller.submit_answer().await,
        Err(PracticeError::Completed)
    );
    assert_eq!(api.submissions_received().unwrap(), 3);
}

#[tokio::test]
async fn every_kind_sends_exactly_one_submission_with_its_shape() {
    let api = RecordingApi::new(backend(demo_lesson(), 5));
    let controller = start(Arc::new(api.clone()), DEMO_LESSON_ID).await;
    let lesson = demo_lesson();

    for challenge in lesson.challenges() {
        let answer = correct_answer(challenge);
        assert!(controller.select_answer(answer.clone()));
        let before = api.submissions().len();
        assert_eq!(
            controller.submit_answer().await.unwrap(),
            SubmitOutcome::Graded { correct: true },
            "{} graded wrong",
            challenge.kind
        );
        let sent = api.submissions();
        assert_eq!(sent.len(), before + 1);
        let last = sent.last().unwrap();
        assert_eq!(last.challenge_id, challenge.id);
        assert_eq!(last.answer, answer);
        assert_eq!(last.attempts, 1);

        controller.submit_answer().await.unwrap();
        assert_eq!(api.submissions().len(), before + 1, "continue must stay local");
    }

    assert!(controller.is_complete());
    assert_eq!(controller.snapshot().points, 90);
}

#[tokio::test]
async fn retry_keeps_index_hearts_and_points() {
    let api = backend(two_challenge_lesson(false), 5);
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;

    controller.select_answer(AnswerPayload::Choice(OptionId::new(12)));
    controller.submit_answer().await.unwrap();
    let wrong = controller.snapshot();

    controller.submit_answer().await.unwrap();
    let retried = controller.snapshot();
    assert_eq!(retried.status, ChallengeStatus::None);
    assert_eq!(retried.index, wrong.index);
    assert_eq!(retried.hearts, wrong.hearts);
    assert_eq!(retried.points, wrong.points);
    assert!(!retried.has_answer);
    assert_ne!(retried.mount_key, wrong.mount_key);
    assert_eq!(api.submissions_received().unwrap(), 1);
}

#[tokio::test]
async fn hearts_never_drop_below_zero() {
    let api = backend(two_challenge_lesson(false), 2);
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;

    for _ in 0..2 {
        controller.select_answer(AnswerPayload::Choice(OptionId::new(12)));
        controller.submit_answer().await.unwrap();
        controller.submit_answer().await.unwrap();
    }
    let snap = controller.snapshot();
    assert_eq!(snap.hearts, 0);
    assert!(snap.hearts_exhausted);

    controller.select_answer(AnswerPayload::Choice(OptionId::new(12)));
    assert_eq!(
        controller.submit_answer().await,
        Err(PracticeError::HeartsExhausted)
    );
    assert_eq!(controller.snapshot().hearts, 0);
    assert_eq!(api.submissions_received().unwrap(), 2);
}

#[tokio::test]
async fn backend_refusal_raises_the_hearts_signal() {
    let api = backend(two_challenge_lesson(false), 3);
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;
    api.fail_next_submit(FailurePoint::BeforeApply, ApiError::HeartsExhausted)
        .unwrap();

    controller.select_answer(AnswerPayload::Choice(OptionId::new(11)));
    assert_eq!(
        controller.submit_answer().await,
        Err(PracticeError::HeartsExhausted)
    );
    let snap = controller.snapshot();
    assert!(snap.hearts_exhausted);
    assert_eq!(snap.status, ChallengeStatus::None);
    assert!(snap.last_error.is_none());
}

#[tokio::test]
async fn lost_response_is_not_charged_twice() {
    let api = RecordingApi::new(backend(two_challenge_lesson(false), 5));
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;
    api.inner
        .fail_next_submit(FailurePoint::AfterApply, ApiError::Transport("reset".into()))
        .unwrap();

    controller.select_answer(AnswerPayload::Choice(OptionId::new(12)));
    let err = controller.submit_answer().await.unwrap_err();
    assert!(matches!(err, PracticeError::Api(ApiError::Transport(_))));
    let snap = controller.snapshot();
    assert_eq!(snap.status, ChallengeStatus::None);
    assert!(snap.has_answer);
    assert!(snap.last_error.is_some());

    controller.submit_answer().await.unwrap();
    assert_eq!(controller.snapshot().hearts, 4);
    assert_eq!(api.inner.submissions_applied().unwrap(), 1);

    let sent = api.submissions();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].attempt_id, sent[1].attempt_id);
}

#[tokio::test]
async fn practice_mode_regains_hearts() {
    let api = backend(two_challenge_lesson(true), 3);
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;

    controller.select_answer(AnswerPayload::Choice(OptionId::new(11)));
    controller.submit_answer().await.unwrap();
    assert_eq!(controller.snapshot().hearts, 4);
}

#[tokio::test]
async fn refill_rolls_back_on_failure_and_clears_the_signal_on_success() {
    let api = backend(two_challenge_lesson(false), 0);
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;
    controller.select_answer(AnswerPayload::Choice(OptionId::new(11)));
    let _ = controller.submit_answer().await;
    assert!(controller.snapshot().hearts_exhausted);

    api.fail_next_hearts_call(ApiError::Status(500)).unwrap();
    assert!(controller.refill_hearts().await.is_err());
    let snap = controller.snapshot();
    assert_eq!(snap.hearts, 0);
    assert!(snap.hearts_exhausted);

    assert_eq!(controller.refill_hearts().await, Ok(5));
    let snap = controller.snapshot();
    assert_eq!(snap.hearts, 5);
    assert!(!snap.hearts_exhausted);

    assert_eq!(controller.use_heart().await, Ok(4));
    assert_eq!(controller.snapshot().hearts, 4);
}

#[tokio::test]
async fn failed_refresh_does_not_fail_the_submission() {
    let api = backend(two_challenge_lesson(false), 5);
    let controller = start(Arc::new(api.clone()), LessonId::new(5)).await;
    api.fail_next_progress(ApiError::Transport("timeout".into()))
        .unwrap();

    controller.select_answer(AnswerPayload::Choice(OptionId::new(12)));
    assert_eq!(
        controller.submit_answer().await,
        Ok(SubmitOutcome::Graded { correct: false })
    );
    assert_eq!(controller.snapshot().hearts, 4);
}

#[tokio::test]
async fn load_practice_routes_missing_data() {
    let api = backend(two_challenge_lesson(false), 5);
    let service = PracticeService::new(Clock::fixed(fixed_now()), Arc::new(api.clone()));

    assert!(matches!(
        service.load_practice(LessonId::new(404)).await,
        Ok(LessonBootstrap::LessonMissing)
    ));

    api.set_progress(Some(UserProgress::new(5, 0, None, 0))).unwrap();
    assert!(matches!(
        service.load_practice(LessonId::new(5)).await,
        Ok(LessonBootstrap::NeedsCourse)
    ));

    api.set_progress(None).unwrap();
    assert!(matches!(
        service.load_practice(LessonId::new(5)).await,
        Ok(LessonBootstrap::NeedsCourse)
    ));

    api.insert_lesson(Lesson::new(LessonId::new(6), "Empty", vec![], false))
        .unwrap();
    api.set_progress(Some(progress(5))).unwrap();
    assert!(matches!(
        service.load_practice(LessonId::new(6)).await,
        Ok(LessonBootstrap::LessonMissing)
    ));

    api.fail_next_progress(ApiError::Unauthorized).unwrap();
    assert_eq!(
        service.load_practice(LessonId::new(5)).await.unwrap_err(),
        PracticeError::Api(ApiError::Unauthorized)
    );
}
