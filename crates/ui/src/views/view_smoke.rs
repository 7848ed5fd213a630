use std::sync::Arc;

use gateway::demo::{DEMO_COURSE_ID, DEMO_LESSON_ID};
use gateway::memory::FailurePoint;
use gateway::{ApiError, InMemoryPracticeApi};
use lingo_core::input::ChallengeInput;
use lingo_core::model::{
    Challenge, ChallengeId, ChallengeKind, ChallengeOption, Lesson, LessonId, OptionId,
    UserProgress,
};

use super::lesson::LessonIntent;
use super::test_harness::{ViewHarness, ViewKind, setup_view_harness, setup_view_harness_with_api};

fn pick_option(harness: &ViewHarness, id: u64) {
    let accepted = harness.with_vm(|vm| {
        vm.update_input(|input| {
            if let ChallengeInput::Choice(choice) = input {
                choice.select(OptionId::new(id));
            }
        })
    });
    assert_eq!(accepted, Some(true), "input should be editable");
}

async fn open_demo_lesson() -> ViewHarness {
    let mut harness = setup_view_harness(ViewKind::Lesson(DEMO_LESSON_ID.value()));
    harness.rebuild();
    harness.settle().await;
    harness
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_renders_first_challenge() {
    let harness = open_demo_lesson().await;
    let html = harness.render();
    assert!(html.contains("Which one of these is"), "missing question in {html}");
    assert!(html.contains("el hombre"), "missing option in {html}");
    assert!(html.contains("Check"), "missing footer action in {html}");
    assert!(html.contains("5/5"), "missing hearts in {html}");
    assert!(html.contains("1 of 9"), "missing progress in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_grades_a_correct_answer() {
    let mut harness = open_demo_lesson().await;
    pick_option(&harness, 101);
    harness.drive_async().await;
    harness.dispatch(LessonIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Nicely done!"), "missing feedback in {html}");
    assert!(html.contains("Continue"), "missing continue in {html}");
    assert!(html.contains("lesson-footer--correct"), "missing tone in {html}");
    assert_eq!(harness.api.submissions_received().expect("count"), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_wrong_answer_offers_retry() {
    let mut harness = open_demo_lesson().await;
    pick_option(&harness, 102);
    harness.dispatch(LessonIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(html.contains("4/5"), "missing heart loss in {html}");

    harness.dispatch(LessonIntent::Submit);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Check"), "missing fresh attempt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_shows_hearts_modal_and_refills() {
    let api = Arc::new(InMemoryPracticeApi::with_demo_content().expect("demo"));
    api.set_progress(Some(UserProgress::new(0, 10, Some(DEMO_COURSE_ID), 0)))
        .expect("progress");
    let mut harness = setup_view_harness_with_api(ViewKind::Lesson(DEMO_LESSON_ID.value()), api);
    harness.rebuild();
    harness.settle().await;

    pick_option(&harness, 101);
    harness.dispatch(LessonIntent::Submit);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("You ran out of hearts!"), "missing modal in {html}");
    assert!(html.contains("Refill hearts"), "missing refill in {html}");
    assert_eq!(harness.api.submissions_received().expect("count"), 0);

    harness.dispatch(LessonIntent::RefillHearts);
    harness.settle().await;
    let html = harness.render();
    assert!(!html.contains("You ran out of hearts!"), "modal still open in {html}");
    assert!(html.contains("5/5"), "missing refilled hearts in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_surfaces_transport_errors() {
    let api = Arc::new(InMemoryPracticeApi::with_demo_content().expect("demo"));
    api.fail_next_submit(FailurePoint::BeforeApply, ApiError::Transport("down".into()))
        .expect("queue failure");
    let mut harness = setup_view_harness_with_api(ViewKind::Lesson(DEMO_LESSON_ID.value()), api);
    harness.rebuild();
    harness.settle().await;

    pick_option(&harness, 101);
    harness.dispatch(LessonIntent::Submit);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("reach the server"), "missing toast in {html}");
    assert!(html.contains("5/5"), "hearts should be untouched in {html}");

    harness.dispatch(LessonIntent::DismissError);
    harness.drive_async().await;
    let html = harness.render();
    assert!(!html.contains("toast--error"), "toast still visible in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_renders_completion_screen() {
    let lesson_id = LessonId::new(42);
    let challenge = Challenge::new(
        ChallengeId::new(4201),
        lesson_id,
        1,
        ChallengeKind::Select,
        "Which one is **\"water\"**?",
    )
    .with_options(vec![
        ChallengeOption::new(OptionId::new(1), "el agua", true),
        ChallengeOption::new(OptionId::new(2), "el pan", false),
    ]);
    let api = Arc::new(InMemoryPracticeApi::with_demo_content().expect("demo"));
    api.insert_lesson(Lesson::new(lesson_id, "Drinks", vec![challenge], false))
        .expect("lesson");
    let mut harness = setup_view_harness_with_api(ViewKind::Lesson(lesson_id.value()), api);
    harness.rebuild();
    harness.settle().await;

    pick_option(&harness, 1);
    harness.dispatch(LessonIntent::Submit);
    harness.settle().await;
    assert!(harness.render().contains("Finish"));

    harness.dispatch(LessonIntent::Submit);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Lesson complete!"), "missing completion in {html}");
    assert!(html.contains("Drinks"), "missing lesson title in {html}");
    assert!(!html.contains("lesson-check"), "footer should be gone in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_smoke_links_to_the_lesson() {
    let mut harness = setup_view_harness(ViewKind::Learn);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Start lesson"), "missing start link in {html}");
    assert!(html.contains("0 XP"), "missing points in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_smoke_without_progress_points_to_courses() {
    let api = Arc::new(InMemoryPracticeApi::with_demo_content().expect("demo"));
    api.set_progress(None).expect("progress");
    let mut harness = setup_view_harness_with_api(ViewKind::Learn, api);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Choose a course"), "missing course link in {html}");
    assert!(!html.contains("Start lesson"), "unexpected start link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn courses_view_smoke_shows_active_course() {
    let mut harness = setup_view_harness(ViewKind::Courses);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("course #1"), "missing course in {html}");
}
