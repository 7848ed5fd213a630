use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use gateway::InMemoryPracticeApi;
use gateway::demo::DEMO_LESSON_ID;
use lingo_core::model::LessonId;
use lingo_core::time::fixed_now;
use services::{AudioSession, Clock, PracticeService};
use url::Url;

use crate::context::{UiApp, build_app_context};
use crate::views::lesson::{LessonIntent, LessonTestHandles};
use crate::views::{CoursesView, LearnView, LessonView};
use crate::vm::PracticeVm;

struct TestApp {
    practice: Arc<PracticeService>,
    audio: AudioSession,
}

impl UiApp for TestApp {
    fn start_lesson(&self) -> LessonId {
        DEMO_LESSON_ID
    }

    fn media_origin(&self) -> Url {
        Url::parse("http://localhost:8000/").expect("test origin")
    }

    fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    fn audio(&self) -> AudioSession {
        self.audio.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Learn,
    Courses,
    Lesson(u64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    lesson_handles: LessonTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.lesson_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Learn => rsx! { LearnView {} },
        ViewKind::Courses => rsx! { CoursesView {} },
        ViewKind::Lesson(lesson_id) => rsx! { LessonView { lesson_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: Arc<InMemoryPracticeApi>,
    lesson_handles: LessonTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Runs pending tasks until the lesson page settles.
    pub async fn settle(&mut self) {
        for _ in 0..6 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn dispatch(&self, intent: LessonIntent) {
        let dispatch = self.lesson_handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
    }

    /// Mutates the mounted lesson through its view model.
    pub fn with_vm<R>(&self, f: impl FnOnce(&mut PracticeVm) -> R) -> Option<R> {
        let mut vm = self.lesson_handles.vm();
        self.dom
            .in_runtime(|| vm.write().as_mut().map(f))
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let api = Arc::new(InMemoryPracticeApi::with_demo_content().expect("demo content"));
    setup_view_harness_with_api(view, api)
}

pub fn setup_view_harness_with_api(view: ViewKind, api: Arc<InMemoryPracticeApi>) -> ViewHarness {
    let practice = Arc::new(PracticeService::new(
        Clock::fixed(fixed_now()),
        Arc::clone(&api) as Arc<dyn gateway::PracticeApi>,
    ));
    let app = Arc::new(TestApp {
        practice,
        audio: AudioSession::silent(),
    });
    let lesson_handles = LessonTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            lesson_handles: lesson_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        api,
        lesson_handles,
    }
}
