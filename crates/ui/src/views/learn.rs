use dioxus::prelude::*;
use dioxus_router::Link;
use lingo_core::model::MAX_HEARTS;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq, Eq)]
struct HubData {
    hearts: u32,
    points: u64,
    streak: u32,
    has_course: bool,
}

/// Learning hub: progress at a glance and the way into the next lesson.
#[component]
pub fn LearnView() -> Element {
    let ctx = use_context::<AppContext>();
    let lesson_id = ctx.start_lesson().value();
    let practice = ctx.practice();

    let mut resource = use_resource(move || {
        let practice = practice.clone();
        async move {
            let progress = practice.user_progress().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(progress.map_or(
                HubData {
                    hearts: MAX_HEARTS,
                    points: 0,
                    streak: 0,
                    has_course: false,
                },
                |progress| HubData {
                    hearts: progress.hearts(),
                    points: progress.points,
                    streak: progress.streak,
                    has_course: progress.active_course.is_some(),
                },
            ))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page learn-page",
            h2 { "Learn" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "page__error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
                ViewState::Ready(data) => rsx! {
                    div { class: "learn-stats",
                        span { class: "learn-stats__item learn-stats__hearts", "♥ {data.hearts}" }
                        span { class: "learn-stats__item learn-stats__points", "{data.points} XP" }
                        span { class: "learn-stats__item learn-stats__streak", "🔥 {data.streak}" }
                    }
                    if data.has_course {
                        Link {
                            class: "btn btn-primary learn-start",
                            to: Route::Lesson { lesson_id },
                            "Start lesson"
                        }
                    } else {
                        p { "Pick a course to start learning." }
                        Link { class: "btn btn-primary", to: Route::Courses {}, "Choose a course" }
                    }
                },
            }
        }
    }
}
