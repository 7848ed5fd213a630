use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// Landing page for learners without an active course.
#[component]
pub fn CoursesView() -> Element {
    let ctx = use_context::<AppContext>();
    let lesson_id = ctx.start_lesson().value();
    let practice = ctx.practice();

    let resource = use_resource(move || {
        let practice = practice.clone();
        async move {
            let progress = practice.user_progress().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(progress.and_then(|progress| progress.active_course))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page courses-page",
            h2 { "Courses" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "page__error", "{err.message()}" }
                },
                ViewState::Ready(Some(course)) => rsx! {
                    p { "You're enrolled in course #{course}." }
                    Link { class: "btn btn-primary", to: Route::Lesson { lesson_id }, "Continue learning" }
                },
                ViewState::Ready(None) => rsx! {
                    p { "You haven't started a course yet." }
                    p { class: "courses-page__hint", "Enroll on the web and come back to practice here." }
                },
            }
        }
    }
}
