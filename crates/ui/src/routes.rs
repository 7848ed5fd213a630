use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{CoursesView, LearnView, LessonView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LearnView)] Learn {},
        #[route("/courses", CoursesView)] Courses {},
    #[end_layout]
    #[route("/lesson/:lesson_id", LessonView)] Lesson { lesson_id: u64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Lingo" }
            ul {
                li { Link { to: Route::Learn {}, "Learn" } }
                li { Link { to: Route::Courses {}, "Courses" } }
            }
        }
    }
}
