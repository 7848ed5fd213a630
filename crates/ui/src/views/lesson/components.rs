use dioxus::prelude::*;

use crate::vm::{PracticeFooterVm, PracticeHeaderVm};

#[component]
pub(super) fn LessonHeader(header: PracticeHeaderVm, on_quit: EventHandler<()>) -> Element {
    let hearts_class = if header.hearts_empty {
        "lesson-header__hearts lesson-header__hearts--empty"
    } else {
        "lesson-header__hearts"
    };
    rsx! {
        header { class: "lesson-header",
            button {
                class: "lesson-header__quit",
                id: "lesson-quit",
                r#type: "button",
                aria_label: "Quit lesson",
                onclick: move |_| on_quit.call(()),
                "✕"
            }
            div {
                class: "lesson-progress",
                role: "progressbar",
                aria_label: "{header.progress_label}",
                div { class: "lesson-progress__fill", style: "width: {header.progress_width}" }
            }
            if let Some(badge) = header.practice_badge {
                span { class: "lesson-header__badge", "{badge}" }
            }
            span { class: "{hearts_class}", "♥ {header.hearts_label}" }
            span { class: "lesson-header__points", "{header.points_label}" }
        }
    }
}

#[component]
pub(super) fn LessonFooter(
    footer: PracticeFooterVm,
    busy: bool,
    on_submit: EventHandler<()>,
) -> Element {
    rsx! {
        footer { class: footer.tone.class(),
            if let Some(feedback) = footer.feedback {
                p { class: "lesson-footer__feedback", role: "status", "{feedback}" }
            }
            button {
                class: "lesson-footer__action",
                id: "lesson-check",
                r#type: "button",
                disabled: busy || !footer.enabled,
                onclick: move |_| on_submit.call(()),
                "{footer.label}"
            }
        }
    }
}

#[component]
pub(super) fn ErrorToast(message: &'static str, on_dismiss: EventHandler<()>) -> Element {
    rsx! {
        div { class: "toast toast--error", role: "alert",
            span { class: "toast__message", "{message}" }
            button {
                class: "toast__close",
                r#type: "button",
                aria_label: "Dismiss",
                onclick: move |_| on_dismiss.call(()),
                "✕"
            }
        }
    }
}

/// Blocks the session until hearts are refilled or the learner leaves.
#[component]
pub(super) fn HeartsModal(
    busy: bool,
    on_refill: EventHandler<()>,
    on_end: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-backdrop",
            div {
                class: "modal hearts-modal",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "hearts-modal-title",
                h2 { class: "modal__title", id: "hearts-modal-title", "You ran out of hearts!" }
                p { class: "modal__body", "Refill your hearts to keep practicing, or end the session for now." }
                div { class: "modal__actions",
                    button {
                        class: "btn btn-primary",
                        id: "hearts-refill",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| on_refill.call(()),
                        if busy { "Refilling…" } else { "Refill hearts" }
                    }
                    button {
                        class: "btn btn-ghost",
                        id: "hearts-end",
                        r#type: "button",
                        onclick: move |_| on_end.call(()),
                        "End session"
                    }
                }
            }
        }
    }
}

#[component]
pub(super) fn CompletionScreen(
    title: String,
    points: u64,
    hearts: u32,
    on_continue: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "lesson-complete", id: "lesson-complete",
            h2 { class: "lesson-complete__title", "Lesson complete!" }
            p { class: "lesson-complete__subtitle", "{title}" }
            div { class: "lesson-complete__stats",
                div { class: "lesson-complete__stat lesson-complete__stat--points",
                    span { class: "lesson-complete__value", "{points}" }
                    span { class: "lesson-complete__label", "Total XP" }
                }
                div { class: "lesson-complete__stat lesson-complete__stat--hearts",
                    span { class: "lesson-complete__value", "{hearts}" }
                    span { class: "lesson-complete__label", "Hearts left" }
                }
            }
            button {
                class: "btn btn-primary lesson-complete__continue",
                id: "lesson-continue",
                r#type: "button",
                onclick: move |_| on_continue.call(()),
                "Continue"
            }
        }
    }
}
