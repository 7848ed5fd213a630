use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use lingo_core::model::LessonId;

use super::components::{
    CompletionScreen, ErrorToast, HeartsModal, LessonFooter, LessonHeader,
};
use super::scripts::finish_script;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ChallengeBody, ViewError, ViewState, view_state_from_resource};
use crate::vm::{LessonLanding, PracticeFooterVm, PracticeHeaderVm, PracticeVm, start_lesson};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const ERROR_TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LessonIntent {
    /// Footer action: check, retry or continue.
    Submit,
    RefillHearts,
    EndSession,
    DismissError,
    /// Leave the completion screen.
    Continue,
}

/// Everything the page renders, read from the vm in one borrow.
struct LessonPage {
    header: PracticeHeaderVm,
    footer: PracticeFooterVm,
    mount_key: String,
    error: Option<ViewError>,
    complete: bool,
    exhausted: bool,
    title: String,
    points: u64,
    hearts: u32,
}

impl LessonPage {
    fn from_vm(vm: &PracticeVm) -> Self {
        let snapshot = vm.snapshot();
        Self {
            header: vm.header(),
            footer: vm.footer(),
            mount_key: vm.mount_key(),
            error: vm.error(),
            complete: snapshot.is_complete,
            exhausted: snapshot.hearts_exhausted,
            title: snapshot.title.clone(),
            points: snapshot.points,
            hearts: snapshot.hearts,
        }
    }
}

fn refresh(mut vm: Signal<Option<PracticeVm>>) {
    if let Some(state) = vm.write().as_mut() {
        state.refresh();
    }
}

#[component]
pub fn LessonView(lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let practice = ctx.practice();

    let vm = use_signal(|| None::<PracticeVm>);
    let busy = use_signal(|| false);

    let resource = use_resource(move || {
        let practice = practice.clone();
        let mut vm = vm;
        async move {
            let (landing, started) = start_lesson(&practice, LessonId::new(lesson_id)).await?;
            match landing {
                LessonLanding::Ready => vm.set(started),
                LessonLanding::NeedsCourse => {
                    let _ = navigator.replace(Route::Courses {});
                }
                LessonLanding::LessonMissing => {
                    let _ = navigator.replace(Route::Learn {});
                }
            }
            Ok::<_, ViewError>(landing)
        }
    });
    let state = view_state_from_resource(&resource);

    use_effect(move || {
        let complete = vm
            .read()
            .as_ref()
            .is_some_and(|state| state.snapshot().is_complete);
        if !complete {
            return;
        }
        let fire = vm
            .peek()
            .as_ref()
            .is_some_and(|state| state.controller().take_finish_effect());
        if fire {
            let _ = eval(&finish_script());
        }
    });

    use_effect(move || {
        let shown = vm
            .read()
            .as_ref()
            .and_then(|state| state.snapshot().last_error.clone());
        let Some(shown) = shown else {
            return;
        };
        let mut vm = vm;
        spawn(async move {
            tokio::time::sleep(ERROR_TOAST_TTL).await;
            let mut guard = vm.write();
            let Some(state) = guard.as_mut() else {
                return;
            };
            if state.snapshot().last_error.as_ref() == Some(&shown) {
                state.dismiss_error();
            }
        });
    });

    let dispatch = use_callback(move |intent: LessonIntent| {
        let mut busy = busy;
        let mut vm = vm;
        match intent {
            LessonIntent::Submit | LessonIntent::RefillHearts => {
                if busy() {
                    return;
                }
                let Some(controller) = vm.read().as_ref().map(PracticeVm::controller) else {
                    return;
                };
                busy.set(true);
                spawn(async move {
                    if intent == LessonIntent::Submit {
                        match controller.submit_answer().await {
                            Ok(outcome) => tracing::debug!(?outcome, "footer action"),
                            Err(err) => tracing::debug!(error = %err, "footer action refused"),
                        }
                    } else if let Err(err) = controller.refill_hearts().await {
                        tracing::warn!(error = %err, "refill failed");
                    }
                    refresh(vm);
                    busy.set(false);
                });
            }
            LessonIntent::DismissError => {
                if let Some(state) = vm.write().as_mut() {
                    state.dismiss_error();
                }
            }
            LessonIntent::EndSession | LessonIntent::Continue => {
                let _ = navigator.push(Route::Learn {});
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<LessonTestHandles>() {
                handles.register(dispatch, vm);
            }
        }
    }

    let on_key = move |evt: KeyboardEvent| {
        if evt.data.key() != Key::Enter || busy() {
            return;
        }
        let enabled = vm.read().as_ref().is_some_and(|state| {
            !state.snapshot().is_complete
                && !state.snapshot().hearts_exhausted
                && state.footer().enabled
        });
        if enabled {
            evt.prevent_default();
            dispatch.call(LessonIntent::Submit);
        }
    };

    let page = vm.read().as_ref().map(LessonPage::from_vm);

    rsx! {
        div { class: "page lesson-page", id: "lesson-root", tabindex: "0", onkeydown: on_key,
            match (state, page) {
                (ViewState::Idle | ViewState::Loading, _) => rsx! {
                    p { class: "lesson-page__status", "Loading..." }
                },
                (ViewState::Error(err), _) => rsx! {
                    p { class: "lesson-page__status", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                (ViewState::Ready(_), None) => rsx! {},
                (ViewState::Ready(_), Some(page)) => rsx! {
                    if page.complete {
                        CompletionScreen {
                            title: page.title,
                            points: page.points,
                            hearts: page.hearts,
                            on_continue: move |()| dispatch.call(LessonIntent::Continue),
                        }
                    } else {
                        LessonHeader {
                            header: page.header,
                            on_quit: move |()| dispatch.call(LessonIntent::EndSession),
                        }
                        div { class: "lesson-page__body",
                            ChallengeBody { key: "{page.mount_key}", vm }
                        }
                        LessonFooter {
                            footer: page.footer,
                            busy: busy(),
                            on_submit: move |()| dispatch.call(LessonIntent::Submit),
                        }
                        if page.exhausted {
                            HeartsModal {
                                busy: busy(),
                                on_refill: move |()| dispatch.call(LessonIntent::RefillHearts),
                                on_end: move |()| dispatch.call(LessonIntent::EndSession),
                            }
                        }
                    }
                    if let Some(err) = page.error {
                        ErrorToast {
                            message: err.message(),
                            on_dismiss: move |()| dispatch.call(LessonIntent::DismissError),
                        }
                    }
                },
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct LessonTestHandles {
    dispatch: Rc<RefCell<Option<Callback<LessonIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<PracticeVm>>>>>,
}

#[cfg(test)]
impl LessonTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<LessonIntent>,
        vm: Signal<Option<PracticeVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<LessonIntent> {
        (*self.dispatch.borrow()).expect("lesson dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<PracticeVm>> {
        (*self.vm.borrow()).expect("lesson vm registered")
    }
}
