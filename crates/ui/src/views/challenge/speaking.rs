use dioxus::document::eval;
use dioxus::prelude::*;
use lingo_core::input::ChallengeInput;
use lingo_core::model::SpeechAnalysis;
use lingo_core::text::MAX_FIELD_CHARS;
use serde::Deserialize;

use super::edit_input;
use crate::views::lesson::speech_recognition_script;
use crate::vm::PracticeVm;

/// Message posted back by the recognition script.
#[derive(Debug, Deserialize)]
struct SpeechMessage {
    transcript: Option<String>,
    confidence: Option<f32>,
    error: Option<String>,
}

fn record(vm: Signal<Option<PracticeVm>>, transcript: &str, confidence: Option<f32>) {
    edit_input(vm, |input| {
        if let ChallengeInput::Speaking(speaking) = input {
            speaking.record(transcript, confidence);
        }
    });
}

fn recognition_error(code: &str) -> &'static str {
    match code {
        "unsupported" => "Speech recognition isn't available here. Type the sentence instead.",
        "not-allowed" | "service-not-allowed" => "Microphone access was denied.",
        "no-speech" => "We didn't hear anything. Try again.",
        _ => "Recording failed. Try again.",
    }
}

/// SPEAKING: record through the webview's speech recognizer, or type what
/// was said; the transcript is scored against the expected phrase.
#[component]
pub fn SpeakingChallenge(vm: Signal<Option<PracticeVm>>) -> Element {
    let mut recording = use_signal(|| false);
    let mut mic_error = use_signal(|| None::<&'static str>);
    let mut typed = use_signal(String::new);

    let (expected, analysis, locked) = {
        let guard = vm.read();
        let Some(state) = guard.as_ref() else {
            return rsx! {};
        };
        let ChallengeInput::Speaking(speaking) = state.input() else {
            return rsx! {};
        };
        (
            speaking.expected().to_string(),
            speaking.analysis().cloned(),
            state.is_locked(),
        )
    };

    let start = move |_: MouseEvent| {
        if recording() {
            return;
        }
        recording.set(true);
        mic_error.set(None);
        let mut recording = recording;
        let mut mic_error = mic_error;
        spawn(async move {
            let mut recognizer = eval(&speech_recognition_script());
            match recognizer.recv::<SpeechMessage>().await {
                Ok(SpeechMessage {
                    transcript: Some(transcript),
                    confidence,
                    ..
                }) => record(vm, &transcript, confidence),
                Ok(SpeechMessage { error, .. }) => {
                    mic_error.set(Some(recognition_error(error.as_deref().unwrap_or_default())));
                }
                Err(err) => {
                    tracing::warn!(error = ?err, "speech recognition unavailable");
                    mic_error.set(Some(recognition_error("unsupported")));
                }
            }
            recording.set(false);
        });
    };

    rsx! {
        p { class: "speaking__expected", "“{expected}”" }
        div { class: "speaking__controls",
            button {
                class: if recording() { "speaking__record speaking__record--live" } else { "speaking__record" },
                id: "challenge-record",
                r#type: "button",
                disabled: locked || recording(),
                onclick: start,
                if recording() { "Listening…" } else { "🎤 Tap to speak" }
            }
            if analysis.is_some() && !locked {
                button {
                    class: "speaking__reset",
                    r#type: "button",
                    onclick: move |_| {
                        typed.set(String::new());
                        edit_input(vm, |input| {
                            if let ChallengeInput::Speaking(speaking) = input {
                                speaking.clear();
                            }
                        });
                    },
                    "Try again"
                }
            }
        }
        if let Some(message) = mic_error() {
            p { class: "speaking__error", role: "alert", "{message}" }
        }
        input {
            class: "speaking__typed",
            r#type: "text",
            placeholder: "Or type what you said",
            aria_label: "Typed transcript",
            maxlength: "{MAX_FIELD_CHARS}",
            disabled: locked,
            value: "{typed}",
            oninput: move |evt: FormEvent| {
                let value = evt.value();
                record(vm, &value, None);
                typed.set(value);
            },
        }
        if let Some(analysis) = analysis {
            SpeechResult { analysis }
        }
    }
}

#[component]
fn SpeechResult(analysis: SpeechAnalysis) -> Element {
    let verdict = if analysis.acceptable {
        "Sounds good!"
    } else {
        "Not quite there yet."
    };
    rsx! {
        div {
            class: if analysis.acceptable { "speaking__result speaking__result--ok" } else { "speaking__result" },
            p { "You said: “{analysis.transcript}”" }
            p { "Pronunciation score: {analysis.score}/100 · {verdict}" }
        }
    }
}
