use std::sync::Arc;

use lingo_core::model::{LessonId, MediaSrc};
use services::{AudioSession, PracticeService};
use url::Url;

pub trait UiApp: Send + Sync {
    /// Lesson opened from the learning hub.
    fn start_lesson(&self) -> LessonId;
    /// Origin that relative media paths are resolved against.
    fn media_origin(&self) -> Url;

    fn practice(&self) -> Arc<PracticeService>;
    fn audio(&self) -> AudioSession;
}

#[derive(Clone)]
pub struct AppContext {
    start_lesson: LessonId,
    media_origin: Url,

    practice: Arc<PracticeService>,
    audio: AudioSession,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            start_lesson: app.start_lesson(),
            media_origin: app.media_origin(),
            practice: app.practice(),
            audio: app.audio(),
        }
    }

    #[must_use]
    pub fn start_lesson(&self) -> LessonId {
        self.start_lesson
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn audio(&self) -> AudioSession {
        self.audio.clone()
    }

    /// Absolute URL for a challenge image or clip, `None` if it cannot resolve.
    #[must_use]
    pub fn media_url(&self, src: &MediaSrc) -> Option<String> {
        src.resolve(&self.media_origin).map(String::from)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
