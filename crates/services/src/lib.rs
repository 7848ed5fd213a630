#![forbid(unsafe_code)]

pub mod app_services;
pub mod audio;
pub mod config;
pub mod error;
pub mod sessions;

pub use lingo_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use audio::{AudioLease, AudioSession, AudioSink, SilentAudioSink};
pub use config::{DataSource, PracticeConfig};
pub use error::{AppServicesError, ConfigError, PracticeError};
pub use sessions::{
    ChallengeStatus, LessonBootstrap, PracticeController, PracticeService, PracticeSnapshot,
    SubmitOutcome,
};
