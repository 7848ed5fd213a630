mod controller;
mod service;
mod state;

// Public API of the practice session subsystem.
pub use crate::error::PracticeError;
pub use controller::{PracticeController, SubmitOutcome};
pub use service::{LessonBootstrap, PracticeService};
pub use state::{ChallengeStatus, PracticeSession, PracticeSnapshot, SubmitStep};
