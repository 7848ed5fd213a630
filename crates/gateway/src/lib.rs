#![forbid(unsafe_code)]

pub mod api;
pub mod cached;
pub mod demo;
pub mod error;
pub mod http;
pub mod memory;
mod wire;

pub use api::{ChallengeSubmission, PracticeApi, ProgressCounters, SubmissionResult};
pub use cached::CachedPracticeApi;
pub use error::ApiError;
pub use http::{HttpConfig, HttpPracticeApi};
pub use memory::InMemoryPracticeApi;
