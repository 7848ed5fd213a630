use thiserror::Error;

/// Errors surfaced by practice API adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("not authorized")]
    Unauthorized,

    /// The backend refused a graded attempt because no hearts are left.
    #[error("no hearts left")]
    HeartsExhausted,

    #[error("request rejected: {0}")]
    Validation(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the same request may succeed if sent again unchanged.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(code) => *code >= 500,
            _ => false,
        }
    }

    /// Maps a non-success HTTP status and its body to an error.
    ///
    /// Authorization and validation responses that talk about hearts mean the
    /// backend refused the attempt for lack of hearts.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let mentions_hearts = body.to_ascii_lowercase().contains("heart");
        match status {
            404 => Self::NotFound,
            400 | 403 if mentions_hearts => Self::HeartsExhausted,
            401 | 403 => Self::Unauthorized,
            400..=499 => Self::Validation(summarize_body(body)),
            _ => Self::Status(status),
        }
    }
}

fn summarize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(200).collect()
}
