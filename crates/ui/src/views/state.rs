use dioxus::prelude::*;
use gateway::ApiError;
use services::PracticeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The backend could not be reached or timed out.
    Offline,
    Unauthorized,
    NotFound,
    HeartsExhausted,
    /// The backend rejected the request as invalid.
    Rejected,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Offline => "Can't reach the server. Check your connection and try again.",
            Self::Unauthorized => "Your session has expired. Please sign in again.",
            Self::NotFound => "We couldn't find that lesson.",
            Self::HeartsExhausted => "You're out of hearts.",
            Self::Rejected => "That answer couldn't be checked. Please try again.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&ApiError> for ViewError {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::NotFound => Self::NotFound,
            ApiError::Unauthorized => Self::Unauthorized,
            ApiError::HeartsExhausted => Self::HeartsExhausted,
            ApiError::Validation(_) => Self::Rejected,
            ApiError::Transport(_) => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

impl From<&PracticeError> for ViewError {
    fn from(err: &PracticeError) -> Self {
        match err {
            PracticeError::HeartsExhausted => Self::HeartsExhausted,
            PracticeError::Api(api) => Self::from(api),
            _ => Self::Unknown,
        }
    }
}

impl From<PracticeError> for ViewError {
    fn from(err: PracticeError) -> Self {
        Self::from(&err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
