use std::time::Duration;

use async_trait::async_trait;
use lingo_core::model::{Lesson, LessonId, UserProgress};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{ChallengeSubmission, PracticeApi, SubmissionResult};
use crate::error::ApiError;
use crate::wire::{HeartsDto, LessonDto, ProgressDto, SubmitRequest, SubmitResponseDto};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// API root; always ends with `/` so relative paths join beneath it.
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpConfig {
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// `PracticeApi` over the REST backend.
#[derive(Clone)]
pub struct HttpPracticeApi {
    client: Client,
    config: HttpConfig,
}

impl HttpPracticeApi {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.config
            .base_url
            .join(path)
            .map_err(|err| ApiError::Validation(format!("bad endpoint {path}: {err}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.client.request(method, self.endpoint(path)?);
        Ok(match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|err| {
            tracing::warn!(path, error = %err, "practice api request failed");
            transport_error(&err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| transport_error(&err))?;
        if !status.is_success() {
            let error = ApiError::from_status(status.as_u16(), &body);
            tracing::debug!(
                path,
                status = status.as_u16(),
                %error,
                "practice api rejected request"
            );
            return Err(error);
        }

        tracing::debug!(path, status = status.as_u16(), "practice api response");
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path)?;
        self.send(path, builder).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(path, builder).await
    }
}

fn transport_error(err: &reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

#[async_trait]
impl PracticeApi for HttpPracticeApi {
    async fn lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        let dto: LessonDto = self.get_json(&format!("lessons/{}/", id.value())).await?;
        dto.into_lesson()
    }

    async fn user_progress(&self) -> Result<Option<UserProgress>, ApiError> {
        match self.get_json::<ProgressDto>("user-progress/").await {
            Ok(dto) => Ok(Some(dto.into())),
            Err(ApiError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn submit_challenge(
        &self,
        submission: &ChallengeSubmission,
    ) -> Result<SubmissionResult, ApiError> {
        tracing::debug!(
            challenge = submission.challenge_id.value(),
            shape = submission.answer.shape(),
            attempts = submission.attempts,
            attempt_id = %submission.attempt_id,
            "submitting challenge"
        );
        let request = SubmitRequest::from(submission);
        let dto: SubmitResponseDto = self.post_json("challenges/submit/", &request).await?;
        Ok(dto.into())
    }

    async fn use_heart(&self) -> Result<u32, ApiError> {
        let dto: HeartsDto = self
            .post_json("user-progress/use-heart/", &serde_json::json!({}))
            .await?;
        Ok(dto.hearts)
    }

    async fn refill_hearts(&self) -> Result<u32, ApiError> {
        let dto: HeartsDto = self
            .post_json("user-progress/refill-hearts/", &serde_json::json!({}))
            .await?;
        Ok(dto.hearts)
    }
}
