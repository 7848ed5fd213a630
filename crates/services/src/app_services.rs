use std::sync::Arc;

use gateway::{CachedPracticeApi, HttpConfig, HttpPracticeApi, InMemoryPracticeApi, PracticeApi};

use crate::Clock;
use crate::audio::AudioSession;
use crate::config::{DataSource, PracticeConfig};
use crate::error::AppServicesError;
use crate::sessions::PracticeService;

/// Assembles app-facing services over the configured data source.
#[derive(Clone)]
pub struct AppServices {
    config: PracticeConfig,
    practice: Arc<PracticeService>,
    audio: AudioSession,
}

impl AppServices {
    /// Build services for `config`, picking the data-access strategy once.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client or the offline backend
    /// cannot be created.
    pub fn from_config(
        config: PracticeConfig,
        clock: Clock,
        audio: AudioSession,
    ) -> Result<Self, AppServicesError> {
        let api = build_api(&config)?;
        tracing::info!(
            source = %config.data_source,
            base_url = %config.api_base_url,
            "practice api ready"
        );
        Ok(Self::with_api(config, clock, api, audio))
    }

    /// Build services over an already constructed backend.
    #[must_use]
    pub fn with_api(
        config: PracticeConfig,
        clock: Clock,
        api: Arc<dyn PracticeApi>,
        audio: AudioSession,
    ) -> Self {
        Self {
            config,
            practice: Arc::new(PracticeService::new(clock, api)),
            audio,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn audio(&self) -> AudioSession {
        self.audio.clone()
    }
}

fn build_api(config: &PracticeConfig) -> Result<Arc<dyn PracticeApi>, AppServicesError> {
    let http = || -> Result<HttpPracticeApi, AppServicesError> {
        let http_config = HttpConfig::new(config.api_base_url.clone())
            .with_token(config.api_token.clone())
            .with_timeout(config.request_timeout);
        Ok(HttpPracticeApi::new(http_config)?)
    };

    Ok(match config.data_source {
        DataSource::Direct => Arc::new(http()?),
        DataSource::Cached => Arc::new(CachedPracticeApi::new(Arc::new(http()?))),
        DataSource::Offline => Arc::new(InMemoryPracticeApi::with_demo_content()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::demo::DEMO_LESSON_ID;
    use lingo_core::time::fixed_now;

    use crate::sessions::LessonBootstrap;

    #[tokio::test]
    async fn offline_source_serves_the_demo_lesson() {
        let config = PracticeConfig {
            data_source: DataSource::Offline,
            ..PracticeConfig::default()
        };
        let services =
            AppServices::from_config(config, Clock::fixed(fixed_now()), AudioSession::silent())
                .unwrap();
        let bootstrap = services
            .practice()
            .load_practice(DEMO_LESSON_ID)
            .await
            .unwrap();
        let LessonBootstrap::Ready(controller) = bootstrap else {
            panic!("expected a ready session");
        };
        assert_eq!(controller.snapshot().total, 9);
    }

    #[test]
    fn online_sources_build_without_network() {
        for source in [DataSource::Direct, DataSource::Cached] {
            let config = PracticeConfig {
                data_source: source,
                ..PracticeConfig::default()
            };
            assert!(
                AppServices::from_config(config, Clock::default(), AudioSession::silent()).is_ok()
            );
        }
    }
}
