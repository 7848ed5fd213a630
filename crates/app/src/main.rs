mod telemetry;

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use lingo_core::model::LessonId;
use services::{
    AppServices, AudioSession, Clock, DataSource, PracticeConfig, PracticeService,
};
use ui::{App, UiApp, WebviewAudioSink, build_app_context};
use url::Url;

const DEFAULT_LESSON: LessonId = LessonId::new(1);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLessonId { raw: String },
    InvalidApiUrl { raw: String },
    InvalidSource { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLessonId { raw } => write!(f, "invalid --lesson value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
            ArgsError::InvalidSource { raw } => {
                write!(f, "invalid --source value: {raw} (expected direct, cached or offline)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Command-line overrides, applied on top of `PracticeConfig::load`.
#[derive(Debug, Default)]
struct Args {
    lesson: Option<LessonId>,
    api: Option<Url>,
    source: Option<DataSource>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lesson" => {
                    let value = require_value(args, "--lesson")?;
                    let id: u64 = value
                        .parse()
                        .ok()
                        .filter(|id| *id > 0)
                        .ok_or(ArgsError::InvalidLessonId { raw: value })?;
                    parsed.lesson = Some(LessonId::new(id));
                }
                "--api" => {
                    let value = require_value(args, "--api")?;
                    let url = Url::parse(&value)
                        .ok()
                        .filter(|url| matches!(url.scheme(), "http" | "https"))
                        .ok_or(ArgsError::InvalidApiUrl { raw: value })?;
                    parsed.api = Some(url);
                }
                "--source" => {
                    let value = require_value(args, "--source")?;
                    let source = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSource { raw: value.clone() })?;
                    parsed.source = Some(source);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(Some(parsed))
    }

    fn apply(self, config: &mut PracticeConfig) {
        if let Some(lesson) = self.lesson {
            config.start_lesson = Some(lesson);
        }
        if let Some(api) = self.api {
            config.api_base_url = api;
        }
        if let Some(source) = self.source {
            config.data_source = source;
        }
    }
}

fn print_usage() {
    eprintln!(
        "Usage: app [--lesson <id>] [--api <url>] [--source <direct|cached|offline>]\n\
         \n\
         Environment: LINGO_API_BASE_URL, LINGO_API_TOKEN, LINGO_DATA_SOURCE,\n\
         LINGO_REQUEST_TIMEOUT_SECS, LINGO_CONFIG_PATH, LINGO_LOG, LINGO_LOG_FORMAT"
    );
}

struct DesktopApp {
    start_lesson: LessonId,
    media_origin: Url,
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn start_lesson(&self) -> LessonId {
        self.start_lesson
    }

    fn media_origin(&self) -> Url {
        self.media_origin.clone()
    }

    fn practice(&self) -> Arc<PracticeService> {
        self.services.practice()
    }

    fn audio(&self) -> AudioSession {
        self.services.audio()
    }
}

/// Relative media paths are served from the API host's root.
fn media_origin(api_base_url: &Url) -> Url {
    api_base_url
        .join("/")
        .unwrap_or_else(|_| api_base_url.clone())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let Some(args) = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    let mut config = PracticeConfig::load()?;
    args.apply(&mut config);
    tracing::info!(?config, "starting lingo");

    let start_lesson = config.start_lesson.unwrap_or(DEFAULT_LESSON);
    let media_origin = media_origin(&config.api_base_url);
    let audio = AudioSession::new(Arc::new(WebviewAudioSink));
    let services = AppServices::from_config(config, Clock::system(), audio)?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        start_lesson,
        media_origin,
        services,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Lingo")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&[
            "--lesson",
            "7",
            "--api",
            "https://lingo.example.com/api/",
            "--source",
            "offline",
        ])
        .expect("valid args")
        .expect("not help");
        let mut config = PracticeConfig::default();
        args.apply(&mut config);
        assert_eq!(config.start_lesson, Some(LessonId::new(7)));
        assert_eq!(config.api_base_url.host_str(), Some("lingo.example.com"));
        assert_eq!(config.data_source, DataSource::Offline);
    }

    #[test]
    fn bad_flags_are_reported() {
        assert!(matches!(parse(&["--lesson"]), Err(ArgsError::MissingValue { .. })));
        assert!(matches!(parse(&["--lesson", "0"]), Err(ArgsError::InvalidLessonId { .. })));
        assert!(matches!(parse(&["--api", "ftp://x"]), Err(ArgsError::InvalidApiUrl { .. })));
        assert!(matches!(parse(&["--source", "pigeon"]), Err(ArgsError::InvalidSource { .. })));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(parse(&["--help"]), Ok(None)));
    }

    #[test]
    fn media_is_served_from_the_api_host() {
        let base = Url::parse("https://lingo.example.com/api/v1/").expect("url");
        assert_eq!(media_origin(&base).as_str(), "https://lingo.example.com/");
    }
}
