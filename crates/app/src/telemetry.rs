//! Log setup for the desktop binary.
//!
//! `LINGO_LOG` holds the filter directives, `LINGO_LOG_FORMAT=json` switches to
//! structured output.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,gateway=debug,services=debug";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("LINGO_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match std::env::var("LINGO_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
