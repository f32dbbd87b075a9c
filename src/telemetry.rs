//! Telemetry and Observability
//!
//! Structured logging setup. `LOG_FORMAT=json` switches the output to one
//! JSON object per event.

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Environment variable selecting the log output format
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Whether a `LOG_FORMAT` value selects JSON output
pub fn is_json_format(value: Option<&str>) -> bool {
    value.is_some_and(|format| format.trim().eq_ignore_ascii_case("json"))
}

/// Initialize tracing subscriber
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cors_filter=debug,tower_http=debug"));

    let json = is_json_format(std::env::var(LOG_FORMAT_ENV).ok().as_deref());

    let (text_layer, json_layer) = if json {
        let layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (None, Some(layer))
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    tracing::info!(json, "Tracing initialized");
}
