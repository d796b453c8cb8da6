//! Logging setup for the backend.
//!
//! [`init`] installs the global subscriber: a compact application layer for
//! every crate plus a detailed layer (RFC3339 timestamps, `file:line`, span
//! timings) for events emitted by this crate.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Crate target prefix used to filter only library-originated logs.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// RFC3339 UTC timer, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Detailed layer that renders ONLY events emitted by this crate.
///
/// Uses a per-layer filter so it does not affect logs from other crates.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_this_crate = filter::filter_fn(|meta| meta.target().starts_with(TARGET_PREFIX));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_this_crate)
}

/// `EnvFilter` from `RUST_LOG`. When it is unset or invalid, uses `default`
/// with this crate raised to `level`.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), default, level)
}

fn filter_from(rust_log: Option<&str>, default: &str, level: Level) -> EnvFilter {
    if let Some(filter) = rust_log
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
    {
        return filter;
    }

    let base = EnvFilter::new(default);
    match format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase()).parse() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// Installs the global subscriber.
///
/// Application events (everything outside this crate) go through a compact
/// `fmt` layer; this crate's events go through [`layer`].
///
/// # Errors
/// Fails if a global subscriber was already set.
pub fn init(default: &str, level: Level) -> Result<(), TryInitError> {
    let app_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(filter::filter_fn(|meta| {
            !meta.target().starts_with(TARGET_PREFIX)
        }));

    tracing_subscriber::registry()
        .with(env_filter_with_level(default, level))
        .with(app_layer)
        .with(layer())
        .try_init()
}
