//! Tracing subscriber setup for hookchain applications.
//!
//! Hook definition, duplication, callback registration and dispatch are
//! logged through [`tracing`] by `hookchain_core` and `hookchain_registry`.
//! [`TracingConfig`] installs a subscriber that renders those events.
//!
//! # Example
//!
//! ```
//! use hookchain_tracing::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! // Development: debug output for hookchain only, compact lines.
//! TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("hookchain_core=trace,hookchain_registry=debug")
//!     .init();
//! ```
//!
//! # Environment
//!
//! [`TracingConfig::from_env`] reads [`LOG_ENV`] as a filter directive and
//! [`LOG_FORMAT_ENV`] as one of `pretty`, `compact` or `json`.

use core::str::FromStr;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter directive variable read by [`TracingConfig::from_env`].
pub const LOG_ENV: &str = "HOOKCHAIN_LOG";

/// Output format variable read by [`TracingConfig::from_env`].
pub const LOG_FORMAT_ENV: &str = "HOOKCHAIN_LOG_FORMAT";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable multi-line output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Error returned when parsing an unknown [`TracingFormat`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tracing format `{0}`, expected pretty, compact or json")]
pub struct ParseFormatError(String);

impl FromStr for TracingFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ParseFormatError(s.to_owned())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Subscriber configuration.
///
/// Without an explicit filter, everything at or above `level` is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Maximum log level, used when no filter is set or the filter is invalid.
    pub level: Level,
    /// Output format.
    pub format: TracingFormat,
    /// Filter directives (e.g. `hookchain_core=trace,warn`).
    pub env_filter: Option<String>,
    /// Whether span enter/exit events are rendered.
    pub span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`LOG_ENV`] and [`LOG_FORMAT_ENV`] from the process environment.
    ///
    /// Unset variables keep their defaults; an unparsable format falls back
    /// to [`TracingFormat::Pretty`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(filter) = lookup(LOG_ENV).filter(|filter| !filter.trim().is_empty()) {
            config.env_filter = Some(filter);
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = format.parse().unwrap_or_default();
        }
        config
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets filter directives, `target=level,target=level,...`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Builds the filter: the configured directives, or `level` if none are
    /// set or they do not parse.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        self.env_filter
            .as_deref()
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(self.level.as_str()))
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        }
    }

    /// Builds the formatting layer for `format`.
    pub fn layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let layer = tracing_subscriber::fmt::layer();
        match self.format {
            TracingFormat::Pretty => layer.pretty().with_span_events(self.span_events()).boxed(),
            TracingFormat::Compact => layer.compact().with_span_events(self.span_events()).boxed(),
            TracingFormat::Json => layer.json().with_span_events(self.span_events()).boxed(),
        }
    }

    /// Installs the global subscriber. Returns `false` if one was already
    /// installed, in which case nothing changes.
    pub fn init(&self) -> bool {
        let installed = tracing_subscriber::registry()
            .with(self.filter())
            .with(self.layer())
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!(level = %self.level, format = ?self.format, "tracing initialized");
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn defaults() {
        let config = TracingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, TracingFormat::Pretty);
        assert_eq!(config.env_filter, None);
        assert!(!config.span_events);
    }

    #[test]
    fn builder_sets_every_field() {
        let config = TracingConfig::new()
            .with_level(Level::TRACE)
            .with_format(TracingFormat::Json)
            .with_env_filter("hookchain_core=debug")
            .with_span_events(true);

        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, TracingFormat::Json);
        assert_eq!(config.env_filter.as_deref(), Some("hookchain_core=debug"));
        assert_eq!(config.span_events(), FmtSpan::ENTER | FmtSpan::EXIT);
    }

    #[test]
    fn parses_formats() {
        assert_eq!("JSON".parse(), Ok(TracingFormat::Json));
        assert_eq!(" compact ".parse(), Ok(TracingFormat::Compact));
        assert_eq!("pretty".parse(), Ok(TracingFormat::Pretty));
        assert!("xml".parse::<TracingFormat>().is_err());
    }

    #[test]
    fn reads_environment() {
        let vars = HashMap::from([
            (LOG_ENV, "hookchain_registry=trace"),
            (LOG_FORMAT_ENV, "compact"),
        ]);
        let config =
            TracingConfig::from_lookup(|key| vars.get(key).map(|value| (*value).to_owned()));

        assert_eq!(config.env_filter.as_deref(), Some("hookchain_registry=trace"));
        assert_eq!(config.format, TracingFormat::Compact);
    }

    #[test]
    fn blank_or_invalid_environment_keeps_defaults() {
        let vars = HashMap::from([(LOG_ENV, "  "), (LOG_FORMAT_ENV, "xml")]);
        let config =
            TracingConfig::from_lookup(|key| vars.get(key).map(|value| (*value).to_owned()));
        assert_eq!(config, TracingConfig::default());
    }

    #[test]
    fn invalid_filter_falls_back_to_level() {
        let config = TracingConfig::new()
            .with_level(Level::WARN)
            .with_env_filter("hookchain_core=loud");
        assert_eq!(config.filter().max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn second_init_is_a_noop() {
        let config = TracingConfig::new().with_format(TracingFormat::Compact);
        config.init();
        assert!(!config.init());
    }
}
