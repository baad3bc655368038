//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Format};

const ENV_LEVEL: &str = "RULEVAL_LOG";
const ENV_FALLBACK_LEVEL: &str = "RUST_LOG";
const ENV_FORMAT: &str = "RULEVAL_LOG_FORMAT";
const ENV_COLORS: &str = "RULEVAL_LOG_COLORS";
const ENV_SOURCE: &str = "RULEVAL_LOG_SOURCE";

fn flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_overrides_from(lookup)
    }

    /// Applies the variables `lookup` defines on top of `self`; unset
    /// variables keep the current values.
    #[must_use]
    pub fn with_overrides_from(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = self;

        if let Some(level) = lookup(ENV_LEVEL).or_else(|| lookup(ENV_FALLBACK_LEVEL)) {
            config.level = level;
        }

        if let Some(format) = lookup(ENV_FORMAT) {
            config.format = Format::parse_lenient(&format);
        }

        if let Some(colors) = lookup(ENV_COLORS).as_deref().and_then(flag) {
            config.display.colors = colors;
        }
        if let Some(source) = lookup(ENV_SOURCE).as_deref().and_then(flag) {
            config.display.source = source;
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_owned(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}
