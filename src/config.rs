//! Viewer configuration.
//!
//! `EngineConfig` carries everything the browser needs at startup: request
//! identity, the first page to open, the window size, font metrics and the
//! capacity of the event channel. It has sensible defaults via [`Default`], a
//! fluent [`EngineConfig::builder()`] with validation, and can be loaded from
//! JSON.
//!
//! # Examples
//!
//! ## Customize with the builder
//! ```rust
//! use vgbrowse::config::{EngineConfig, LogLevel};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EngineConfig::builder()
//!     .user_agent("vgbrowse-test/0.1")
//!     .initial_url("http://localhost:8084/index.svg")
//!     .viewport(800, 600)
//!     .request_timeout_ms(5_000)
//!     .log_level(LogLevel::Debug)
//!     .build()?; // returns Result<EngineConfig, ConfigError>
//! assert_eq!(cfg.viewport.width, 800);
//! # Ok(()) }
//! ```
//!
//! ## Load from JSON
//! ```rust
//! use vgbrowse::config::EngineConfig;
//! let cfg = EngineConfig::from_json_str(r#"{ "user_agent": "x/1", "channel_capacity": 8 }"#).unwrap();
//! assert_eq!(cfg.channel_capacity, 8);
//! assert_eq!(cfg.font.char_width, 7.0); // unspecified fields keep their defaults
//! ```
//!
//! # Errors
//!
//! Validation returns [`ConfigError`] for an empty user agent, an empty
//! viewport, non-positive font metrics or a zero channel capacity. JSON
//! loading adds I/O and syntax errors.

use crate::render::{FontHandle, FontMetrics, Viewport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "vgbrowse/0.1";
pub const DEFAULT_INITIAL_URL: &str = "http://localhost:8084/circleRectText.svg";

/// Log verbosity for hosts that install a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Page opened when the browser starts
    pub initial_url: String,
    /// Window area the chrome and page are laid out in
    pub viewport: Viewport,
    /// Per-request timeout; none when unset
    pub request_timeout_ms: Option<u64>,
    /// Honour `HTTP_PROXY` and friends from the environment
    pub use_system_proxy: bool,
    /// Capacity of the browser event broadcast channel
    pub channel_capacity: usize,
    pub log_level: LogLevel,
    /// Metrics of the monospace font all text is drawn with
    pub font: FontMetrics,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            initial_url: DEFAULT_INITIAL_URL.to_string(),
            viewport: Viewport::default(),
            request_timeout_ms: None,
            use_system_proxy: true,
            channel_capacity: 64,
            log_level: LogLevel::Info,
            font: FontMetrics::default(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Shared handle to the configured font metrics.
    pub fn font_handle(&self) -> FontHandle {
        self.font.clone().into_handle()
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = serde_json::from_str(s).map_err(ConfigError::Json)?;
        validate(&cfg)?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    inner: EngineConfig,
}

impl EngineConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EngineConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn initial_url<S: Into<String>>(self, url: S) -> Self { self.map(|c| c.initial_url = url.into()) }
    pub fn viewport(self, width: u32, height: u32) -> Self { self.map(|c| c.viewport.resize(width, height)) }
    pub fn request_timeout_ms(self, ms: u64) -> Self { self.map(|c| c.request_timeout_ms = Some(ms)) }
    pub fn use_system_proxy(self, on: bool) -> Self { self.map(|c| c.use_system_proxy = on) }
    pub fn channel_capacity(self, n: usize) -> Self { self.map(|c| c.channel_capacity = n) }
    pub fn log_level(self, level: LogLevel) -> Self { self.map(|c| c.log_level = level) }
    pub fn font(self, font: FontMetrics) -> Self { self.map(|c| c.font = font) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut EngineConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug)]
pub enum ConfigError {
    EmptyUserAgent,
    EmptyViewport { width: u32, height: u32 },
    InvalidFontSize(f64),
    InvalidCharWidth(f64),
    ZeroChannelCapacity,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyUserAgent => write!(f, "user_agent must not be empty"),
            ConfigError::EmptyViewport { width, height } =>
                write!(f, "viewport {width}x{height} must have a non-zero size"),
            ConfigError::InvalidFontSize(s) =>
                write!(f, "font size {s} must be a positive, finite number"),
            ConfigError::InvalidCharWidth(w) =>
                write!(f, "font char_width {w} must be a positive, finite number"),
            ConfigError::ZeroChannelCapacity => write!(f, "channel_capacity must be at least 1"),
            ConfigError::Io(e) => write!(f, "cannot read config: {e}"),
            ConfigError::Json(e) => write!(f, "invalid config JSON: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn validate(c: &EngineConfig) -> Result<(), ConfigError> {
    if c.user_agent.trim().is_empty() {
        return Err(ConfigError::EmptyUserAgent);
    }
    if c.viewport.is_empty() {
        return Err(ConfigError::EmptyViewport {
            width: c.viewport.width,
            height: c.viewport.height,
        });
    }
    if !positive(c.font.size) {
        return Err(ConfigError::InvalidFontSize(c.font.size));
    }
    if !positive(c.font.char_width) {
        return Err(ConfigError::InvalidCharWidth(c.font.char_width));
    }
    if c.channel_capacity == 0 {
        return Err(ConfigError::ZeroChannelCapacity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.user_agent, "vgbrowse/0.1");
        assert_eq!(cfg.initial_url, "http://localhost:8084/circleRectText.svg");
        assert_eq!((cfg.viewport.width, cfg.viewport.height), (1024, 768));
        assert_eq!(cfg.channel_capacity, 64);
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn builder_validates() {
        assert!(matches!(
            EngineConfig::builder().user_agent("  ").build(),
            Err(ConfigError::EmptyUserAgent)
        ));
        assert!(matches!(
            EngineConfig::builder().viewport(0, 10).build(),
            Err(ConfigError::EmptyViewport { width: 0, height: 10 })
        ));
        assert!(matches!(
            EngineConfig::builder().font(FontMetrics::new("mono", 0.0, 7.0)).build(),
            Err(ConfigError::InvalidFontSize(_))
        ));
        assert!(matches!(
            EngineConfig::builder().font(FontMetrics::new("mono", 13.0, f64::NAN)).build(),
            Err(ConfigError::InvalidCharWidth(_))
        ));
        assert!(matches!(
            EngineConfig::builder().channel_capacity(0).build(),
            Err(ConfigError::ZeroChannelCapacity)
        ));
    }

    #[test]
    fn builder_applies_settings() {
        let cfg = EngineConfig::builder()
            .request_timeout_ms(250)
            .use_system_proxy(false)
            .with(|c| c.log_level = LogLevel::Trace)
            .build()
            .unwrap();
        assert_eq!(cfg.request_timeout(), Some(Duration::from_millis(250)));
        assert!(!cfg.use_system_proxy);
        assert_eq!(cfg.log_level.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn json_round_trip() {
        let cfg = EngineConfig::builder().viewport(640, 480).build().unwrap();
        let json = cfg.to_json_string().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initial_url": "http://127.0.0.1:9/a.svg", "log_level": "debug" }}"#).unwrap();

        let cfg = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.initial_url, "http://127.0.0.1:9/a.svg");
        assert_eq!(cfg.log_level, LogLevel::Debug);
    }

    #[test]
    fn invalid_json_and_values_are_rejected() {
        assert!(matches!(EngineConfig::from_json_str("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "channel_capacity": 0 }"#),
            Err(ConfigError::ZeroChannelCapacity)
        ));
        assert!(matches!(
            EngineConfig::from_json_file("/nonexistent/vgbrowse.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
