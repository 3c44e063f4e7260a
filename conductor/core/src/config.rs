//! Scene Configuration
//!
//! Timing constants for the sequencer and the reveal cascade, plus the
//! layered loader that lets a TOML file, the environment or a caller
//! override them.
//!
//! # Configuration Priority
//!
//! Highest first:
//! 1. Programmatic overrides ([`ConfigOverrides`])
//! 2. Environment variables (`MOSAIC_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! The file lives at `$XDG_CONFIG_HOME/mosaic/launch.toml` unless
//! `MOSAIC_CONFIG` points somewhere else. A missing file is not an error.
//!
//! # Example Configuration
//!
//! ```toml
//! [sequence]
//! step_size = 2
//! tick_interval_ms = 10
//! post_completion_delay_ms = 300
//!
//! [cascade]
//! delay_a_ms = 500
//! delay_b_ms = 2000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Progress added per sequencer tick
pub const DEFAULT_STEP_SIZE: u8 = 2;

/// Time between sequencer ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Pause between progress reaching 100 and the completion signal
pub const DEFAULT_POST_COMPLETION_DELAY: Duration = Duration::from_millis(300);

/// Delay between hiding the terminal and hiding the hyperspeed layer
pub const DEFAULT_CASCADE_DELAY_A: Duration = Duration::from_millis(500);

/// Delay between hiding the hyperspeed layer and revealing final content
pub const DEFAULT_CASCADE_DELAY_B: Duration = Duration::from_millis(2000);

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "MOSAIC_CONFIG";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracks where the effective configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Programmatic or command-line override
    Cli,
    /// Environment variable
    Env,
    /// TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Timings
// =============================================================================

/// Every timing knob of the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTimings {
    /// Progress increment per tick (1..=100)
    pub step_size: u8,
    /// Interval between ticks
    pub tick_interval: Duration,
    /// Delay after reaching 100 before completion fires
    pub post_completion_delay: Duration,
    /// Terminal hidden → hyperspeed hidden
    pub cascade_delay_a: Duration,
    /// Hyperspeed hidden → final content revealed
    pub cascade_delay_b: Duration,
}

impl Default for SceneTimings {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
            post_completion_delay: DEFAULT_POST_COMPLETION_DELAY,
            cascade_delay_a: DEFAULT_CASCADE_DELAY_A,
            cascade_delay_b: DEFAULT_CASCADE_DELAY_B,
        }
    }
}

impl SceneTimings {
    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the step size is outside
    /// `1..=100` or the tick interval is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.step_size) {
            return Err(ConfigError::ValidationError(format!(
                "step_size must be between 1 and 100, got {}",
                self.step_size
            )));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Time from trigger to the sequencer's completion signal
    #[must_use]
    pub fn sequence_duration(&self) -> Duration {
        let ticks = u32::from(100u8.div_ceil(self.step_size.max(1)));
        self.tick_interval * ticks + self.post_completion_delay
    }

    /// Time from trigger to the final reveal
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.sequence_duration() + self.cascade_delay_a + self.cascade_delay_b
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[sequence]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceToml {
    /// Progress increment per tick
    pub step_size: Option<u8>,
    /// Tick interval in milliseconds
    pub tick_interval_ms: Option<u64>,
    /// Settle delay in milliseconds
    pub post_completion_delay_ms: Option<u64>,
}

/// `[cascade]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeToml {
    /// First cascade delay in milliseconds
    pub delay_a_ms: Option<u64>,
    /// Second cascade delay in milliseconds
    pub delay_b_ms: Option<u64>,
}

/// Root of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchToml {
    /// Sequencer settings
    pub sequence: SequenceToml,
    /// Cascade settings
    pub cascade: CascadeToml,
}

/// Effective configuration after all layers are applied
#[derive(Clone, Debug)]
pub struct LaunchConfig {
    /// Scene timings
    pub timings: SceneTimings,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            timings: SceneTimings::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl LaunchConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest-priority layer that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/mosaic/launch.toml` (usually
/// `~/.config/mosaic/launch.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|p| p.join("mosaic").join("launch.toml")))
}

/// Load configuration from the default path and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or
/// parsed, or if the resulting values are invalid.
pub fn load_config() -> Result<LaunchConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<LaunchConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LaunchConfig, ConfigError> {
    let mut config = LaunchConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: LaunchToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.timings.validate()?;

    Ok(config)
}

fn apply_toml_config(config: &mut LaunchConfig, toml: &LaunchToml) {
    let timings = &mut config.timings;
    if let Some(step) = toml.sequence.step_size {
        timings.step_size = step;
    }
    if let Some(ms) = toml.sequence.tick_interval_ms {
        timings.tick_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.sequence.post_completion_delay_ms {
        timings.post_completion_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.cascade.delay_a_ms {
        timings.cascade_delay_a = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.cascade.delay_b_ms {
        timings.cascade_delay_b = Duration::from_millis(ms);
    }
}

fn apply_env_config(config: &mut LaunchConfig, env: impl Fn(&str) -> Option<String>) {
    let parse_ms = |key: &str| env(key).and_then(|v| v.trim().parse::<u64>().ok());

    if let Some(step) = env("MOSAIC_STEP_SIZE").and_then(|v| v.trim().parse::<u8>().ok()) {
        config.timings.step_size = step;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_ms("MOSAIC_TICK_INTERVAL_MS") {
        config.timings.tick_interval = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_ms("MOSAIC_POST_COMPLETION_DELAY_MS") {
        config.timings.post_completion_delay = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_ms("MOSAIC_CASCADE_DELAY_A_MS") {
        config.timings.cascade_delay_a = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_ms("MOSAIC_CASCADE_DELAY_B_MS") {
        config.timings.cascade_delay_b = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// Override Support
// =============================================================================

/// Builder for programmatic overrides, applied after loading
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Step size override
    pub step_size: Option<u8>,
    /// Tick interval override
    pub tick_interval: Option<Duration>,
    /// Settle delay override
    pub post_completion_delay: Option<Duration>,
    /// Cascade delay A override
    pub cascade_delay_a: Option<Duration>,
    /// Cascade delay B override
    pub cascade_delay_b: Option<Duration>,
}

impl ConfigOverrides {
    /// Create an empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the step size
    #[must_use]
    pub fn with_step_size(mut self, step: u8) -> Self {
        self.step_size = Some(step);
        self
    }

    /// Override the tick interval
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    /// Override the settle delay
    #[must_use]
    pub fn with_post_completion_delay(mut self, delay: Duration) -> Self {
        self.post_completion_delay = Some(delay);
        self
    }

    /// Override both cascade delays
    #[must_use]
    pub fn with_cascade_delays(mut self, a: Duration, b: Duration) -> Self {
        self.cascade_delay_a = Some(a);
        self.cascade_delay_b = Some(b);
        self
    }

    fn is_empty(&self) -> bool {
        self.step_size.is_none()
            && self.tick_interval.is_none()
            && self.post_completion_delay.is_none()
            && self.cascade_delay_a.is_none()
            && self.cascade_delay_b.is_none()
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the result is invalid;
    /// the configuration is left unchanged in that case.
    pub fn apply(&self, config: &mut LaunchConfig) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Ok(());
        }

        let mut timings = config.timings;
        if let Some(step) = self.step_size {
            timings.step_size = step;
        }
        if let Some(interval) = self.tick_interval {
            timings.tick_interval = interval;
        }
        if let Some(delay) = self.post_completion_delay {
            timings.post_completion_delay = delay;
        }
        if let Some(delay) = self.cascade_delay_a {
            timings.cascade_delay_a = delay;
        }
        if let Some(delay) = self.cascade_delay_b {
            timings.cascade_delay_b = delay;
        }
        timings.validate()?;

        config.timings = timings;
        config.source = ConfigSource::Cli;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_timings() {
        let timings = SceneTimings::default();
        assert_eq!(timings.step_size, 2);
        assert_eq!(timings.tick_interval, Duration::from_millis(10));
        assert_eq!(timings.post_completion_delay, Duration::from_millis(300));
        assert_eq!(timings.cascade_delay_a, Duration::from_millis(500));
        assert_eq!(timings.cascade_delay_b, Duration::from_millis(2000));
        assert!(timings.validate().is_ok());
    }

    #[test]
    fn test_durations() {
        let timings = SceneTimings::default();
        assert_eq!(timings.sequence_duration(), Duration::from_millis(800));
        assert_eq!(timings.total_duration(), Duration::from_millis(3300));

        let odd = SceneTimings {
            step_size: 3,
            ..SceneTimings::default()
        };
        // 34 ticks to pass 100
        assert_eq!(odd.sequence_duration(), Duration::from_millis(640));
    }

    #[test]
    fn test_validation() {
        let zero_step = SceneTimings {
            step_size: 0,
            ..SceneTimings::default()
        };
        assert!(matches!(
            zero_step.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let zero_tick = SceneTimings {
            tick_interval: Duration::ZERO,
            ..SceneTimings::default()
        };
        assert!(zero_tick.validate().is_err());
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = load_config_with_env(None, no_env).unwrap();
        assert_eq!(config.timings, SceneTimings::default());
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/launch.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[sequence]
step_size = 5
tick_interval_ms = 20
post_completion_delay_ms = 100

[cascade]
delay_a_ms = 250
delay_b_ms = 1000
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(
            config.timings,
            SceneTimings {
                step_size: 5,
                tick_interval: Duration::from_millis(20),
                post_completion_delay: Duration::from_millis(100),
                cascade_delay_a: Duration::from_millis(250),
                cascade_delay_b: Duration::from_millis(1000),
            }
        );
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_toml("[cascade]\ndelay_b_ms = 42\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.timings.cascade_delay_b, Duration::from_millis(42));
        assert_eq!(config.timings.step_size, DEFAULT_STEP_SIZE);
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[sequence\nstep_size = \"lots\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_file_value_rejected() {
        let file = write_toml("[sequence]\nstep_size = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[sequence]\nstep_size = 5\ntick_interval_ms = 20\n");
        let env = env_from(&[
            ("MOSAIC_STEP_SIZE", "10"),
            ("MOSAIC_CASCADE_DELAY_A_MS", "7"),
            ("MOSAIC_TICK_INTERVAL_MS", "not-a-number"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();
        assert_eq!(config.timings.step_size, 10);
        assert_eq!(config.timings.cascade_delay_a, Duration::from_millis(7));
        // Unparseable env values are ignored.
        assert_eq!(config.timings.tick_interval, Duration::from_millis(20));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = LaunchConfig::new();
        ConfigOverrides::new()
            .with_step_size(25)
            .with_cascade_delays(Duration::ZERO, Duration::from_millis(1))
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.timings.step_size, 25);
        assert_eq!(config.timings.cascade_delay_a, Duration::ZERO);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_no_change() {
        let mut config = LaunchConfig::new();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_invalid_overrides_leave_config_untouched() {
        let mut config = LaunchConfig::new();
        let result = ConfigOverrides::new()
            .with_tick_interval(Duration::ZERO)
            .apply(&mut config);
        assert!(result.is_err());
        assert_eq!(config.timings, SceneTimings::default());
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError("bad".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }
}
