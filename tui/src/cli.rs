//! Command-line arguments
//!
//! Flags override the config file and environment; see
//! [`mosaic_conductor::ConfigOverrides`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mosaic_conductor::{load_config_from_path, ConfigError, ConfigOverrides, LaunchConfig};

/// MOSAIC launch terminal
#[derive(Parser, Debug, Default)]
#[command(name = "mosaic-tui")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Read commands from stdin and print scene messages as JSON lines
    #[arg(long)]
    pub headless: bool,

    /// Configuration file path
    #[arg(short = 'c', long, env = "MOSAIC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Progress added per tick (1-100)
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub step_size: Option<u8>,

    /// Milliseconds between progress ticks
    #[arg(long, value_name = "MS")]
    pub tick_interval_ms: Option<u64>,

    /// Milliseconds from 100% until the cascade starts
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// Skip all delays except progress ticks (rehearsal mode)
    #[arg(long)]
    pub fast: bool,
}

impl Args {
    /// Overrides collected from the flags
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(step) = self.step_size {
            overrides = overrides.with_step_size(step);
        }
        if let Some(ms) = self.tick_interval_ms {
            overrides = overrides.with_tick_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.settle_ms {
            overrides = overrides.with_post_completion_delay(Duration::from_millis(ms));
        }
        if self.fast {
            overrides = overrides
                .with_post_completion_delay(Duration::ZERO)
                .with_cascade_delays(Duration::ZERO, Duration::ZERO);
        }
        overrides
    }

    /// Load the layered configuration with these flags on top
    pub fn load_config(&self) -> Result<LaunchConfig, ConfigError> {
        let path = self
            .config
            .clone()
            .or_else(mosaic_conductor::default_config_path);
        let mut config = load_config_from_path(path)?;
        self.overrides().apply(&mut config)?;
        Ok(config)
    }
}
