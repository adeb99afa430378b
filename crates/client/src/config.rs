//! Configuration types and loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration for the Cadence client
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Clock and rent settings of the in-memory ledger
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Unix timestamp of slot zero
    #[serde(default = "default_genesis_timestamp")]
    pub genesis_timestamp: i64,
    #[serde(default = "default_slot_duration_ms")]
    pub slot_duration_ms: u64,
    #[serde(default = "default_slots_per_epoch")]
    pub slots_per_epoch: u64,
    /// Whether created accounts must be rent exempt
    #[serde(default = "default_charge_rent")]
    pub charge_rent: bool,
}

fn default_genesis_timestamp() -> i64 {
    1_700_000_000
}

fn default_slot_duration_ms() -> u64 {
    400
}

fn default_slots_per_epoch() -> u64 {
    432_000
}

fn default_charge_rent() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_timestamp: default_genesis_timestamp(),
            slot_duration_ms: default_slot_duration_ms(),
            slots_per_epoch: default_slots_per_epoch(),
            charge_rent: default_charge_rent(),
        }
    }
}

/// Polling scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum number of threads a scheduler watches
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
}

fn default_poll_interval_ms() -> u64 {
    400
}

fn default_max_threads() -> usize {
    64
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_threads: default_max_threads(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ClientConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.ledger.slot_duration_ms == 0 {
            anyhow::bail!("slot_duration_ms must be greater than 0");
        }

        if self.ledger.slots_per_epoch == 0 {
            anyhow::bail!("slots_per_epoch must be greater than 0");
        }

        if self.ledger.genesis_timestamp < 0 {
            anyhow::bail!("genesis_timestamp cannot be negative");
        }

        if self.scheduler.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than 0");
        }

        if self.scheduler.max_threads == 0 {
            anyhow::bail!("max_threads must be greater than 0");
        }

        let valid_levels = ["off", "error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            );
        }

        Ok(())
    }
}
