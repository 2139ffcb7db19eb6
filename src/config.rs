//! Logger configuration.
//!
//! Defaults mirror the firmware constants the logger was tuned with on
//! device: a 48-line write buffer, 200-byte rows, a 400 ms flush cadence and
//! a 2 s summary cadence. Hosts that want different tuning can construct a
//! [`LoggerConfig`] directly or load one from YAML.

use serde::{Deserialize, Serialize};

use crate::{LoggerError, Result};

/// Tuning and layout parameters for a [`crate::SessionLogger`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory under the volume root that owns all logger state.
    pub base_dir: String,

    /// Maximum number of queued rows before new rows are dropped.
    pub buffer_lines: usize,

    /// Maximum row length in bytes; longer rows are truncated at construction.
    pub line_max: usize,

    /// Queue depth at which a drain pass runs regardless of elapsed time.
    pub flush_threshold: usize,

    /// Maximum time a non-empty queue waits before a drain pass runs.
    pub flush_interval_ms: u64,

    /// Cadence of unconditional summary rewrites.
    pub summary_interval_ms: u64,

    /// Minimum gap between a drain pass and the post-drain summary rewrite.
    pub summary_debounce_ms: u64,

    /// Number of driver slots tracked by the aggregate stats (slots `1..=N`).
    pub max_drivers: u8,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            base_dir: "LAPLOG".to_string(),
            buffer_lines: 48,
            line_max: 200,
            flush_threshold: 12,
            flush_interval_ms: 400,
            summary_interval_ms: 2000,
            summary_debounce_ms: 250,
            max_drivers: 10,
        }
    }
}

impl LoggerConfig {
    /// Parse a configuration from a YAML document.
    ///
    /// Missing keys fall back to their defaults. The parsed configuration is
    /// validated before being returned.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LoggerConfig = serde_yaml_ng::from_str(yaml).map_err(|e| {
            LoggerError::config(format!("invalid logger YAML: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_lines == 0 {
            return Err(LoggerError::config("buffer_lines must be at least 1"));
        }
        if self.line_max == 0 {
            return Err(LoggerError::config("line_max must be at least 1"));
        }
        if self.flush_threshold == 0 || self.flush_threshold > self.buffer_lines {
            return Err(LoggerError::config(
                "flush_threshold must be in 1..=buffer_lines",
            ));
        }
        if self.max_drivers == 0 {
            return Err(LoggerError::config("max_drivers must be at least 1"));
        }
        if self.base_dir.is_empty() || self.base_dir.contains('/') {
            return Err(LoggerError::config(
                "base_dir must be a single non-empty path component",
            ));
        }
        Ok(())
    }
}
