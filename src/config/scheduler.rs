//! Lifecycle scheduler configuration.

use serde::Deserialize;

use super::error::ConfigValidationError;

/// Intervals for the periodic lifecycle sweeps.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler starts with the application.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between expiration sweeps.
    #[serde(default = "default_expiration_check_interval_secs")]
    pub expiration_check_interval_secs: u64,

    /// Seconds between renewal-reminder sweeps.
    #[serde(default = "default_reminder_check_interval_secs")]
    pub reminder_check_interval_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_expiration_check_interval_secs() -> u64 {
    3600
}

fn default_reminder_check_interval_secs() -> u64 {
    86400
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            expiration_check_interval_secs: default_expiration_check_interval_secs(),
            reminder_check_interval_secs: default_reminder_check_interval_secs(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.expiration_check_interval_secs == 0 {
            return Err(ConfigValidationError::new(
                "scheduler.expiration_check_interval_secs",
                "must be positive",
            ));
        }
        if self.reminder_check_interval_secs == 0 {
            return Err(ConfigValidationError::new(
                "scheduler.reminder_check_interval_secs",
                "must be positive",
            ));
        }
        Ok(())
    }
}
