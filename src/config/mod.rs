//! Application configuration.
//!
//! Configuration is loaded from environment variables with the `ATP`
//! prefix and `__` as the section separator, e.g.
//! `ATP__MEMBERSHIP__ANNUAL_FEE=249.0` or
//! `ATP__SCHEDULER__ENABLED=false`. Every section has defaults, so an
//! empty environment yields a valid configuration.

mod error;
mod membership;
mod scheduler;

pub use error::{ConfigError, ConfigValidationError};
pub use membership::{MembershipConfig, RefundPolicy};
pub use scheduler::SchedulerConfig;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub membership: MembershipConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Loads configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ATP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.membership.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validation_surfaces_section_failures() {
        let mut config = AppConfig::default();
        config.membership.annual_fee = -1.0;
        assert!(config.validate().is_err());
    }
}
