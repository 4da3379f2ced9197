//! Configuration loaded from environment variables.

use std::env;

use platform_rotatelog::{RotateSettings, TracingConfig};

use crate::error::PipeError;

/// Prefix of every log-pipe variable.
pub const ENV_PREFIX: &str = "LOG_PIPE";

/// log-pipe configuration.
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Rotating writer settings (`LOG_PIPE_PATTERN`, `LOG_PIPE_ROTATION_SECS`, ...)
    pub rotate: RotateSettings,
    /// Diagnostics output (`LOG_PIPE_LOG_LEVEL`, `LOG_PIPE_LOG_JSON`)
    pub tracing: TracingConfig,
}

impl PipeConfig {
    /// Load configuration from the environment, honouring a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is missing or a value is invalid.
    pub fn from_env() -> Result<Self, PipeError> {
        dotenvy::dotenv().ok();

        let rotate = RotateSettings::from_env(ENV_PREFIX)?;
        rotate.clone().into_config().validate()?;

        let mut tracing = TracingConfig::default()
            .with_service_name("log-pipe")
            .with_log_level(
                env::var(format!("{ENV_PREFIX}_LOG_LEVEL")).unwrap_or_else(|_| "info".to_string()),
            );
        if env::var(format!("{ENV_PREFIX}_LOG_JSON")).is_ok_and(|v| v == "true" || v == "1") {
            tracing = tracing.with_json_output();
        }

        Ok(Self { rotate, tracing })
    }
}
