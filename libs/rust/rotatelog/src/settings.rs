//! Plain-value settings handed over by a configuration loader.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RotateConfig;
use crate::RotateError;

/// Rotating writer settings as primitives.
///
/// Unset numeric fields keep the [`RotateConfig`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateSettings {
    /// strftime file name pattern
    pub pattern: String,
    /// Bucket length in seconds
    pub rotation_secs: Option<u64>,
    /// Size threshold in bytes
    pub rotation_size: Option<u64>,
    /// Maximum file age in seconds
    pub max_age_secs: Option<u64>,
    /// Maximum number of files kept
    pub rotation_count: Option<usize>,
    /// Symlink to the current file
    pub link_name: Option<PathBuf>,
    /// Format names in UTC instead of local time
    pub utc: bool,
}

impl RotateSettings {
    /// Read settings from `<PREFIX>_PATTERN`, `<PREFIX>_ROTATION_SECS`,
    /// `<PREFIX>_ROTATION_SIZE`, `<PREFIX>_MAX_AGE_SECS`,
    /// `<PREFIX>_ROTATION_COUNT`, `<PREFIX>_LINK_NAME` and `<PREFIX>_UTC`.
    ///
    /// # Errors
    ///
    /// Returns [`RotateError::InvalidArgument`] if the pattern is missing or
    /// a value does not parse.
    pub fn from_env(prefix: &str) -> Result<Self, RotateError> {
        let key = |name: &str| format!("{prefix}_{name}");

        let pattern = env::var(key("PATTERN")).map_err(|_| {
            RotateError::InvalidArgument(format!("{} must be set", key("PATTERN")))
        })?;

        Ok(Self {
            pattern,
            rotation_secs: parse_env(&key("ROTATION_SECS"))?,
            rotation_size: parse_env(&key("ROTATION_SIZE"))?,
            max_age_secs: parse_env(&key("MAX_AGE_SECS"))?,
            rotation_count: parse_env(&key("ROTATION_COUNT"))?,
            link_name: env::var_os(key("LINK_NAME"))
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            utc: parse_env(&key("UTC"))?.unwrap_or(false),
        })
    }

    /// Build the writer configuration.
    #[must_use]
    pub fn into_config(self) -> RotateConfig {
        let mut config = RotateConfig::new(self.pattern);
        if let Some(secs) = self.rotation_secs {
            config = config.with_rotation_time(Duration::from_secs(secs));
        }
        if let Some(bytes) = self.rotation_size {
            config = config.with_rotation_size(bytes);
        }
        if let Some(secs) = self.max_age_secs {
            config = config.with_max_age(Duration::from_secs(secs));
        }
        if let Some(count) = self.rotation_count {
            config = config.with_rotation_count(count);
        }
        if let Some(link) = self.link_name {
            config = config.with_link_name(link);
        }
        if self.utc {
            config = config.with_utc();
        }
        config
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>, RotateError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| RotateError::InvalidArgument(format!("invalid {name}: {e}"))),
        Err(_) => Ok(None),
    }
}
