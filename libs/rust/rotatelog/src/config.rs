//! Rotating writer configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;

use crate::clock::{Clock, LocalClock, OffsetClock, UtcClock};
use crate::event::{Handler, SharedHandler};
use crate::pattern::FilePattern;
use crate::retention::Retention;
use crate::RotateError;

/// Default bucket length.
pub const DEFAULT_ROTATION_TIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Age applied when neither retention limit is set.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Configuration for a [`RotatingWriter`](crate::RotatingWriter).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use platform_rotatelog::RotateConfig;
///
/// let config = RotateConfig::new("/var/log/app/access.%Y%m%d%H")
///     .with_rotation_time(Duration::from_secs(3600))
///     .with_rotation_size(64 * 1024 * 1024)
///     .with_rotation_count(48)
///     .with_link_name("/var/log/app/access.log");
/// assert_eq!(config.pattern(), "/var/log/app/access.%Y%m%d%H");
/// ```
#[derive(Debug, Clone)]
pub struct RotateConfig {
    pattern: String,
    clock: Arc<dyn Clock>,
    link_name: Option<PathBuf>,
    max_age: Duration,
    rotation_time: Duration,
    rotation_size: u64,
    rotation_count: usize,
    handler: Option<SharedHandler>,
    force_new_file: bool,
}

impl RotateConfig {
    /// Configuration for `pattern` with default settings: local clock,
    /// daily buckets, no size limit, no symlink.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            clock: Arc::new(LocalClock),
            link_name: None,
            max_age: Duration::ZERO,
            rotation_time: DEFAULT_ROTATION_TIME,
            rotation_size: 0,
            rotation_count: 0,
            handler: None,
            force_new_file: false,
        }
    }

    /// Use `clock` for bucket names and retention cutoffs.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a shared clock.
    #[must_use]
    pub fn with_shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Format file names in UTC.
    #[must_use]
    pub fn with_utc(self) -> Self {
        self.with_clock(UtcClock)
    }

    /// Format file names at a fixed UTC offset.
    #[must_use]
    pub fn with_location(self, offset: FixedOffset) -> Self {
        self.with_clock(OffsetClock::new(offset))
    }

    /// Maintain a symlink at `link_name` pointing at the current file.
    #[must_use]
    pub fn with_link_name(mut self, link_name: impl Into<PathBuf>) -> Self {
        self.link_name = Some(link_name.into());
        self
    }

    /// Remove files older than `max_age`. Zero leaves it unset.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Length of a time bucket. Zero disables truncation.
    #[must_use]
    pub const fn with_rotation_time(mut self, rotation_time: Duration) -> Self {
        self.rotation_time = rotation_time;
        self
    }

    /// Rotate once the current file reaches `bytes`. Zero disables.
    #[must_use]
    pub const fn with_rotation_size(mut self, bytes: u64) -> Self {
        self.rotation_size = bytes;
        self
    }

    /// Keep at most `count` files. Zero leaves it unset.
    #[must_use]
    pub const fn with_rotation_count(mut self, count: usize) -> Self {
        self.rotation_count = count;
        self
    }

    /// Notify `handler` after every file switch.
    #[must_use]
    pub fn with_handler(mut self, handler: impl Handler) -> Self {
        self.handler = Some(SharedHandler::new(handler));
        self
    }

    /// Never append to an existing file when entering a new bucket.
    #[must_use]
    pub const fn force_new_file(mut self) -> Self {
        self.force_new_file = true;
        self
    }

    /// The file name pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check the configuration and resolve defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RotateError::InvalidArgument`] if both retention limits are
    /// set and [`RotateError::InvalidPattern`] for a bad pattern.
    pub fn validate(self) -> Result<Resolved, RotateError> {
        let pattern = FilePattern::new(self.pattern)?;

        let retention = match (self.max_age.is_zero(), self.rotation_count) {
            (false, count) if count > 0 => {
                return Err(RotateError::InvalidArgument(
                    "options max_age and rotation_count cannot be both set".to_string(),
                ));
            }
            (false, _) => Retention::MaxAge(self.max_age),
            (true, 0) => Retention::MaxAge(DEFAULT_MAX_AGE),
            (true, count) => Retention::MaxCount(count),
        };

        Ok(Resolved {
            pattern,
            clock: self.clock,
            link_name: self.link_name,
            retention,
            rotation_time: self.rotation_time,
            rotation_size: self.rotation_size,
            handler: self.handler,
            force_new_file: self.force_new_file,
        })
    }
}

/// Validated configuration with defaults applied.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub(crate) pattern: FilePattern,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) link_name: Option<PathBuf>,
    pub(crate) retention: Retention,
    pub(crate) rotation_time: Duration,
    pub(crate) rotation_size: u64,
    pub(crate) handler: Option<SharedHandler>,
    pub(crate) force_new_file: bool,
}

impl Resolved {
    /// Active retention policy.
    #[must_use]
    pub const fn retention(&self) -> Retention {
        self.retention
    }

    /// Validated pattern.
    #[must_use]
    pub const fn pattern(&self) -> &FilePattern {
        &self.pattern
    }
}
