use std::env;
use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CleanupError, Result};
use crate::retention::{Frequency, PeriodCounts, RetentionSchedule};

pub const BUCKET: &str = "BUCKET";
pub const REGION: &str = "REGION";
pub const ACCESS_KEY: &str = "AWS_ACCESS_KEY";
pub const SECRET_KEY: &str = "AWS_SECRET_KEY";
pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const ENDPOINT_URL: &str = "S3_ENDPOINT_URL";
pub const TARGET_PATH: &str = "TARGET_PATH";
pub const LIST_PATH: &str = "LIST_PATH";
pub const YEARLY: &str = "YEARLY";
pub const MONTHLY: &str = "MONTHLY";
pub const WEEKLY: &str = "WEEKLY";
pub const DAILY: &str = "DAILY";
pub const HOURLY: &str = "HOURLY";
pub const FREQUENCY: &str = "FREQUENCY";
pub const LOG_DIR: &str = "LOG_DIR";

/// Value the scheduler writes for a setting it leaves unset.
const UNSET: &str = "null";

static BUCKET_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9.-]*[a-z0-9]$").unwrap());

/// Reads the real process environment.
pub fn process_env(var: &str) -> Option<String> {
    env::var(var).ok()
}

/// Thin wrapper over an environment lookup. Blank values count as absent.
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self { lookup }
    }

    fn optional(&self, var: &'static str) -> Option<String> {
        (self.lookup)(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, var: &'static str) -> Result<String> {
        self.optional(var).ok_or(CleanupError::MissingConfig(var))
    }

    /// Optional value where the `null` sentinel also means absent.
    fn nullable(&self, var: &'static str) -> Option<String> {
        self.optional(var).filter(|v| !v.eq_ignore_ascii_case(UNSET))
    }

    fn count(&self, var: &'static str) -> Result<u64> {
        match self.nullable(var) {
            None => Ok(0),
            Some(value) => value
                .parse::<u64>()
                .map_err(|e| CleanupError::invalid(var, &value, e.to_string())),
        }
    }
}

/// Checks a bucket name against the S3 naming rules.
/// https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html
pub fn validate_bucket_name(name: &str) -> Result<(), String> {
    if name.len() < 3 || name.len() > 63 {
        return Err("bucket name must be between 3 and 63 characters long".to_string());
    }
    if !BUCKET_NAME_REGEX.is_match(name) {
        return Err(
            "only a-z, 0-9, . and - allowed, must start/end with letter/digit".to_string(),
        );
    }
    if name.contains("..") {
        return Err("bucket name cannot contain consecutive periods".to_string());
    }
    if name.chars().all(|c| c.is_ascii_digit() || c == '.') && name.split('.').count() == 4 {
        return Err("bucket name cannot be formatted as an IP address".to_string());
    }
    Ok(())
}

/// Static access key pair handed to the SDK.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

/// Connection settings shared by every utility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub bucket: String,
    /// Falls back to the SDK's region chain when unset.
    pub region: Option<String>,
    /// Falls back to the SDK's credential chain when unset.
    pub credentials: Option<StaticCredentials>,
    pub endpoint_url: Option<String>,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::read(&EnvReader::new(lookup))
    }

    fn read<F: Fn(&str) -> Option<String>>(env: &EnvReader<F>) -> Result<Self> {
        let bucket = env.required(BUCKET)?;
        validate_bucket_name(&bucket)
            .map_err(|reason| CleanupError::invalid(BUCKET, &bucket, reason))?;

        let credentials = match (env.optional(ACCESS_KEY), env.optional(SECRET_KEY)) {
            (Some(access_key), Some(secret_key)) => Some(StaticCredentials {
                access_key,
                secret_key,
                session_token: env.optional(SESSION_TOKEN),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(CleanupError::MissingConfig(SECRET_KEY)),
            (None, Some(_)) => return Err(CleanupError::MissingConfig(ACCESS_KEY)),
        };

        Ok(Self {
            bucket,
            region: env.optional(REGION),
            credentials,
            endpoint_url: env.optional(ENDPOINT_URL),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixCleanerConfig {
    pub store: StoreConfig,
    /// Full path such as `s3://bucket/topics_X`.
    pub target_path: String,
}

impl PrefixCleanerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = EnvReader::new(lookup);
        Ok(Self {
            store: StoreConfig::read(&env)?,
            target_path: env.required(TARGET_PATH)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixListerConfig {
    pub store: StoreConfig,
    /// Directory to list; empty means the bucket root.
    pub list_path: String,
}

impl PrefixListerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = EnvReader::new(lookup);
        Ok(Self {
            store: StoreConfig::read(&env)?,
            list_path: env.optional(LIST_PATH).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionCleanerConfig {
    pub store: StoreConfig,
    pub schedule: RetentionSchedule,
}

impl RetentionCleanerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = EnvReader::new(lookup);
        let store = StoreConfig::read(&env)?;

        let counts = PeriodCounts {
            years: env.count(YEARLY)?,
            months: env.count(MONTHLY)?,
            weeks: env.count(WEEKLY)?,
            days: env.count(DAILY)?,
            hours: env.count(HOURLY)?,
        };
        let frequency = env
            .nullable(FREQUENCY)
            .map(|value| {
                value
                    .parse::<Frequency>()
                    .map_err(|reason| CleanupError::invalid(FREQUENCY, &value, reason))
            })
            .transpose()?;

        Ok(Self {
            store,
            schedule: RetentionSchedule { counts, frequency },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// When set, logs are also written to a file in this directory.
    pub dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = EnvReader::new(lookup);
        Self {
            dir: env.optional(LOG_DIR).map(PathBuf::from),
        }
    }
}
