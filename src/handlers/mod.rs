pub mod clean_prefix;
pub mod clean_retention;
pub mod list_prefixes;

pub use clean_prefix::clean_prefix;
pub use clean_retention::{clean_expired_topics, run_retention_cleanup};
pub use list_prefixes::list_prefixes;

/// Timestamp layout used in log lines.
pub(crate) const LOG_TIME_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";

/// What a cleanup run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Prefixes compared against the deletion rule.
    pub prefixes_examined: usize,
    pub prefixes_deleted: usize,
    /// Prefixes kept because they are newer than the cutoff.
    pub prefixes_kept: usize,
    pub objects_deleted: usize,
}
