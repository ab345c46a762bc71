use chrono::NaiveDateTime;

use crate::error::{CleanupError, Result};

pub const DELIMITER: &str = "/";

/// Layout of the creation time the export job embeds after the first `_`.
const TOPIC_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Extracts the deletion prefix from a path such as `s3://bucket/topics_X`:
/// the fourth `/`-delimited segment.
pub fn prefix_from_path(path: &str) -> Result<String> {
    let segment = path.split(DELIMITER).nth(3).ok_or_else(|| CleanupError::MalformedInput {
        input: path.to_string(),
        reason: "expected at least four '/'-delimited segments",
    })?;
    if segment.is_empty() {
        return Err(CleanupError::MalformedInput {
            input: path.to_string(),
            reason: "prefix segment is empty",
        });
    }
    Ok(segment.to_string())
}

/// Normalizes a directory-style path into a listing prefix.
///
/// `s3://bucket/exports/2024` and `exports/2024` both become `exports/2024/`;
/// an empty path or a bare bucket URL lists the bucket root.
pub fn directory_prefix(path: &str) -> String {
    let path = path.trim();
    let key_path = match path.strip_prefix("s3://") {
        Some(rest) => rest.split_once(DELIMITER).map(|(_, p)| p).unwrap_or(""),
        None => path,
    };
    let key_path = key_path.trim_start_matches('/');
    if key_path.is_empty() || key_path.ends_with('/') {
        key_path.to_string()
    } else {
        format!("{}/", key_path)
    }
}

/// Reads the creation time embedded in a topic prefix like
/// `orders_2024-03-01T10:00:00/`.
///
/// Prefixes without `_` are not topics and yield `None`. A topic whose
/// timestamp does not parse is an error.
pub fn topic_timestamp(prefix: &str) -> Result<Option<NaiveDateTime>> {
    let Some((_, rest)) = prefix.split_once('_') else {
        return Ok(None);
    };
    let value: String = rest
        .split('_')
        .next()
        .unwrap_or_default()
        .replace(DELIMITER, "");

    NaiveDateTime::parse_from_str(&format!("{}.000000", value), TOPIC_TIME_FORMAT)
        .map(Some)
        .map_err(|source| CleanupError::Timestamp {
            prefix: prefix.to_string(),
            value,
            source,
        })
}
