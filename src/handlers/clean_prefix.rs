use tracing::info;

use super::CleanupReport;
use crate::error::Result;
use crate::s3::{DELIMITER, ObjectStore, delete_keys, list_all_keys, prefix_from_path};

/// Deletes every object under the prefix named by `target_path`
/// (`s3://bucket/topics_X` deletes everything under `topics_X/`).
pub async fn clean_prefix<S>(store: &S, target_path: &str) -> Result<CleanupReport>
where
    S: ObjectStore + ?Sized,
{
    let prefix = format!("{}{}", prefix_from_path(target_path)?, DELIMITER);
    info!("Getting S3 key names with prefix: {}", prefix);

    let keys = list_all_keys(store, &prefix).await?;
    info!("Found {} keys with prefix {}", keys.len(), prefix);

    let objects_deleted = delete_keys(store, &keys).await?;
    info!("All objects deleted with prefix {}", prefix);

    Ok(CleanupReport {
        prefixes_examined: 1,
        prefixes_deleted: usize::from(objects_deleted > 0),
        prefixes_kept: 0,
        objects_deleted,
    })
}
