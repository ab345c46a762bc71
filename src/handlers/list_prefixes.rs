use tracing::info;

use crate::error::Result;
use crate::s3::{ObjectStore, directory_prefix, list_common_prefixes};

/// Lists the top-level prefixes directly under `path`.
pub async fn list_prefixes<S>(store: &S, path: &str) -> Result<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let prefix = directory_prefix(path);
    info!("Listing prefixes under '{}'", prefix);
    let prefixes = list_common_prefixes(store, &prefix).await?;
    info!("Found {} prefixes", prefixes.len());
    Ok(prefixes)
}
