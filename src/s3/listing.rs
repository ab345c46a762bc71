//! Listing and deletion loops over an [`ObjectStore`].

use tracing::debug;

use crate::error::Result;
use crate::s3::prefix::DELIMITER;
use crate::s3::store::ObjectStore;

/// Collects every key under `prefix`, following continuation tokens until
/// the store stops returning one.
pub async fn list_all_keys<S>(store: &S, prefix: &str) -> Result<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let mut keys = Vec::new();
    let mut continuation_token = None;
    loop {
        let page = store.list_page(prefix, None, continuation_token).await?;
        keys.extend(page.keys);
        continuation_token = page.next_continuation_token;
        if continuation_token.is_none() {
            break;
        }
        debug!("Fetched {} keys under '{}' so far", keys.len(), prefix);
    }
    Ok(keys)
}

/// Top-level groupings directly under `prefix`, from a single listing call.
pub async fn list_common_prefixes<S>(store: &S, prefix: &str) -> Result<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let page = store.list_page(prefix, Some(DELIMITER), None).await?;
    Ok(page.common_prefixes)
}

/// Like [`list_common_prefixes`] but walks every page.
pub async fn list_all_common_prefixes<S>(store: &S, prefix: &str) -> Result<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let mut prefixes = Vec::new();
    let mut continuation_token = None;
    loop {
        let page = store
            .list_page(prefix, Some(DELIMITER), continuation_token)
            .await?;
        prefixes.extend(page.common_prefixes);
        continuation_token = page.next_continuation_token;
        if continuation_token.is_none() {
            break;
        }
    }
    Ok(prefixes)
}

/// Deletes each key with its own request. Returns how many were deleted.
pub async fn delete_keys<S>(store: &S, keys: &[String]) -> Result<usize>
where
    S: ObjectStore + ?Sized,
{
    for key in keys {
        store.delete_object(key).await?;
    }
    Ok(keys.len())
}
