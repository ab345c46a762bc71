use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::s3::client::create_s3_client;

/// One response of a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Groupings returned when a delimiter was supplied.
    pub common_prefixes: Vec<String>,
    pub next_continuation_token: Option<String>,
}

/// The subset of the object-store API the cleanup utilities rely on.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists one page of keys under `prefix`, grouping on `delimiter` if given.
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation_token: Option<String>,
    ) -> Result<ListPage>;

    async fn delete_object(&self, key: &str) -> Result<()>;
}

/// `ObjectStore` backed by one S3 bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub async fn connect(config: &StoreConfig) -> Self {
        Self::new(create_s3_client(config).await, &config.bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Tests access to the bucket by attempting to head it.
    pub async fn check_access(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation_token: Option<String>,
    ) -> Result<ListPage> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_prefix(Some(prefix.to_string()).filter(|p| !p.is_empty()))
            .set_delimiter(delimiter.map(str::to_string))
            .set_continuation_token(continuation_token)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        let page = ListPage {
            keys: resp
                .contents()
                .iter()
                .filter_map(|obj| obj.key())
                .map(str::to_string)
                .collect(),
            common_prefixes: resp
                .common_prefixes()
                .iter()
                .filter_map(|cp| cp.prefix())
                .map(str::to_string)
                .collect(),
            next_continuation_token: resp.next_continuation_token().map(str::to_string),
        };
        debug!(
            "Listed {} keys and {} prefixes under '{}' (more: {})",
            page.keys.len(),
            page.common_prefixes.len(),
            prefix,
            page.next_continuation_token.is_some()
        );
        Ok(page)
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        debug!("Deleted: {}", key);
        Ok(())
    }
}
