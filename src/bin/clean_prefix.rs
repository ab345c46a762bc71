use anyhow::Context;
use tracing::{error, info};

use s3_topic_cleanup::config::{LogConfig, PrefixCleanerConfig};
use s3_topic_cleanup::handlers::clean_prefix;
use s3_topic_cleanup::logging::init_tracing;
use s3_topic_cleanup::s3::S3Store;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _guard = init_tracing(&LogConfig::from_env(), "clean-prefix");

    let config = PrefixCleanerConfig::from_env().context("loading configuration")?;
    let store = S3Store::connect(&config.store).await;
    info!(
        "Cleaning {} in bucket {}",
        config.target_path,
        store.bucket()
    );

    let report = clean_prefix(&store, &config.target_path)
        .await
        .inspect_err(|e| error!("Prefix cleanup failed: {}", e))?;

    info!("Deleted {} objects", report.objects_deleted);
    Ok(())
}
