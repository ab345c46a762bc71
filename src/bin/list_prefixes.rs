use anyhow::Context;
use tracing::error;

use s3_topic_cleanup::config::{LogConfig, PrefixListerConfig};
use s3_topic_cleanup::handlers::list_prefixes;
use s3_topic_cleanup::logging::init_tracing;
use s3_topic_cleanup::s3::S3Store;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _guard = init_tracing(&LogConfig::from_env(), "list-prefixes");

    let config = PrefixListerConfig::from_env().context("loading configuration")?;
    let store = S3Store::connect(&config.store).await;

    let prefixes = list_prefixes(&store, &config.list_path)
        .await
        .inspect_err(|e| error!("Listing prefixes failed: {}", e))?;

    for prefix in prefixes {
        println!("{}", prefix);
    }
    Ok(())
}
