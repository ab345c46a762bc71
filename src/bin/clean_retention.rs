use anyhow::Context;
use chrono::Local;
use tracing::{error, info};

use s3_topic_cleanup::config::{LogConfig, RetentionCleanerConfig};
use s3_topic_cleanup::handlers::run_retention_cleanup;
use s3_topic_cleanup::logging::init_tracing;
use s3_topic_cleanup::s3::S3Store;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _guard = init_tracing(&LogConfig::from_env(), "clean-retention");

    let config = RetentionCleanerConfig::from_env().context("loading configuration")?;
    let store = S3Store::connect(&config.store).await;
    if config.schedule.frequency.is_some() {
        store
            .check_access()
            .await
            .with_context(|| format!("checking access to bucket {}", store.bucket()))?;
    }

    let now = Local::now().naive_local();
    let report = run_retention_cleanup(&store, &config.schedule, now)
        .await
        .inspect_err(|e| error!("Retention cleanup failed: {}", e))?;

    if let Some(report) = report {
        info!(
            "Examined {} topics: deleted {} ({} objects), kept {}",
            report.prefixes_examined,
            report.prefixes_deleted,
            report.objects_deleted,
            report.prefixes_kept
        );
    }
    Ok(())
}
