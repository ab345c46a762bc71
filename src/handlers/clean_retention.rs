use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::{CleanupReport, LOG_TIME_FORMAT};
use crate::error::Result;
use crate::retention::RetentionSchedule;
use crate::s3::{ObjectStore, delete_keys, list_all_common_prefixes, list_all_keys, topic_timestamp};

/// Applies `schedule` as of `now`.
///
/// Returns `Ok(None)` without touching the store when no frequency is set.
pub async fn run_retention_cleanup<S>(
    store: &S,
    schedule: &RetentionSchedule,
    now: NaiveDateTime,
) -> Result<Option<CleanupReport>>
where
    S: ObjectStore + ?Sized,
{
    let Some(policy) = schedule.policy() else {
        info!("frequency is null, nothing to clean");
        return Ok(None);
    };

    info!("frequency is {}", policy.frequency);
    info!("Current time is {}", now.format(LOG_TIME_FORMAT));

    let window = policy.window()?;
    let unit = window.frequency.unit();
    for component in &window.components {
        info!("{} in {}: {}", component.period, unit, component.span);
    }
    info!("max limit in {}: {}", unit, window.span);

    let cutoff = window.cutoff(now)?;
    info!(
        "deleting every s3 object before {}",
        cutoff.format(LOG_TIME_FORMAT)
    );

    clean_expired_topics(store, cutoff).await.map(Some)
}

/// Deletes every object under each top-level topic prefix created at or
/// before `cutoff`.
///
/// Prefixes without an embedded timestamp are skipped. A malformed
/// timestamp aborts the run.
pub async fn clean_expired_topics<S>(store: &S, cutoff: NaiveDateTime) -> Result<CleanupReport>
where
    S: ObjectStore + ?Sized,
{
    let mut report = CleanupReport::default();

    for topic in list_all_common_prefixes(store, "").await? {
        let Some(created) = topic_timestamp(&topic)? else {
            debug!("Skipping {}: not a topic prefix", topic);
            continue;
        };
        report.prefixes_examined += 1;

        if created > cutoff {
            info!(
                "Keeping {} (created {})",
                topic,
                created.format(LOG_TIME_FORMAT)
            );
            report.prefixes_kept += 1;
            continue;
        }

        info!("Deleting {} (created {})", topic, created.format(LOG_TIME_FORMAT));
        let keys = list_all_keys(store, &topic).await?;
        info!("All {} keys with prefix {} found", keys.len(), topic);

        report.objects_deleted += delete_keys(store, &keys).await?;
        report.prefixes_deleted += 1;
        info!("all objects deleted with prefix {}", topic);
    }

    Ok(report)
}
