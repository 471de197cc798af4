//! Report Expiry Sweeper
//!
//! Periodically purges report rows whose expiry has passed, in one bulk
//! delete per tick. The sweeper never talks to the cache: a post's cached
//! `is_public` snapshot may stay stale for up to the cache entry's TTL
//! after the underlying report expires. That staleness is bounded and
//! accepted; the store remains authoritative.
//!
//! A failed sweep is logged and retried at the next tick. It is never
//! fatal to the serving path.

use crate::db::report_repo;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tokio::time::sleep;

pub async fn start_report_sweeper(db: PgPool, interval: Duration) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Starting report sweeper background job"
    );

    loop {
        // Wait for the next tick
        sleep(interval).await;

        let cycle_start = Instant::now();

        match sweep(&db).await {
            Ok(purged) => {
                tracing::info!(
                    purged,
                    duration_ms = cycle_start.elapsed().as_millis() as u64,
                    "Report sweep completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    duration_ms = cycle_start.elapsed().as_millis() as u64,
                    "Report sweep failed; retrying at next tick"
                );
            }
        }
    }
}

/// One sweep pass. Idempotent: a second pass with no new expirations
/// deletes nothing.
pub async fn sweep(db: &PgPool) -> Result<u64, sqlx::Error> {
    report_repo::delete_expired(db).await
}
