//! Background worker that prunes expired sessions.

use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

/// Interval between cleanup runs.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Delete expired sessions once. Returns how many were removed.
pub async fn cleanup_once(pool: &SqlitePool) -> u64 {
    match crate::db::delete_expired_sessions(pool, &Utc::now().to_rfc3339()).await {
        Ok(count) => {
            if count > 0 {
                tracing::info!(expired_sessions = count, "Cleaned up expired sessions");
            }
            count
        }
        Err(e) => {
            tracing::error!("Failed to delete expired sessions: {e:#}");
            0
        }
    }
}

/// Run the cleanup worker until `shutdown` is cancelled.
///
/// Cleans up immediately on start, then every `interval`.
pub async fn run_cleanup_worker(pool: SqlitePool, interval: Duration, shutdown: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Starting session cleanup worker");

    cleanup_once(&pool).await;

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // first tick is immediate

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                cleanup_once(&pool).await;
            }
            () = shutdown.cancelled() => {
                tracing::info!("Session cleanup worker shutting down");
                break;
            }
        }
    }
}
