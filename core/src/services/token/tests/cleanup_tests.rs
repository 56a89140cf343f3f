//! Unit tests for the retention cleanup service

use std::sync::Arc;

use chrono::Duration;

use super::support::t0;
use crate::domain::entities::token::RefreshTokenRecord;
use crate::repositories::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
use crate::services::token::{ManualClock, TokenCleanupConfig, TokenCleanupService};

async fn seeded_store() -> Arc<InMemoryRefreshTokenRepository> {
    let store = Arc::new(InMemoryRefreshTokenRepository::new());

    // Expired 30 days ago
    let stale = RefreshTokenRecord::new("a@school.test", "stale", t0() - Duration::days(30), t0() - Duration::days(37));
    // Revoked 10 days ago, still within its lifetime
    let mut revoked = RefreshTokenRecord::new("b@school.test", "revoked", t0() + Duration::days(1), t0() - Duration::days(6));
    revoked.mark_revoked(t0() - Duration::days(10));
    // Revoked yesterday
    let mut recent = RefreshTokenRecord::new("c@school.test", "recent", t0() + Duration::days(5), t0() - Duration::days(2));
    recent.mark_revoked(t0() - Duration::days(1));
    // Live
    let live = RefreshTokenRecord::new("d@school.test", "live", t0() + Duration::days(7), t0());

    for record in [&stale, &revoked, &recent, &live] {
        store.save(record).await.unwrap();
    }
    store
}

#[tokio::test]
async fn test_run_cleanup_removes_records_past_grace() {
    let store = seeded_store().await;
    let service = TokenCleanupService::new(store.clone(), TokenCleanupConfig::default())
        .with_clock(Arc::new(ManualClock::new(t0())));

    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.dead_tokens_deleted, 2);
    assert!(store.find_by_hash("recent").await.unwrap().is_some());
    assert!(store.find_by_hash("live").await.unwrap().is_some());
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let store = seeded_store().await;
    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };
    let service = Arc::new(
        TokenCleanupService::new(store.clone(), config).with_clock(Arc::new(ManualClock::new(t0()))),
    );

    let result = service.run_cleanup().await.unwrap();
    assert_eq!(result.dead_tokens_deleted, 0);
    assert_eq!(store.len().await, 4);
    assert!(service.start_background_task().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_start() {
    let store = seeded_store().await;
    let service = Arc::new(
        TokenCleanupService::new(store.clone(), TokenCleanupConfig::default())
            .with_clock(Arc::new(ManualClock::new(t0()))),
    );

    let handle = service.start_background_task().expect("cleanup enabled");
    // The first interval tick completes immediately.
    for _ in 0..100 {
        tokio::task::yield_now().await;
        if store.len().await == 2 {
            break;
        }
    }

    assert_eq!(store.len().await, 2);
    handle.abort();
}
