//! Shared fixtures for Burnlink integration tests.

use std::path::Path;
use std::sync::Arc;

use burnlink_secrets::{
    ManualClock, MemorySecretStore, SecretId, ShareError, ShareService, SqliteSecretStore,
};
use chrono::Utc;

/// A service over an in-memory store with a manually driven clock.
pub fn memory_service() -> (ShareService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = Arc::new(MemorySecretStore::with_clock(clock.clone()));
    (ShareService::new(store), clock)
}

/// A service over a SQLite database at `path` with a manually driven clock.
pub async fn sqlite_service(path: &Path) -> (ShareService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = SqliteSecretStore::open_with_clock(path, clock.clone())
        .await
        .expect("open sqlite store");
    (ShareService::new(Arc::new(store)), clock)
}

/// Redeem `id` from `redeemers` concurrent tasks and count the successes.
pub async fn race_redeem(
    service: Arc<ShareService>,
    id: &SecretId,
    redeemers: usize,
) -> (usize, usize) {
    let barrier = Arc::new(tokio::sync::Barrier::new(redeemers));
    let mut handles = Vec::with_capacity(redeemers);
    for _ in 0..redeemers {
        let service = service.clone();
        let id = id.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            service.redeem_share(&id).await
        }));
    }

    let mut ok = 0;
    let mut not_found = 0;
    for handle in handles {
        match handle.await.expect("redeem task panicked") {
            Ok(_) => ok += 1,
            Err(ShareError::NotFound) => not_found += 1,
            Err(e) => panic!("unexpected redeem error: {e}"),
        }
    }
    (ok, not_found)
}

/// Live records in the service's store.
pub async fn live_count(service: &ShareService) -> usize {
    service.live_count().await.expect("count live shares")
}
