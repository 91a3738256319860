//! End-to-end read-once properties over both storage backends.

use std::sync::Arc;

use burnlink_integration_tests::{live_count, memory_service, race_redeem, sqlite_service};
use burnlink_secrets::{
    ExpiryReaper, ManualClock, MemorySecretStore, SecretStore, ShareError, ShareService,
};
use chrono::Utc;
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_fifty_redeemers_memory() {
    let (service, _clock) = memory_service();
    let service = Arc::new(service);
    let id = service.create_share(b"only once").await.unwrap();

    let (ok, not_found) = race_redeem(service.clone(), &id, 50).await;
    assert_eq!(ok, 1);
    assert_eq!(not_found, 49);
    assert_eq!(live_count(&service).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_fifty_redeemers_sqlite() {
    let dir = TempDir::new().unwrap();
    let (service, _clock) = sqlite_service(&dir.path().join("shares.db")).await;
    let service = Arc::new(service);
    let id = service.create_share(b"only once").await.unwrap();

    let (ok, not_found) = race_redeem(service.clone(), &id, 50).await;
    assert_eq!(ok, 1);
    assert_eq!(not_found, 49);
    assert_eq!(live_count(&service).await, 0);
}

#[tokio::test]
async fn test_redeem_after_ttl_is_not_found_on_both_backends() {
    let dir = TempDir::new().unwrap();
    let (memory, memory_clock) = memory_service();
    let (sqlite, sqlite_clock) = sqlite_service(&dir.path().join("shares.db")).await;

    let memory_id = memory.create_share(b"late").await.unwrap();
    let sqlite_id = sqlite.create_share(b"late").await.unwrap();

    let past_ttl = chrono::Duration::hours(2) + chrono::Duration::seconds(1);
    memory_clock.advance(past_ttl);
    sqlite_clock.advance(past_ttl);

    assert!(matches!(
        memory.redeem_share(&memory_id).await,
        Err(ShareError::NotFound)
    ));
    assert!(matches!(
        sqlite.redeem_share(&sqlite_id).await,
        Err(ShareError::NotFound)
    ));
}

#[tokio::test]
async fn test_reaper_and_redeem_agree() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::with_clock(clock.clone()));
    let service = ShareService::new(store.clone());

    let expired = service.create_share(b"expired").await.unwrap();
    clock.advance(chrono::Duration::hours(1));
    let fresh = service.create_share(b"fresh").await.unwrap();
    clock.advance(chrono::Duration::hours(1));

    let reaper = ExpiryReaper::new(store, std::time::Duration::from_secs(300));
    assert_eq!(reaper.sweep_once().await.unwrap(), 1);

    assert!(matches!(
        service.redeem_share(&expired).await,
        Err(ShareError::NotFound)
    ));
    assert_eq!(service.redeem_share(&fresh).await.unwrap().expose(), b"fresh");
}

#[tokio::test]
async fn test_shares_survive_reopen_until_redeemed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shares.db");

    let id = {
        let (service, _clock) = sqlite_service(&path).await;
        service.create_share(b"persisted").await.unwrap()
    };

    let (service, _clock) = sqlite_service(&path).await;
    assert_eq!(
        service.redeem_share(&id).await.unwrap().expose(),
        b"persisted"
    );

    let (service, _clock) = sqlite_service(&path).await;
    assert!(matches!(
        service.redeem_share(&id).await,
        Err(ShareError::NotFound)
    ));
}

#[tokio::test]
async fn test_many_shares_have_unique_ids() {
    let (service, _clock) = memory_service();
    let mut ids = std::collections::HashSet::new();
    for _ in 0..500 {
        let id = service.create_share(b"same plaintext").await.unwrap();
        assert!(ids.insert(id.as_str().to_string()));
    }
    assert_eq!(live_count(&service).await, 500);
}

#[tokio::test]
async fn test_stores_are_isolated() {
    let (a, _) = memory_service();
    let (b, _) = memory_service();
    let id = a.create_share(b"mine").await.unwrap();

    assert!(matches!(b.redeem_share(&id).await, Err(ShareError::NotFound)));
    assert!(a.redeem_share(&id).await.is_ok());
}
