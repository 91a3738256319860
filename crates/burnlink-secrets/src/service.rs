//! The create/redeem use cases exposed to the web layer.
//!
//! [`ShareService`] is the only thing outside this crate that should touch a
//! [`SecretStore`]. It generates keys and ids, encrypts, and decrypts; the
//! store only ever sees ciphertext records. Cryptographic work always happens
//! outside the store's locks: `redeem_share` decrypts a record that `consume`
//! has already taken out of the store.

use std::sync::Arc;
use std::time::Duration;

use burnlink_core::config::ShareConfig;
use tracing::{debug, error, warn};

use crate::clock::Clock;
use crate::crypto;
use crate::error::{Result, ShareError};
use crate::store::SecretStore;
use crate::types::{Plaintext, SecretId, SecretRecord};

/// Bounds for a configured TTL; anything outside is clamped.
const MIN_TTL_SECS: i64 = 1;
const MAX_TTL_DAYS: i64 = 365;

/// Orchestrates [`crate::crypto`] and a [`SecretStore`].
pub struct ShareService {
    store: Arc<dyn SecretStore>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    max_id_attempts: u32,
}

impl ShareService {
    /// Create a service with the default two-hour TTL.
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self::from_config(store, &ShareConfig::default())
    }

    /// Create a service from the `share` config section.
    ///
    /// Timestamps come from the store's clock so that `created_at` and the
    /// store's expiry checks agree on what "now" is.
    pub fn from_config(store: Arc<dyn SecretStore>, config: &ShareConfig) -> Self {
        let clock = store.clock();
        Self {
            store,
            clock,
            ttl: to_chrono(config.ttl()),
            max_id_attempts: config.max_id_attempts.max(1),
        }
    }

    /// Override the time-to-live for shares created from now on. A zero TTL
    /// is raised to one second.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = to_chrono(ttl);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or_default()
    }

    /// Number of shares that can still be redeemed. Never exposes ids.
    pub async fn live_count(&self) -> Result<usize> {
        self.store.len().await
    }

    /// Encrypt `plaintext` under a fresh key and store it. Returns the id to
    /// embed in the share URL.
    ///
    /// An id collision draws a new id (and key); this is never surfaced.
    /// Running out of attempts means the random source is not behaving, so
    /// it is reported as [`ShareError::EntropyUnavailable`].
    pub async fn create_share(&self, plaintext: &[u8]) -> Result<SecretId> {
        for attempt in 1..=self.max_id_attempts {
            let record = self.seal(plaintext)?;
            let id = record.id.clone();

            match self.store.insert(record).await {
                Ok(()) => {
                    debug!("created share");
                    return Ok(id);
                }
                Err(ShareError::AlreadyExists) => {
                    warn!(attempt, "share id collision, drawing a new id");
                }
                Err(e) => return Err(e),
            }
        }

        error!(
            attempts = self.max_id_attempts,
            "could not allocate a unique share id"
        );
        Err(ShareError::EntropyUnavailable)
    }

    /// Consume the share and return its plaintext. Succeeds at most once per id.
    ///
    /// Absent, consumed, expired and corrupted shares all come back as
    /// [`ShareError::NotFound`]. Corruption is additionally reported through
    /// a `warn!` event, which never includes the id.
    pub async fn redeem_share(&self, id: &SecretId) -> Result<Plaintext> {
        let record = self.store.consume(id).await.map_err(conceal_integrity)?;
        crypto::decrypt(&record.key, &record.nonce, &record.ciphertext).map_err(conceal_integrity)
    }

    /// Parse a raw token (e.g. a URL path segment) and redeem it.
    pub async fn redeem_token(&self, token: &str) -> Result<Plaintext> {
        let id = SecretId::parse(token)?;
        self.redeem_share(&id).await
    }

    /// Whether a share is still redeemable. A hint for UI only: the answer can
    /// be stale by the time the caller acts on it.
    pub async fn share_exists(&self, id: &SecretId) -> Result<bool> {
        self.store.peek_exists(id).await
    }

    fn seal(&self, plaintext: &[u8]) -> Result<SecretRecord> {
        let key = crypto::generate_key()?;
        let (ciphertext, nonce) = crypto::encrypt(&key, plaintext)?;
        let id = crypto::generate_id()?;
        let created_at = self.clock.now();

        Ok(SecretRecord {
            id,
            ciphertext,
            nonce,
            key,
            created_at,
            expires_at: created_at + self.ttl,
        })
    }
}

fn conceal_integrity(e: ShareError) -> ShareError {
    match e {
        ShareError::IntegrityError => {
            warn!("share failed integrity check on redeem");
            ShareError::NotFound
        }
        other => other,
    }
}

fn to_chrono(ttl: Duration) -> chrono::Duration {
    let min = chrono::Duration::seconds(MIN_TTL_SECS);
    let max = chrono::Duration::days(MAX_TTL_DAYS);
    chrono::Duration::from_std(ttl).map_or(max, |d| d.clamp(min, max))
}
