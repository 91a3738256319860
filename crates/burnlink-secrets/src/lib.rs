//! Read-once encrypted shares for Burnlink.
//!
//! A share is a secret encrypted under its own AES-256-GCM key and stored
//! under a random URL-safe id. It can be redeemed exactly once; after that,
//! or after its time-to-live, it is gone and indistinguishable from an id
//! that never existed.
//!
//! The entry point is [`ShareService`], built over any [`SecretStore`]
//! ([`MemorySecretStore`] or [`SqliteSecretStore`]). [`ExpiryReaper`]
//! reclaims shares that expire unredeemed.

pub mod clock;
pub mod crypto;
pub mod error;
pub mod link;
pub mod reaper;
pub mod service;
pub mod sqlite;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, ShareError};
pub use link::{id_from_url, share_url};
pub use reaper::{ExpiryReaper, ReaperHandle};
pub use service::ShareService;
pub use sqlite::SqliteSecretStore;
pub use store::{MemorySecretStore, SecretStore};
pub use types::{Plaintext, SecretId, SecretKey, SecretRecord};
