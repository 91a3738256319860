//! Core types for read-once shares.
//!
//! Everything in here that wraps secret material redacts itself in `Debug`
//! and `Display`, and key material is zeroed on drop.

use std::fmt;

use burnlink_core::SecretBytes;
use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, ShareError};

/// Length of a per-share symmetric key in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Length of an AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Random bytes behind every share id (128 bits).
pub const ID_ENTROPY_BYTES: usize = 16;

/// Length of an encoded share id: 16 bytes of base64url without padding.
pub const ID_LEN: usize = 22;

/// Per-encryption nonce.
pub type Nonce = [u8; NONCE_SIZE];

/// Opaque, URL-safe share identifier.
///
/// Both `Debug` and `Display` are redacted so an id cannot slip into a log
/// line through `{}` or `{:?}`. Use [`SecretId::as_str`] where the raw token
/// is genuinely needed, e.g. when building the share URL.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretId(String);

impl SecretId {
    /// Wrap a token produced by [`crate::crypto::generate_id`].
    pub(crate) fn from_token(token: String) -> Self {
        Self(token)
    }

    /// Parse an id received from the outside (e.g. a URL path segment).
    ///
    /// Malformed input is reported as [`ShareError::NotFound`], the same
    /// answer a well-formed but unknown id gets.
    pub fn parse(s: &str) -> Result<Self> {
        let well_formed = s.len() == ID_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(ShareError::NotFound)
        }
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretId([REDACTED])")
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Per-share AES-256 key. Generated fresh for every share, never derived
/// from the id.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Rebuild a key from stored bytes. Returns `None` on a length mismatch.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; KEY_SIZE] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// One stored share.
///
/// There is no consumed flag: a record that exists is unconsumed, and a
/// consumed record is gone. Ciphertext, nonce and key are wiped when the
/// record is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretRecord {
    #[zeroize(skip)]
    pub id: SecretId,
    pub ciphertext: Vec<u8>,
    pub nonce: Nonce,
    pub key: SecretKey,
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,
    #[zeroize(skip)]
    pub expires_at: DateTime<Utc>,
}

impl SecretRecord {
    /// Returns true once `now` has reached `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord")
            .field("id", &self.id)
            .field("ciphertext_len", &self.ciphertext.len())
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// A redeemed secret held in memory.
///
/// Wraps [`SecretBytes`] so the plaintext is zeroed on drop. Debug and
/// Display both emit `[REDACTED]` to prevent accidental logging.
#[derive(PartialEq, Eq)]
pub struct Plaintext {
    inner: SecretBytes,
}

impl Plaintext {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: SecretBytes::new(value),
        }
    }

    /// Expose the plaintext bytes. Use sparingly.
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Plaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Plaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<Vec<u8>> for Plaintext {
    fn from(v: Vec<u8>) -> Self {
        Self::new(v)
    }
}
