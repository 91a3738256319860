//! Per-share AES-256-GCM encryption and identifier generation.
//!
//! Every share gets its own random key; there is no master key and nothing
//! is derived from the share id. All randomness comes from the operating
//! system CSPRNG, and a failure to read it is reported as
//! [`ShareError::EntropyUnavailable`] rather than papered over with a
//! weaker generator.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::{Result, ShareError};
use crate::types::{Nonce, Plaintext, SecretId, SecretKey, ID_ENTROPY_BYTES, KEY_SIZE, NONCE_SIZE};

/// Fill `buf` from the OS random source.
fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buf).map_err(|e| {
        tracing::error!("OS random source failed: {e}");
        ShareError::EntropyUnavailable
    })
}

/// Generate a fresh 256-bit key.
pub fn generate_key() -> Result<SecretKey> {
    let mut bytes = [0u8; KEY_SIZE];
    fill_random(&mut bytes)?;
    let key = SecretKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Generate a URL-safe share id carrying 128 bits of entropy.
///
/// Collisions are not checked here; the store's insert rejects duplicates.
pub fn generate_id() -> Result<SecretId> {
    let mut bytes = [0u8; ID_ENTROPY_BYTES];
    fill_random(&mut bytes)?;
    Ok(SecretId::from_token(URL_SAFE_NO_PAD.encode(bytes)))
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// Returns `(ciphertext_with_tag, nonce)`.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<(Vec<u8>, Nonce)> {
    let mut nonce = [0u8; NONCE_SIZE];
    fill_random(&mut nonce)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| ShareError::EncryptionFailed)?;
    let ciphertext = cipher
        .encrypt(aes_gcm::Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| ShareError::EncryptionFailed)?;

    Ok((ciphertext, nonce))
}

/// Decrypt data produced by [`encrypt`].
///
/// A wrong key, wrong nonce, or any modified byte fails tag verification
/// and yields [`ShareError::IntegrityError`]; unauthenticated plaintext is
/// never returned.
pub fn decrypt(key: &SecretKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<Plaintext> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| ShareError::IntegrityError)?;
    cipher
        .decrypt(aes_gcm::Nonce::from_slice(nonce), ciphertext)
        .map(Plaintext::from)
        .map_err(|_| ShareError::IntegrityError)
}
