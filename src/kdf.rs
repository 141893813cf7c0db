//! Key Derivation & Verification
//!
//! Derives the share-decryption key from the server-issued recovery code and
//! salt via PBKDF2-HMAC-SHA512, and produces a fingerprint the escrow service
//! uses to confirm the right key was derived without ever seeing the key.
//!
//! The iteration count is fixed protocol-wide: it is what makes brute-forcing
//! a leaked recovery code expensive, and changing it changes every derived
//! key.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec;
use crate::error::RecoveryError;

/// PBKDF2 iteration count, fixed by the escrow protocol.
pub const PBKDF2_ITERATIONS: u32 = 2_100_000;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

// ----------------------------- Derived Key -----------------------------

/// The symmetric key derived from a recovery code and salt.
///
/// Opaque to callers: the raw bytes are only reachable inside this crate (for
/// the fingerprint and the AEAD), and the buffer is wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// Derive the share-decryption key from the recovery code and salt.
///
/// Deterministic and intentionally expensive. Empty inputs are a caller
/// contract violation and fail eagerly with
/// [`RecoveryError::InvalidInput`].
pub fn derive_key(recovery_code: &[u8], salt: &[u8]) -> Result<DerivedKey, RecoveryError> {
    if recovery_code.is_empty() {
        return Err(RecoveryError::InvalidInput("empty recovery code"));
    }
    if salt.is_empty() {
        return Err(RecoveryError::InvalidInput("empty salt"));
    }
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha512>(recovery_code, salt, PBKDF2_ITERATIONS, &mut key);
    Ok(DerivedKey(key))
}

// ----------------------------- Fingerprint -----------------------------

/// Codec-encoded SHA-256 digest of a derived key's raw bytes.
///
/// A pure function of the key: the escrow service holds the expected value
/// and releases shares only when the presented fingerprint matches, so the
/// key itself never crosses the wire.
#[derive(Debug, Clone)]
pub struct KeyFingerprint(String);

impl KeyFingerprint {
    /// The encoded fingerprint text sent to the collaborator.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for KeyFingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for KeyFingerprint {}

/// Compute the verification fingerprint of a derived key.
pub fn fingerprint(key: &DerivedKey) -> KeyFingerprint {
    let digest = Sha256::digest(key.as_bytes());
    KeyFingerprint(codec::encode(&digest))
}

// ----------------------------- Tests -----------------------------
