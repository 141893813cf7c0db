//! Share Decryptor
//!
//! Authenticated decryption of the escrowed share under the derived key.
//! The ciphertext arrives with its GCM tag appended (WebCrypto layout); a tag
//! mismatch means wrong key, wrong IV, or tampering and is terminal.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::error::RecoveryError;
use crate::kdf::DerivedKey;

/// Required IV length for AES-256-GCM (96-bit nonce).
pub const IV_LEN: usize = 12;

/// Decrypt one escrowed share with AES-256-GCM.
///
/// Fails with [`RecoveryError::AuthenticationFailure`] when the embedded tag
/// does not verify; this is the expected symptom of a skipped or failed
/// fingerprint check and must propagate as a hard stop.
pub fn decrypt_share(
    ciphertext: &[u8],
    iv: &[u8],
    key: &DerivedKey,
) -> Result<Vec<u8>, RecoveryError> {
    if iv.len() != IV_LEN {
        return Err(RecoveryError::InvalidInput("iv must be 12 bytes"));
    }
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| RecoveryError::InvalidInput("bad key length"))?;
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| RecoveryError::AuthenticationFailure)
}

// ----------------------------- Tests -----------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::DerivedKey;

    // AESGCM(k).encrypt(iv, b"share-plaintext-16") with k = 00 01 .. 1f and
    // the IV below, tag appended.
    const IV: [u8; 12] = [
        0x0f, 0x0e, 0x0d, 0x0c, 0x0b, 0x0a, 0x09, 0x08, 0x07, 0x06, 0x05, 0x04,
    ];
    const CT_HEX: &str =
        "d758d02e3efadfc28ab6df2b5de2fd2c5850ec7823c483c3d758c698a9c0a8bb4512";

    fn fixture_key() -> DerivedKey {
        let mut k = [0u8; 32];
        for (i, b) in k.iter_mut().enumerate() {
            *b = i as u8;
        }
        DerivedKey::from_bytes(k)
    }

    #[test]
    fn decrypts_pinned_ciphertext() {
        let ct = hex::decode(CT_HEX).unwrap();
        let pt = decrypt_share(&ct, &IV, &fixture_key()).unwrap();
        assert_eq!(pt, b"share-plaintext-16");
    }

    #[test]
    fn roundtrip_under_same_key_and_iv() {
        let key = fixture_key();
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).unwrap();
        let ct = cipher
            .encrypt(Nonce::from_slice(&IV), b"wallet entropy share".as_ref())
            .unwrap();
        assert_eq!(
            decrypt_share(&ct, &IV, &key).unwrap(),
            b"wallet entropy share"
        );
    }

    #[test]
    fn flipped_ciphertext_byte_fails_authentication() {
        let mut ct = hex::decode(CT_HEX).unwrap();
        ct[0] ^= 0x01;
        assert!(matches!(
            decrypt_share(&ct, &IV, &fixture_key()),
            Err(RecoveryError::AuthenticationFailure)
        ));
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let ct = hex::decode(CT_HEX).unwrap();
        let key = DerivedKey::from_bytes([0xAA; 32]);
        assert!(matches!(
            decrypt_share(&ct, &IV, &key),
            Err(RecoveryError::AuthenticationFailure)
        ));
    }

    #[test]
    fn short_iv_rejected() {
        assert!(matches!(
            decrypt_share(b"anything", &[0u8; 8], &fixture_key()),
            Err(RecoveryError::InvalidInput(_))
        ));
    }
}
