//! End-to-end reconstruction against a mock escrow service.
//!
//! Fixture scenario: recovery code "abc123", salt = 16 zero bytes. The
//! derived key's fingerprint is pinned; the encrypted share decrypts under
//! that key and combines with the plaintext share into a pinned 32-byte
//! secret.

use shard_recovery::kdf::KeyFingerprint;
use shard_recovery::recover::{EscrowResponse, SaltResponse, SharesResponse};
use shard_recovery::{
    codec, derive_key, fingerprint, reconstruct_secret, RecoveryApi, RecoveryError,
};

// PBKDF2-HMAC-SHA512("abc123", 16 zero bytes, 2.1M iterations) fingerprint.
const EXPECTED_FINGERPRINT: &str = "0jVQnpDmrL1TXSBVAQU8AieEzH5YT+dLeJSCmYk/tVU=";

// 2-of-2 split of the secret below; share A travels in plaintext, share B is
// AES-256-GCM encrypted under the derived key with the IV below.
const SALT_TEXT: &str = "AAAAAAAAAAAAAAAAAAAAAA==";
const SHARE_A_TEXT: &str = "CjJWfprC7gY6UnauyuIeJkqStt76Ai5GmrLW7goifqYB";
const SHARE_B_CIPHERTEXT: &str =
    "kXwdg4vu6PORVuq9ryDzVZo3dh/8mo6UZyRehvufSrw/7Z3SMlsMa76kXK15dkg0+w==";
const SHARE_B_IV: &str = "AAECAwQFBgcICQoL";
const SECRET_HEX: &str = "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";

/// Mock escrow service: releases shares only for the expected fingerprint,
/// like the real collaborator.
struct MockEscrowService {
    expected_fingerprint: String,
}

impl MockEscrowService {
    fn new() -> Self {
        Self {
            expected_fingerprint: EXPECTED_FINGERPRINT.to_string(),
        }
    }
}

impl RecoveryApi for MockEscrowService {
    fn fetch_escrow(&self) -> Result<EscrowResponse, RecoveryError> {
        Ok(EscrowResponse {
            recovery_code: "abc123".to_string(),
        })
    }

    fn fetch_salt(&self) -> Result<SaltResponse, RecoveryError> {
        Ok(SaltResponse {
            recovery_key_derivation_salt: SALT_TEXT.to_string(),
        })
    }

    fn fetch_shares(
        &self,
        fingerprint: &KeyFingerprint,
    ) -> Result<SharesResponse, RecoveryError> {
        if fingerprint.as_str() != self.expected_fingerprint {
            return Err(RecoveryError::CollaboratorRejected(
                "recovery key hash mismatch".to_string(),
            ));
        }
        Ok(SharesResponse {
            share: SHARE_A_TEXT.to_string(),
            encrypted_recovery_share: SHARE_B_CIPHERTEXT.to_string(),
            encrypted_recovery_share_iv: SHARE_B_IV.to_string(),
        })
    }
}

#[test]
fn full_reconstruction_recovers_pinned_secret() {
    let secret = reconstruct_secret(&MockEscrowService::new()).unwrap();
    assert_eq!(hex::encode(secret.as_bytes()), SECRET_HEX);
    assert_eq!(secret.len(), 32);
}

#[test]
fn fingerprint_matches_server_expectation() {
    let salt = codec::decode(SALT_TEXT).unwrap();
    assert_eq!(salt, vec![0u8; 16]);
    let key = derive_key(b"abc123", &salt).unwrap();
    assert_eq!(fingerprint(&key).as_str(), EXPECTED_FINGERPRINT);
}

#[test]
fn wrong_recovery_code_is_rejected_by_collaborator() {
    // The mock rejects the share request when the presented fingerprint does
    // not match, exactly as the live service would.
    struct WrongCode(MockEscrowService);

    impl RecoveryApi for WrongCode {
        fn fetch_escrow(&self) -> Result<EscrowResponse, RecoveryError> {
            Ok(EscrowResponse {
                recovery_code: "abc124".to_string(),
            })
        }

        fn fetch_salt(&self) -> Result<SaltResponse, RecoveryError> {
            self.0.fetch_salt()
        }

        fn fetch_shares(
            &self,
            fingerprint: &KeyFingerprint,
        ) -> Result<SharesResponse, RecoveryError> {
            self.0.fetch_shares(fingerprint)
        }
    }

    let err = reconstruct_secret(&WrongCode(MockEscrowService::new())).unwrap_err();
    assert!(matches!(err, RecoveryError::CollaboratorRejected(_)));
}

#[test]
fn tampered_ciphertext_fails_authentication() {
    struct Tampered(MockEscrowService);

    impl RecoveryApi for Tampered {
        fn fetch_escrow(&self) -> Result<EscrowResponse, RecoveryError> {
            self.0.fetch_escrow()
        }

        fn fetch_salt(&self) -> Result<SaltResponse, RecoveryError> {
            self.0.fetch_salt()
        }

        fn fetch_shares(
            &self,
            fingerprint: &KeyFingerprint,
        ) -> Result<SharesResponse, RecoveryError> {
            let mut shares = self.0.fetch_shares(fingerprint)?;
            let mut ct = codec::decode(&shares.encrypted_recovery_share)?;
            ct[0] ^= 0x01;
            shares.encrypted_recovery_share = codec::encode(&ct);
            Ok(shares)
        }
    }

    let err = reconstruct_secret(&Tampered(MockEscrowService::new())).unwrap_err();
    assert!(matches!(err, RecoveryError::AuthenticationFailure));
}
