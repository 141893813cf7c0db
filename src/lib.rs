//! Shard-Recovery: Recovery Key Reconstruction Engine
//!
//! Reconstructs a wallet's seed entropy from two escrowed shares:
//! - a custom variable-base codec for the service's text encoding
//! - PBKDF2-HMAC-SHA512 key derivation with a verifiable fingerprint
//! - AES-256-GCM decryption of the encrypted share
//! - 2-of-2 threshold combination over GF(256)
//!
//! # Flow
//!
//! One reconstruction attempt fetches the recovery code and derivation salt
//! concurrently, derives the decryption key, proves possession of it to the
//! escrow service via a SHA-256 fingerprint, decrypts the second share, and
//! interpolates both shares at zero to recover the secret. Everything lives
//! in memory for the duration of a single run and is wiped on drop.
//!
//! # Collaborators
//!
//! The escrow service is reached through the [`recover::RecoveryApi`] trait;
//! a blocking HTTP implementation ships behind the `http-client` feature.
//! The optional drain step talks to a node through
//! [`drain::TransferProvider`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod combine;
pub mod decrypt;
pub mod drain;
pub mod error;
pub mod kdf;
pub mod recover;

#[cfg(feature = "http-client")]
pub mod client;

// Re-export commonly used types
pub use combine::combine;
pub use decrypt::decrypt_share;
pub use drain::{drain_to_self, DrainConfig, DrainOutcome, TransferProvider};
pub use error::RecoveryError;
pub use kdf::{derive_key, fingerprint, DerivedKey, KeyFingerprint};
pub use recover::{reconstruct_secret, Credentials, RecoveryApi, Secret};

#[cfg(feature = "http-client")]
pub use client::{HttpRecoveryClient, RecoveryServiceConfig};
