//! Error taxonomy for secret reconstruction.
//!
//! Every core operation either succeeds or fails with one of these kinds;
//! nothing is swallowed or retried below the orchestrator, so the kind that
//! reaches the caller identifies the failing step directly.

use thiserror::Error;

/// Failure kinds surfaced by the reconstruction core.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Decoding encountered a character outside the 64-symbol alphabet.
    #[error("invalid symbol {0:?} in encoded text")]
    InvalidSymbol(char),

    /// Empty or malformed derivation input (caller contract violation).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// AEAD tag mismatch: wrong key, wrong IV, or tampered ciphertext.
    /// A hard stop, never a retry.
    #[error("share decryption failed authentication")]
    AuthenticationFailure,

    /// Share count or shape mismatch in the combiner.
    #[error("invalid share set: {0}")]
    InvalidShareSet(&'static str),

    /// The collaborator refused a fetch (fingerprint mismatch, auth failure,
    /// transport error). External to the core; carries the remote diagnostic.
    #[error("collaborator rejected request: {0}")]
    CollaboratorRejected(String),
}
