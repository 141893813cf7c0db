//! Reconstruction Orchestrator
//!
//! Sequences one reconstruction attempt end to end: fetch the recovery code
//! and salt concurrently, derive the key, present its fingerprint to the
//! escrow service, decrypt the encrypted share, and combine both shares into
//! the wallet's seed entropy.
//!
//! Every entity is created fresh per attempt and dropped when the run ends;
//! the derived key never leaves this module except by reference to the
//! decryptor. Any step's failure halts the run; retries, if any, belong to
//! the caller.

use std::fmt;

use serde::Deserialize;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec;
use crate::combine::combine;
use crate::decrypt::decrypt_share;
use crate::error::RecoveryError;
use crate::kdf::{derive_key, fingerprint, KeyFingerprint};

// ----------------------------- Credentials -----------------------------

/// Session credentials for the escrow service.
///
/// Injected explicitly rather than read from ambient storage so the
/// orchestrator has no hidden inputs.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// Bearer token authorizing the recovery session.
    pub bearer_token: String,
    /// Application identifier sent with every request.
    pub app_id: String,
    /// The wallet address whose escrow record is being recovered.
    pub wallet_address: String,
}

// ----------------------------- Collaborator Surface -----------------------------

/// Escrow record: the server-issued recovery code.
#[derive(Clone, Debug, Deserialize)]
pub struct EscrowResponse {
    /// UTF-8 recovery code used as the derivation password.
    pub recovery_code: String,
}

/// Derivation salt, codec-encoded.
#[derive(Clone, Debug, Deserialize)]
pub struct SaltResponse {
    /// Codec-encoded salt bytes.
    pub recovery_key_derivation_salt: String,
}

/// Both shares, released only after the fingerprint check passed server-side.
#[derive(Clone, Debug, Deserialize)]
pub struct SharesResponse {
    /// Plaintext share, codec-encoded.
    pub share: String,
    /// Ciphertext of the second share (tag appended), codec-encoded.
    pub encrypted_recovery_share: String,
    /// AES-GCM initialization vector for the second share, codec-encoded.
    pub encrypted_recovery_share_iv: String,
}

/// The narrow collaborator surface the orchestrator consumes.
///
/// Implementations own transport, timeouts, and authentication; any fetch
/// failure, including a server-side fingerprint mismatch, surfaces as
/// [`RecoveryError::CollaboratorRejected`].
pub trait RecoveryApi {
    /// Fetch the escrow record holding the recovery code.
    fn fetch_escrow(&self) -> Result<EscrowResponse, RecoveryError>;

    /// Fetch the key-derivation salt.
    fn fetch_salt(&self) -> Result<SaltResponse, RecoveryError>;

    /// Present the key fingerprint and fetch both shares. The server rejects
    /// the request when the fingerprint does not match its expectation.
    fn fetch_shares(&self, fingerprint: &KeyFingerprint)
        -> Result<SharesResponse, RecoveryError>;
}

// ----------------------------- Secret -----------------------------

/// The reconstructed seed entropy.
///
/// Held transiently and wiped on drop; never persisted by this crate.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// The raw entropy bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the entropy in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Redacted: the entropy must never reach logs or test output.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

// ----------------------------- State Machine -----------------------------

/// Progress of a reconstruction attempt. `Done` is the only terminal success
/// state; any failure aborts the run wherever it stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Attempt created, nothing fetched yet.
    Start,
    /// Recovery code and salt fetches in flight.
    FetchingInputs,
    /// PBKDF2 key stretching.
    Deriving,
    /// Fingerprint presented, waiting for the share release.
    AwaitingShares,
    /// Decrypting the escrowed share.
    Decrypting,
    /// Interpolating the two shares.
    Combining,
    /// Secret produced.
    Done,
}

fn enter(phase: Phase) {
    debug!(?phase, "reconstruction phase");
}

// ----------------------------- Orchestration -----------------------------

/// Run one reconstruction attempt against the given collaborator.
///
/// The recovery code and salt fetches run concurrently; everything after is
/// strictly sequential since each step consumes the previous step's output.
pub fn reconstruct_secret<C>(client: &C) -> Result<Secret, RecoveryError>
where
    C: RecoveryApi + Sync,
{
    enter(Phase::Start);

    enter(Phase::FetchingInputs);
    let (escrow, salt_resp) = std::thread::scope(|s| {
        let escrow = s.spawn(|| client.fetch_escrow());
        let salt = s.spawn(|| client.fetch_salt());
        (escrow.join(), salt.join())
    });
    let escrow = escrow
        .map_err(|_| RecoveryError::CollaboratorRejected("escrow fetch panicked".into()))??;
    let salt_resp = salt_resp
        .map_err(|_| RecoveryError::CollaboratorRejected("salt fetch panicked".into()))??;
    let salt = codec::decode(&salt_resp.recovery_key_derivation_salt)?;

    enter(Phase::Deriving);
    let key = derive_key(escrow.recovery_code.as_bytes(), &salt)?;
    let fp = fingerprint(&key);

    enter(Phase::AwaitingShares);
    let shares = client.fetch_shares(&fp)?;
    let share_a = codec::decode(&shares.share)?;
    let ciphertext = codec::decode(&shares.encrypted_recovery_share)?;
    let iv = codec::decode(&shares.encrypted_recovery_share_iv)?;

    enter(Phase::Decrypting);
    let share_b = decrypt_share(&ciphertext, &iv, &key)?;

    enter(Phase::Combining);
    let secret = combine(&share_a, &share_b)?;

    enter(Phase::Done);
    Ok(Secret(secret))
}

// ----------------------------- Tests -----------------------------
