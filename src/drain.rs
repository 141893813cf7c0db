//! Drain Loop
//!
//! Moves the full recoverable balance in a single self-transfer: compute the
//! maximal amount net of fees, submit, and on submit failure recompute from a
//! fresh balance and try again. The loop is bounded by a configurable attempt
//! budget so a flaky node cannot spin it forever.
//!
//! States: `Computing → Submitting → {Done, Retry}`. Balance and fee
//! estimation failures propagate; only the submit step is retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

// ----------------------------- Constants -----------------------------

/// Default fee rate per gas unit (wei) used to reserve headroom for the
/// self-transfer.
pub const DEFAULT_FEE_RATE: u128 = 1_200_000_000;

/// Default upper bound on submit attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

// ----------------------------- Errors -----------------------------

/// Transport or node-side failure reported by a [`TransferProvider`].
#[derive(Debug, Error)]
#[error("provider error: {0}")]
pub struct ProviderError(pub String);

/// Terminal failure of a drain run.
#[derive(Debug, Error)]
pub enum DrainError {
    /// Balance query or fee estimation failed; the loop cannot proceed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

// ----------------------------- Provider Surface -----------------------------

/// A self-transfer to be priced and submitted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Destination address (the wallet's own address).
    pub to: String,
    /// Transfer amount in the chain's smallest unit.
    pub value: u128,
    /// Gas limit from the node's estimate.
    pub gas_limit: u128,
}

/// Narrow node surface the drain loop consumes: balance, fee estimation, and
/// submission. Implementations own transport and signing.
pub trait TransferProvider {
    /// Current spendable balance of the wallet.
    fn balance(&self) -> Result<u128, ProviderError>;

    /// Gas estimate for the given transfer.
    fn estimate_gas(&self, tx: &TransferRequest) -> Result<u128, ProviderError>;

    /// Sign and broadcast the transfer, returning the transaction id.
    fn send(&self, tx: &TransferRequest) -> Result<String, ProviderError>;
}

// ----------------------------- Configuration -----------------------------

/// Tuning for one drain run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DrainConfig {
    /// Fee rate per gas unit reserved out of the balance.
    pub fee_rate: u128,
    /// Maximum submit attempts before giving up.
    pub max_attempts: u32,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            fee_rate: DEFAULT_FEE_RATE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

// ----------------------------- Outcome -----------------------------

/// How a drain run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The transfer was accepted by the network.
    Drained {
        /// Transaction id returned by the provider.
        tx_id: String,
        /// Amount moved, net of the fee reserve.
        value: u128,
    },
    /// Nothing left worth moving: balance no longer covers the fee reserve.
    Exhausted,
    /// Every submit attempt failed within the configured budget.
    AttemptsExceeded,
}

// ----------------------------- Drain Loop -----------------------------

/// Drain the wallet's balance to its own address.
///
/// Each attempt re-reads the balance and fee estimate, computes
/// `value = balance - gas_limit * fee_rate`, and stops as soon as that
/// amount is no longer positive, a submit succeeds, or the attempt budget
/// runs out.
pub fn drain_to_self<P: TransferProvider>(
    provider: &P,
    address: &str,
    config: &DrainConfig,
) -> Result<DrainOutcome, DrainError> {
    for attempt in 1..=config.max_attempts {
        // Computing
        let balance = provider.balance()?;
        let mut tx = TransferRequest {
            to: address.to_string(),
            value: balance,
            gas_limit: 0,
        };
        tx.gas_limit = provider.estimate_gas(&tx)?;
        let fee_reserve = tx.gas_limit.saturating_mul(config.fee_rate);
        let Some(value) = balance.checked_sub(fee_reserve).filter(|&v| v > 0) else {
            debug!(balance, fee_reserve, "balance exhausted");
            return Ok(DrainOutcome::Exhausted);
        };
        tx.value = value;

        // Submitting
        debug!(attempt, value = tx.value, gas_limit = tx.gas_limit, "submitting self-transfer");
        match provider.send(&tx) {
            Ok(tx_id) => return Ok(DrainOutcome::Drained { tx_id, value }),
            Err(e) => {
                warn!(attempt, error = %e, "submit failed, retrying");
            }
        }
    }
    Ok(DrainOutcome::AttemptsExceeded)
}

// ----------------------------- Tests -----------------------------
