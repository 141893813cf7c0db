//! Secret Combiner
//!
//! Threshold reconstruction for exactly two shares over GF(256) with the AES
//! reduction polynomial 0x11b. Each share is self-describing: the final byte
//! is its x coordinate (1..=255), the preceding bytes are the y values, one
//! per secret byte. Lagrange interpolation at x = 0 recovers the constant
//! term, i.e. the original secret.
//!
//! Only the 2-of-2 path is supported; generalized (k,n) reconstruction is
//! deliberately out of scope.

use crate::error::RecoveryError;

// ----------------------------- GF(256) -----------------------------

fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut p = 0u8;
    for _ in 0..8 {
        if (b & 1) == 1 {
            p ^= a;
        }
        let hi = a & 0x80;
        a <<= 1;
        if hi != 0 {
            a ^= 0x1b; // x^8 reduced by 0x11b
        }
        b >>= 1;
    }
    p
}

fn gf_pow(mut a: u8, mut e: u8) -> u8 {
    let mut r = 1u8;
    while e > 0 {
        if e & 1 == 1 {
            r = gf_mul(r, a);
        }
        a = gf_mul(a, a);
        e >>= 1;
    }
    r
}

// a^254 == a^-1; callers guarantee a != 0.
fn gf_inv(a: u8) -> u8 {
    debug_assert!(a != 0);
    gf_pow(a, 254)
}

// ----------------------------- Combine -----------------------------

/// Combine two threshold shares into the original secret.
///
/// Order of arguments does not affect the result. Fails with
/// [`RecoveryError::InvalidShareSet`] on mismatched lengths, shares too short
/// to carry a coordinate, duplicate coordinates, or the reserved zero
/// coordinate. The semantic validity of the recovered bytes (checksums,
/// entropy format) is the caller's concern.
pub fn combine(share_a: &[u8], share_b: &[u8]) -> Result<Vec<u8>, RecoveryError> {
    if share_a.len() != share_b.len() {
        return Err(RecoveryError::InvalidShareSet("share length mismatch"));
    }
    if share_a.len() < 2 {
        return Err(RecoveryError::InvalidShareSet("share too short"));
    }
    let (ya, xa) = share_a.split_at(share_a.len() - 1);
    let (yb, xb) = share_b.split_at(share_b.len() - 1);
    let (xa, xb) = (xa[0], xb[0]);
    if xa == 0 || xb == 0 {
        return Err(RecoveryError::InvalidShareSet("zero share coordinate"));
    }
    if xa == xb {
        return Err(RecoveryError::InvalidShareSet("duplicate share coordinate"));
    }

    // λ_a(0) = x_b / (x_b - x_a), λ_b(0) = x_a / (x_a - x_b); in GF(256)
    // subtraction is XOR, so both denominators collapse to xa ^ xb.
    let denom_inv = gf_inv(xa ^ xb);
    let la = gf_mul(xb, denom_inv);
    let lb = gf_mul(xa, denom_inv);

    Ok(ya
        .iter()
        .zip(yb.iter())
        .map(|(&a, &b)| gf_mul(a, la) ^ gf_mul(b, lb))
        .collect())
}

// ----------------------------- Tests -----------------------------
