//! Variable-Base Codec
//!
//! Text-safe binary encoding over a fixed 64-symbol alphabet, implemented as
//! generalized radix conversion: the input is read as numerals in base
//! `2^from` and repacked into numerals of base `2^to`.
//!
//! The two directions are deliberately asymmetric and must stay that way for
//! wire compatibility with the escrow service:
//!
//! - encoding (8→6) emits a final partial numeral, left-shifted to fill the
//!   remaining bits, then pads with `=` to a multiple of 4 symbols;
//! - decoding (6→8) strips all `=` and silently discards any incomplete
//!   trailing group.

use crate::error::RecoveryError;

/// The 64-symbol alphabet; `=` is the padding character.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

// ----------------------------- Radix Conversion -----------------------------

/// Repack a numeral sequence from base `2^from` into base `2^to`.
///
/// The accumulator never holds more than `from + to - 1` bits; numerals are
/// emitted most-significant-group-first and the accumulator is masked down to
/// the unconsumed low bits after each emission. With `pad` set, a trailing
/// partial numeral is emitted left-shifted to fill its low bits; without it,
/// leftover bits are discarded.
fn convert_radix(data: &[u8], from: u32, to: u32, pad: bool) -> Vec<u8> {
    let mask: u32 = (1 << to) - 1;
    let mut carry: u32 = 0;
    let mut pos: u32 = 0;
    let mut out = Vec::with_capacity((data.len() * from as usize) / to as usize + 1);
    for &n in data {
        carry = (carry << from) | u32::from(n);
        pos += from;
        while pos >= to {
            pos -= to;
            out.push(((carry >> pos) & mask) as u8);
        }
        carry &= (1 << pos) - 1;
    }
    if pad && pos > 0 {
        out.push(((carry << (to - pos)) & mask) as u8);
    }
    out
}

// ----------------------------- Encode / Decode -----------------------------

/// Encode bytes as text over [`ALPHABET`], `=`-padded to a multiple of 4
/// symbols. Empty input yields an empty string with no padding.
pub fn encode(bytes: &[u8]) -> String {
    let mut text: String = convert_radix(bytes, 8, 6, true)
        .into_iter()
        .map(|i| ALPHABET[i as usize] as char)
        .collect();
    while text.len() % 4 != 0 {
        text.push('=');
    }
    text
}

/// Decode text over [`ALPHABET`] back to bytes.
///
/// All `=` characters are stripped before conversion; any other character
/// outside the alphabet fails with [`RecoveryError::InvalidSymbol`]. Trailing
/// bits that do not fill a whole byte are discarded.
pub fn decode(text: &str) -> Result<Vec<u8>, RecoveryError> {
    let mut indices = Vec::with_capacity(text.len());
    for c in text.chars() {
        if c == '=' {
            continue;
        }
        let idx = ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or(RecoveryError::InvalidSymbol(c))?;
        indices.push(idx as u8);
    }
    Ok(convert_radix(&indices, 6, 8, false))
}

// ----------------------------- Tests -----------------------------
