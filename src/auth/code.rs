//! One-time code generation for the second factor.

use rand::rngs::OsRng;
use rand::Rng;

pub const CODE_LENGTH: usize = 6;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a fixed-length code drawn uniformly from `0-9A-Z`.
///
/// Callable independently of any account so explicit rotation can reuse it.
#[must_use]
pub fn generate() -> String {
    let mut rng = OsRng;
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
