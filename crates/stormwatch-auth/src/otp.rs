//! Six-digit one-time verification codes.

use rand::Rng;

/// A uniformly random code in `100000..=999999`.
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}
