//! Password generation

use rand::Rng;

use crate::{Error, Result};

/// Length used when none is spoken
pub const DEFAULT_LENGTH: usize = 12;

/// Accepted password lengths
pub const LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=128;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Generate a random password of `length` characters
///
/// # Errors
///
/// Returns error if `length` is outside [`LENGTH_RANGE`]
pub fn generate(length: usize) -> Result<String> {
    if !LENGTH_RANGE.contains(&length) {
        return Err(Error::InvalidInput(format!(
            "password length must be between {} and {}",
            LENGTH_RANGE.start(),
            LENGTH_RANGE.end()
        )));
    }

    let mut rng = rand::thread_rng();
    Ok((0..length)
        .map(|_| char::from(CHARSET[rng.gen_range(0..CHARSET.len())]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_charset() {
        let password = generate(16).unwrap();
        assert_eq!(password.len(), 16);
        assert!(password.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(generate(3).is_err());
        assert!(generate(500).is_err());
        assert!(generate(DEFAULT_LENGTH).is_ok());
    }
}
