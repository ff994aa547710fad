//! Redemption token generation.
//!
//! Tokens are short codes a buyer types into the game client, so the
//! alphabet is restricted to unambiguous uppercase alphanumerics. 36^12
//! (~62 bits) keeps the collision probability negligible; the unique index
//! on `transactions.token` is the backstop.

use rand::{Rng, rngs::OsRng};

pub const TOKEN_LEN: usize = 12;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh redemption token from the OS CSPRNG.
pub fn generate() -> String {
    let mut rng = OsRng;
    (0..TOKEN_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        assert_eq!(generate().len(), TOKEN_LEN);
    }

    #[test]
    fn test_token_alphabet() {
        for _ in 0..100 {
            let token = generate();
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "unexpected character in token {}",
                token
            );
        }
    }

    #[test]
    fn test_tokens_are_not_repeated() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate()));
        }
    }
}
