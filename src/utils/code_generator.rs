//! Random short code and token generation.
//!
//! Codes are drawn from a 62-character alphanumeric alphabet using the
//! operating system's secure random source. Sampling uses rejection over the
//! low six bits of each random byte, so every character is equally likely.

use serde_json::json;

use crate::error::AppError;

/// Number of characters in a generated short code.
pub const CODE_LENGTH: usize = 6;

/// Alphabet for generated codes and tokens.
const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random short code of [`CODE_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails. Callers
/// must abort the operation rather than fall back to a weaker source.
pub fn generate_code() -> Result<String, AppError> {
    generate_token(CODE_LENGTH)
}

/// Generates a random alphanumeric string of the given length.
///
/// Also used by the admin CLI for one-off passwords.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
pub fn generate_token(length: usize) -> Result<String, AppError> {
    let mut token = String::with_capacity(length);
    let mut buffer = [0u8; 64];

    while token.len() < length {
        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal(
                "System random source failed",
                json!({ "reason": e.to_string() }),
            )
        })?;

        for &byte in buffer.iter() {
            // Reject the two 6-bit values past the end of the alphabet to
            // keep the distribution uniform.
            let index = (byte & 0x3f) as usize;
            if index < ALPHABET.len() {
                token.push(ALPHABET[index] as char);
                if token.len() == length {
                    break;
                }
            }
        }
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_expected_length() {
        let code = generate_code().unwrap();
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_is_alphanumeric() {
        for _ in 0..100 {
            let code = generate_code().unwrap();
            assert!(
                code.chars().all(|c| c.is_ascii_alphanumeric()),
                "unexpected character in {code:?}"
            );
        }
    }

    #[test]
    fn test_generate_code_produces_distinct_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code().unwrap()).collect();

        // 62^6 possible codes; a collision in a thousand draws would point
        // at a broken sampler.
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_code_reaches_whole_alphabet() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            for c in generate_code().unwrap().chars() {
                seen.insert(c);
            }
        }

        assert_eq!(seen.len(), 62, "alphabet coverage: {}", seen.len());
    }

    #[test]
    fn test_generate_token_custom_lengths() {
        assert_eq!(generate_token(16).unwrap().len(), 16);
        assert_eq!(generate_token(129).unwrap().len(), 129);
    }

    #[test]
    fn test_generate_token_zero_length() {
        assert_eq!(generate_token(0).unwrap(), "");
    }
}
