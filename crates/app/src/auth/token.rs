//! Bearer token generation and hashing.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use crate::auth::ApiTokenError;

/// Bearer token prefix.
pub const TOKEN_PREFIX: &str = "sf_";

/// Number of random bytes encoded in a token.
pub const TOKEN_SECRET_BYTES: usize = 32;

/// Generates a fresh bearer token: the prefix followed by hex-encoded random bytes.
#[must_use]
pub fn generate_token() -> String {
    let mut secret = [0_u8; TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    let hex: String = secret.iter().map(|byte| format!("{byte:02x}")).collect();

    format!("{TOKEN_PREFIX}{hex}")
}

/// Checks the token shape before any lookup.
///
/// # Errors
///
/// Returns [`ApiTokenError::InvalidFormat`] for anything [`generate_token`] could not have produced.
pub fn validate_token(token: &str) -> Result<(), ApiTokenError> {
    let secret = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or(ApiTokenError::InvalidFormat)?;

    if secret.len() != TOKEN_SECRET_BYTES * 2 || !secret.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ApiTokenError::InvalidFormat);
    }

    Ok(())
}

/// Lowercase hex SHA-256 of the raw token, as stored.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_validate() {
        let token = generate_token();

        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(validate_token(&token), Ok(()));
    }

    #[test]
    fn generated_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert_eq!(validate_token("nope"), Err(ApiTokenError::InvalidFormat));
        assert_eq!(validate_token("sf_abc"), Err(ApiTokenError::InvalidFormat));
        assert_eq!(
            validate_token(&format!("sf_{}", "z".repeat(64))),
            Err(ApiTokenError::InvalidFormat)
        );
    }

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
