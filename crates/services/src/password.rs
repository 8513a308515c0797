//! Salted password hashing for stored credentials.
//!
//! Hashes are stored as `hex(salt)$hex(sha256(salt || password))`;
//! verification compares digests in constant time.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_BYTES: usize = 16;

/// Hash a password under a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::rng().fill_bytes(&mut salt);
    let digest = digest_password(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Check a password against a stored `salt$digest` hash.
///
/// A malformed stored hash verifies as false rather than erroring, so
/// login failures stay uniform.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };

    let digest = digest_password(&salt, password);
    digest.as_slice().ct_eq(expected.as_slice()).into()
}

fn digest_password(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let stored = hash_password("correct horse battery");
        assert!(verify_password("correct horse battery", &stored));
    }

    #[test]
    fn wrong_password_fails() {
        let stored = hash_password("correct horse battery");
        assert!(!verify_password("correct horse Battery", &stored));
    }

    #[test]
    fn salts_make_hashes_unique() {
        let first = hash_password("same password");
        let second = hash_password("same password");
        assert_ne!(first, second);
        assert!(verify_password("same password", &first));
        assert!(verify_password("same password", &second));
    }

    #[test]
    fn malformed_stored_hash_fails_closed() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "no-separator"));
        assert!(!verify_password("anything", "not-hex$not-hex"));
        assert!(!verify_password("anything", "abcd$"));
    }

    #[test]
    fn stored_hash_has_salt_and_digest_halves() {
        let stored = hash_password("pw-123456");
        let (salt, digest) = stored.split_once('$').expect("separator");
        assert_eq!(salt.len(), SALT_BYTES * 2);
        assert_eq!(digest.len(), 64);
    }
}
