//! AES-256-GCM sealing of credential values written to disk.
//!
//! The key is 32 bytes supplied as a hex-encoded string (64 characters).
//! Each sealed value is `base64(nonce || ciphertext)` with a fresh random nonce.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;

use crate::error::{CredentialErrorKind, Error, ErrorKind};

/// 12-byte nonce size for AES-GCM
const NONCE_SIZE: usize = 12;

fn encryption_err() -> Error {
    Error::new(ErrorKind::Credential(CredentialErrorKind::EncryptionFailed))
}

fn decryption_err() -> Error {
    Error::new(ErrorKind::Credential(CredentialErrorKind::DecryptionFailed))
}

/// Cipher bound to a single at-rest key.
#[derive(Clone)]
pub struct Cipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").finish_non_exhaustive()
    }
}

impl Cipher {
    /// Builds a cipher from a hex-encoded 32-byte key.
    pub fn from_hex(key_hex: &str) -> Result<Self, Error> {
        let bytes = hex::decode(key_hex.trim()).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Credential(CredentialErrorKind::EncryptionFailed),
        })?;
        if bytes.len() != 32 {
            return Err(encryption_err());
        }
        let cipher = Aes256Gcm::new_from_slice(&bytes).map_err(|_| encryption_err())?;
        Ok(Self { cipher })
    }

    /// Encrypts `plaintext` and returns the base64 text to store.
    pub fn seal(&self, plaintext: &str) -> Result<String, Error> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| encryption_err())?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Reverses [`Cipher::seal`].
    pub fn open(&self, sealed: &str) -> Result<String, Error> {
        let combined = BASE64.decode(sealed).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Credential(CredentialErrorKind::DecryptionFailed),
        })?;

        if combined.len() < NONCE_SIZE {
            return Err(decryption_err());
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| decryption_err())?;

        String::from_utf8(plaintext).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Credential(CredentialErrorKind::DecryptionFailed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_seal_then_open_restores_token() {
        let cipher = Cipher::from_hex(TEST_KEY).unwrap();
        let sealed = cipher.seal("eyJhbGciOiJIUzI1NiJ9.access").unwrap();
        assert_ne!(sealed, "eyJhbGciOiJIUzI1NiJ9.access");
        assert_eq!(cipher.open(&sealed).unwrap(), "eyJhbGciOiJIUzI1NiJ9.access");
    }

    #[test]
    fn test_seal_uses_fresh_nonce() {
        let cipher = Cipher::from_hex(TEST_KEY).unwrap();
        let first = cipher.seal("refresh-token").unwrap();
        let second = cipher.seal("refresh-token").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_key_returns_encryption_failed() {
        let result = Cipher::from_hex("not-valid-hex!");
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::Credential(CredentialErrorKind::EncryptionFailed),
                ..
            })
        ));
    }

    #[test]
    fn test_short_key_returns_encryption_failed() {
        let result = Cipher::from_hex("0123456789abcdef");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_key_returns_decryption_failed() {
        let sealed = Cipher::from_hex(TEST_KEY).unwrap().seal("secret").unwrap();
        let wrong = Cipher::from_hex(
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .unwrap();
        assert!(matches!(
            wrong.open(&sealed),
            Err(Error {
                error_kind: ErrorKind::Credential(CredentialErrorKind::DecryptionFailed),
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_value_returns_decryption_failed() {
        let cipher = Cipher::from_hex(TEST_KEY).unwrap();
        // "abc" in base64, shorter than a nonce
        assert!(matches!(
            cipher.open("YWJj"),
            Err(Error {
                error_kind: ErrorKind::Credential(CredentialErrorKind::DecryptionFailed),
                ..
            })
        ));
    }
}
