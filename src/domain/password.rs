//! Argon2-hashed account password.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// A stored password in PHC string form. Plain text only passes through
/// `new` and `verify`.
#[derive(Clone)]
pub struct Password {
    phc: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl Password {
    /// Hash a new password with a fresh salt.
    ///
    /// Length is counted in characters and must lie within
    /// `MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH`.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let length = plain_text.chars().count() as u64;
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(AppError::invalid_field(
                "password",
                format!(
                    "Password must be {} to {} characters",
                    MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
                ),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("argon2 hashing failed: {e}")))?
            .to_string();

        Ok(Self { phc })
    }

    /// Wrap the PHC string stored on an account.
    pub fn from_hash(phc: String) -> Self {
        Self { phc }
    }

    pub fn into_string(self) -> String {
        self.phc
    }

    /// An unparsable stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.phc)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_password_verifies_only_itself() {
        let password = Password::new("12345678").unwrap();

        assert!(password.verify("12345678"));
        assert!(!password.verify("11111111"));
    }

    #[test]
    fn test_stored_hash_round_trips() {
        let phc = Password::new("correct horse").unwrap().into_string();
        assert!(phc.starts_with("$argon2"));
        assert!(Password::from_hash(phc).verify("correct horse"));
    }

    #[test]
    fn test_each_hash_gets_its_own_salt() {
        let first = Password::new("12345678").unwrap().into_string();
        let second = Password::new("12345678").unwrap().into_string();
        assert_ne!(first, second);
    }

    #[test]
    fn test_length_bounds() {
        assert!(Password::new("1234567").is_err());
        assert!(Password::new(&"a".repeat(MAX_PASSWORD_LENGTH as usize + 1)).is_err());
        assert!(matches!(
            Password::new("short"),
            Err(AppError::InvalidField { ref field, .. }) if field == "password"
        ));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 4 Hangul syllables are 12 bytes
        assert!(Password::new("비밀번호").is_err());
        assert!(Password::new("비밀번호비밀번호").is_ok());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let stored = Password::from_hash("not-a-phc-string".to_string());
        assert!(!stored.verify("anything"));
    }

    #[test]
    fn test_debug_hides_hash() {
        let password = Password::new("12345678").unwrap();
        let debug = format!("{:?}", password);
        assert!(!debug.contains("argon2"));
    }
}
