//! Password secrets and their stored bcrypt hashes.
//!
//! Plain-text passwords are wiped from memory when dropped. Stored hashes use
//! the modular crypt form (`$2b$10$...`).

use bcrypt::HashParts;
use tracing::warn;
use zeroize::Zeroizing;

/// bcrypt work factor applied to new hashes.
pub const HASH_COST: u32 = 10;

/// Plain-text password supplied at registration or login.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a password, rejecting empty input.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(raw))
    }

    fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Errors raised while handling password material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The password was empty.
    #[error("password must not be empty")]
    Empty,
    /// A stored value was not a bcrypt hash.
    #[error("stored password hash is malformed")]
    MalformedHash,
    /// bcrypt could not produce a hash.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// bcrypt hash of a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt at [`HASH_COST`].
    pub fn generate(password: &Password) -> Result<Self, PasswordError> {
        bcrypt::hash(password.expose(), HASH_COST)
            .map(Self)
            .map_err(|err| PasswordError::Hashing {
                message: err.to_string(),
            })
    }

    /// Parse the stored textual form.
    pub fn parse(stored: &str) -> Result<Self, PasswordError> {
        stored
            .parse::<HashParts>()
            .map(|_| Self(stored.to_owned()))
            .map_err(|_| PasswordError::MalformedHash)
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, candidate: &Password) -> bool {
        bcrypt::verify(candidate.expose(), &self.0).unwrap_or_else(|err| {
            warn!(error = %err, "stored password hash could not be verified");
            false
        })
    }

    /// Textual form suitable for persistence.
    pub fn to_stored(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("non-empty password")
    }

    fn hash(raw: &str) -> PasswordHash {
        PasswordHash::generate(&password(raw)).expect("hash password")
    }

    #[rstest]
    fn verifies_matching_password() {
        let hash = hash("s3cret");
        assert!(hash.verify(&password("s3cret")));
        assert!(!hash.verify(&password("s3cret!")));
    }

    #[rstest]
    fn hashes_use_bcrypt_at_the_configured_cost() {
        let stored = hash("pw").to_stored();
        assert!(stored.starts_with("$2b$10$"), "{stored}");
    }

    #[rstest]
    fn salts_differ_between_hashes() {
        assert_ne!(hash("same").to_stored(), hash("same").to_stored());
    }

    #[rstest]
    fn stored_form_round_trips() {
        let hash = hash("pw");
        let parsed = PasswordHash::parse(&hash.to_stored()).expect("parse stored hash");
        assert_eq!(parsed, hash);
        assert!(parsed.verify(&password("pw")));
    }

    #[rstest]
    fn verifies_hashes_written_by_other_bcrypt_implementations() {
        // `$2a$` hash of "password" at cost 4.
        let stored = "$2a$04$UuTkLRZZ6QofpDOlMz32MuuxEHA43WOemOYHPz6.SjsVsyO1tDU96";
        let parsed = PasswordHash::parse(stored).expect("bcrypt hash");
        assert!(parsed.verify(&password("password")));
        assert!(!parsed.verify(&password("Password")));
    }

    #[rstest]
    #[case("")]
    #[case("no-separator")]
    #[case("zz$00")]
    #[case("$2b$10$short")]
    fn rejects_malformed_stored_hash(#[case] stored: &str) {
        assert_eq!(PasswordHash::parse(stored), Err(PasswordError::MalformedHash));
    }

    #[rstest]
    fn rejects_empty_password() {
        assert!(matches!(Password::new(""), Err(PasswordError::Empty)));
    }

    #[rstest]
    fn debug_output_hides_secret() {
        assert_eq!(format!("{:?}", password("hunter2")), "Password(***)");
    }
}
