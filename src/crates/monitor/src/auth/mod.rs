//! Credential verification
//!
//! Validates submitted credentials against a fixed credential table using a
//! one-way SHA-256 comparison. The internal outcome distinguishes a wrong
//! password from an unknown user for the monitor view; the HTTP layer must
//! collapse both into one generic failure message.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// Classification of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched
    Accepted,
    /// Known user, wrong password
    WrongPassword,
    /// No such user
    UnknownUser,
}

impl AuthOutcome {
    /// Whether the attempt was accepted
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Accepted)
    }

    /// Server-side classification reason (persisted and broadcast to
    /// monitors, never echoed in the login response)
    pub fn reason(&self) -> &'static str {
        match self {
            AuthOutcome::Accepted => "accepted",
            AuthOutcome::WrongPassword => "wrong password",
            AuthOutcome::UnknownUser => "unknown user",
        }
    }
}

/// Fixed credential table with one-way hashed passwords
pub struct Authenticator {
    /// username -> SHA-256 hex digest of the password
    users: HashMap<String, String>,
}

impl Authenticator {
    /// Build from plaintext credential pairs, hashing each password
    pub fn from_credentials<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let users = pairs
            .into_iter()
            .map(|(user, password)| (user.into(), hash_password(&password.into())))
            .collect();
        Self { users }
    }

    /// The demo credential set
    pub fn with_demo_users() -> Self {
        Self::from_credentials([
            ("ilya", "1111"),
            ("admin", "admin123"),
            ("test", "test123"),
            ("user", "password"),
        ])
    }

    /// Verify a username/password pair
    pub fn verify(&self, username: &str, password: &str) -> AuthOutcome {
        match self.users.get(username) {
            Some(stored) if *stored == hash_password(password) => AuthOutcome::Accepted,
            Some(_) => AuthOutcome::WrongPassword,
            None => AuthOutcome::UnknownUser,
        }
    }

    /// Known usernames, sorted (for the service descriptor)
    pub fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.users.keys().cloned().collect();
        names.sort();
        names
    }
}

/// SHA-256 hex digest of a password
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted() {
        let auth = Authenticator::with_demo_users();
        let outcome = auth.verify("ilya", "1111");
        assert_eq!(outcome, AuthOutcome::Accepted);
        assert!(outcome.is_success());
    }

    #[test]
    fn test_wrong_password() {
        let auth = Authenticator::with_demo_users();
        let outcome = auth.verify("ilya", "2222");
        assert_eq!(outcome, AuthOutcome::WrongPassword);
        assert!(!outcome.is_success());
        assert_eq!(outcome.reason(), "wrong password");
    }

    #[test]
    fn test_unknown_user() {
        let auth = Authenticator::with_demo_users();
        let outcome = auth.verify("nobody", "1111");
        assert_eq!(outcome, AuthOutcome::UnknownUser);
        assert_eq!(outcome.reason(), "unknown user");
    }

    #[test]
    fn test_usernames_sorted() {
        let auth = Authenticator::with_demo_users();
        assert_eq!(auth.usernames(), vec!["admin", "ilya", "test", "user"]);
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        // SHA-256 of "1111"
        assert_eq!(
            hash_password("1111"),
            "0ffe1abd1a08215353c233d6e009613e95eec4253832a761af28ff37ac5a150c"
        );
    }
}
