// Type-safe wrapper for usernames (secondary index key)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::StorageKey;

/// Type-safe wrapper for usernames used as secondary index keys.
///
/// Usernames are case-insensitive: [`UserName::normalized`] trims and
/// lower-cases the input, and every stored username goes through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Creates a new UserName from a string, verbatim.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates the canonical (trimmed, lower-case) form of a username.
    pub fn normalized(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// Returns the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl StorageKey for UserName {
    fn storage_key(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        String::from_utf8(bytes.to_vec())
            .map(UserName)
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_new_is_verbatim() {
        let name = UserName::new("John_Doe");
        assert_eq!(name.as_str(), "John_Doe");
    }

    #[test]
    fn test_user_name_normalized() {
        let name = UserName::normalized("  Alice ");
        assert_eq!(name.as_str(), "alice");
        assert_eq!(name, UserName::normalized("ALICE"));
    }

    #[test]
    fn test_user_name_storage_key() {
        let name = UserName::new("charlie");
        assert_eq!(name.storage_key(), b"charlie".to_vec());
        assert_eq!(UserName::from_storage_key(b"charlie").unwrap(), name);
    }
}
