//! Storage key trait for type-safe key serialization.
//!
//! Every entity stored by `portal-store` is keyed by a type that implements
//! [`StorageKey`], so a `JobId` can never be used to look up a user document.

/// Explicit contract for turning an identifier into storage bytes and back.
pub trait StorageKey: Sized + Send + Sync {
    /// Serialize the key to the bytes used by the storage backend.
    fn storage_key(&self) -> Vec<u8>;

    /// Rebuild the key from storage bytes.
    fn from_storage_key(bytes: &[u8]) -> Result<Self, String>;
}

impl StorageKey for String {
    fn storage_key(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string())
    }
}
