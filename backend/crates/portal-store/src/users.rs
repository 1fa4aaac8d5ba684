//! User documents with unique username and email indexes.
//!
//! ## Indexes
//!
//! 1. **users_username_idx** - `{username}` → `{user_id}` (unique, lower-cased)
//! 2. **users_email_idx** - `{email}` → `{user_id}` (unique, lower-cased)
//!
//! Documents and their index entries are written in one atomic batch. All
//! writes go through a single mutex so the uniqueness checks and the
//! read-modify-write in [`UserStore::update`] cannot interleave.

use crate::entity_store::EntityStore;
use crate::partitions;
use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
use parking_lot::Mutex;
use portal_commons::{StorageKey, User, UserId, UserName};
use std::sync::Arc;

pub struct UserStore {
    backend: Arc<dyn StorageBackend>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore").finish()
    }
}

impl EntityStore<UserId, User> for UserStore {
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn partition(&self) -> &str {
        partitions::USERS
    }
}

impl UserStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn get_by_id(&self, user_id: &UserId) -> Result<Option<User>> {
        self.get(user_id)
    }

    /// Case-insensitive lookup through the username index.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let key = UserName::normalized(username);
        self.lookup_index(partitions::USERS_BY_USERNAME, &key.storage_key())
    }

    /// Case-insensitive lookup through the email index.
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let key = User::normalize_email(email);
        self.lookup_index(partitions::USERS_BY_EMAIL, key.as_bytes())
    }

    /// Finds the first user matching either identifier, username first.
    pub fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>> {
        if let Some(username) = username.filter(|u| !u.trim().is_empty()) {
            if let Some(user) = self.get_by_username(username)? {
                return Ok(Some(user));
            }
        }
        match email.filter(|e| !e.trim().is_empty()) {
            Some(email) => self.get_by_email(email),
            None => Ok(None),
        }
    }

    /// Inserts a new user together with its index entries.
    ///
    /// Returns [`StorageError::UniqueConstraintViolation`] carrying `"username"`
    /// or `"email"` when either is already taken.
    pub fn insert(&self, user: &User) -> Result<()> {
        let _guard = self.write_lock.lock();

        if self.index_owner(partitions::USERS_BY_USERNAME, &user.username.storage_key())?.is_some() {
            return Err(StorageError::UniqueConstraintViolation("username".to_string()));
        }
        if self.index_owner(partitions::USERS_BY_EMAIL, user.email.as_bytes())?.is_some() {
            return Err(StorageError::UniqueConstraintViolation("email".to_string()));
        }

        let operations = vec![
            self.put_operation(&user.id, user)?,
            index_put(partitions::USERS_BY_USERNAME, user.username.storage_key(), &user.id),
            index_put(partitions::USERS_BY_EMAIL, user.email.as_bytes().to_vec(), &user.id),
        ];
        self.backend.batch(operations)?;

        log::debug!("Inserted user {} ({})", user.id, user.username);
        Ok(())
    }

    /// Atomically applies `mutate` to the stored user.
    ///
    /// Returns `Ok(None)` when the user does not exist. An error returned by
    /// `mutate` aborts the update without writing anything. Index entries are
    /// moved when the username or email changes, and `updated_at` is bumped.
    pub fn update<F>(&self, user_id: &UserId, mutate: F) -> Result<Option<User>>
    where
        F: FnOnce(&mut User) -> Result<()>,
    {
        let _guard = self.write_lock.lock();

        let Some(existing) = self.get(user_id)? else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        mutate(&mut updated)?;
        updated.id = existing.id.clone();
        updated.touch();

        let mut operations = Vec::with_capacity(5);

        if updated.username != existing.username {
            let new_key = updated.username.storage_key();
            if self.is_taken_by_other(partitions::USERS_BY_USERNAME, &new_key, user_id)? {
                return Err(StorageError::UniqueConstraintViolation("username".to_string()));
            }
            operations.push(Operation::Delete {
                partition: Partition::new(partitions::USERS_BY_USERNAME),
                key: existing.username.storage_key(),
            });
            operations.push(index_put(partitions::USERS_BY_USERNAME, new_key, user_id));
        }

        if updated.email != existing.email {
            let new_key = updated.email.as_bytes().to_vec();
            if self.is_taken_by_other(partitions::USERS_BY_EMAIL, &new_key, user_id)? {
                return Err(StorageError::UniqueConstraintViolation("email".to_string()));
            }
            operations.push(Operation::Delete {
                partition: Partition::new(partitions::USERS_BY_EMAIL),
                key: existing.email.as_bytes().to_vec(),
            });
            operations.push(index_put(partitions::USERS_BY_EMAIL, new_key, user_id));
        }

        operations.push(self.put_operation(user_id, &updated)?);
        self.backend.batch(operations)?;

        Ok(Some(updated))
    }

    fn index_owner(&self, index: &str, key: &[u8]) -> Result<Option<UserId>> {
        match self.backend.get(&Partition::new(index), key)? {
            Some(bytes) => UserId::from_storage_key(&bytes)
                .map(Some)
                .map_err(StorageError::SerializationError),
            None => Ok(None),
        }
    }

    fn is_taken_by_other(&self, index: &str, key: &[u8], user_id: &UserId) -> Result<bool> {
        Ok(self
            .index_owner(index, key)?
            .is_some_and(|owner| &owner != user_id))
    }

    fn lookup_index(&self, index: &str, key: &[u8]) -> Result<Option<User>> {
        match self.index_owner(index, key)? {
            Some(user_id) => {
                let user = self.get(&user_id)?;
                if user.is_none() {
                    log::warn!("Index {} points at missing user {}", index, user_id);
                }
                Ok(user)
            },
            None => Ok(None),
        }
    }
}

fn index_put(index: &str, key: Vec<u8>, user_id: &UserId) -> Operation {
    Operation::Put {
        partition: Partition::new(index),
        key,
        value: user_id.storage_key(),
    }
}
