use std::sync::Arc;

use portal_auth::{AuthError, AuthResult, UserRepository};
use portal_commons::{User, UserId};
use portal_store::{StorageError, UserStore};

/// Repository adapter backed by portal-store's UserStore
pub struct StoreUserRepo {
    store: Arc<UserStore>,
}

impl StoreUserRepo {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    async fn blocking<T, F>(&self, f: F) -> AuthResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&UserStore) -> AuthResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
    }
}

fn db_error(err: StorageError) -> AuthError {
    AuthError::DatabaseError(err.to_string())
}

#[async_trait::async_trait]
impl UserRepository for StoreUserRepo {
    async fn get_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let user_id = user_id.clone();
        self.blocking(move |store| store.get_by_id(&user_id).map_err(db_error)).await
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> AuthResult<Option<User>> {
        let username = username.map(str::to_string);
        let email = email.map(str::to_string);
        self.blocking(move |store| {
            store
                .find_by_username_or_email(username.as_deref(), email.as_deref())
                .map_err(db_error)
        })
        .await
    }

    async fn create_user(&self, user: User) -> AuthResult<()> {
        self.blocking(move |store| match store.insert(&user) {
            Ok(()) => Ok(()),
            Err(StorageError::UniqueConstraintViolation(field)) => {
                Err(AuthError::AlreadyExists(field))
            },
            Err(e) => Err(db_error(e)),
        })
        .await
    }

    async fn set_refresh_token(&self, user_id: &UserId, token: Option<String>) -> AuthResult<bool> {
        let user_id = user_id.clone();
        self.blocking(move |store| {
            store
                .update(&user_id, |user| {
                    user.refresh_token = token;
                    Ok(())
                })
                .map(|updated| updated.is_some())
                .map_err(db_error)
        })
        .await
    }

    async fn replace_refresh_token(
        &self,
        user_id: &UserId,
        expected: &str,
        new_token: String,
    ) -> AuthResult<()> {
        let user_id = user_id.clone();
        let expected = expected.to_string();
        self.blocking(move |store| {
            let result = store.update(&user_id, |user| {
                if user.refresh_token.as_deref() != Some(expected.as_str()) {
                    return Err(StorageError::ConditionFailed("refresh token changed".to_string()));
                }
                user.refresh_token = Some(new_token);
                Ok(())
            });
            match result {
                Ok(Some(_)) => Ok(()),
                Ok(None) => Err(AuthError::InvalidRefreshToken),
                Err(StorageError::ConditionFailed(_)) => Err(AuthError::RefreshTokenReused),
                Err(e) => Err(db_error(e)),
            }
        })
        .await
    }

    async fn set_password_hash(&self, user_id: &UserId, password_hash: String) -> AuthResult<bool> {
        let user_id = user_id.clone();
        self.blocking(move |store| {
            store
                .update(&user_id, |user| {
                    user.password_hash = password_hash;
                    Ok(())
                })
                .map(|updated| updated.is_some())
                .map_err(db_error)
        })
        .await
    }
}
