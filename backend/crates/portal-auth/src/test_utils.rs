//! In-memory repository and fixtures shared by this crate's tests.

use crate::error::{AuthError, AuthResult};
use crate::repository::UserRepository;
use chrono::NaiveDate;
use parking_lot::Mutex;
use portal_commons::{User, UserId, UserName};
use std::collections::HashMap;

pub fn sample_user(id: &str, username: &str, email: &str) -> User {
    User {
        id: UserId::new(id),
        username: UserName::normalized(username),
        email: User::normalize_email(email),
        fullname: "Sample User".to_string(),
        password_hash: String::new(),
        profile_image: String::new(),
        cover_image: String::new(),
        birth_date: NaiveDate::from_ymd_opt(2001, 3, 4).unwrap(),
        mobile_number: "5550100".to_string(),
        qualifications: vec![],
        my_applied: vec![],
        refresh_token: None,
        created_at: 0,
        updated_at: 0,
    }
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserRepo {
    pub fn get(&self, user_id: &UserId) -> Option<User> {
        self.users.lock().get(user_id).cloned()
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryUserRepo {
    async fn get_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.get(user_id))
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> AuthResult<Option<User>> {
        let users = self.users.lock();
        let username = username.map(UserName::normalized);
        let email = email.map(User::normalize_email);
        Ok(users
            .values()
            .find(|u| username.as_ref() == Some(&u.username))
            .or_else(|| users.values().find(|u| email.as_deref() == Some(u.email.as_str())))
            .cloned())
    }

    async fn create_user(&self, user: User) -> AuthResult<()> {
        let mut users = self.users.lock();
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AuthError::AlreadyExists(user.username.to_string()));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn set_refresh_token(&self, user_id: &UserId, token: Option<String>) -> AuthResult<bool> {
        match self.users.lock().get_mut(user_id) {
            Some(user) => {
                user.refresh_token = token;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn replace_refresh_token(
        &self,
        user_id: &UserId,
        expected: &str,
        new_token: String,
    ) -> AuthResult<()> {
        let mut users = self.users.lock();
        let user = users.get_mut(user_id).ok_or(AuthError::InvalidRefreshToken)?;
        if user.refresh_token.as_deref() != Some(expected) {
            return Err(AuthError::RefreshTokenReused);
        }
        user.refresh_token = Some(new_token);
        Ok(())
    }

    async fn set_password_hash(&self, user_id: &UserId, password_hash: String) -> AuthResult<bool> {
        match self.users.lock().get_mut(user_id) {
            Some(user) => {
                user.password_hash = password_hash;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
