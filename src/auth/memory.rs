use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{
    password::CredentialHasher,
    repo::{DuplicateEmail, UserStore},
    repo_types::{NewUser, User},
};

/// `UserStore` kept in process memory, keyed by email.
#[derive(Clone)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<String, User>>>,
    hasher: Arc<dyn CredentialHasher>,
}

impl MemoryUserStore {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            hasher,
        }
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, HashMap<String, User>>> {
        self.users
            .lock()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock()?.get(email).cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<User> {
        let password = self.hasher.hash(&new.password).await?;
        let mut users = self.lock()?;
        if users.contains_key(&new.email) {
            return Err(DuplicateEmail(new.email).into());
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            password,
            hash_refresh_token: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn update_refresh_token(&self, email: &str, hash: &str) -> anyhow::Result<()> {
        if let Some(user) = self.lock()?.get_mut(email) {
            user.hash_refresh_token = Some(hash.to_owned());
            user.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn update_last_login(&self, email: &str) -> anyhow::Result<()> {
        if let Some(user) = self.lock()?.get_mut(email) {
            let now = OffsetDateTime::now_utc();
            user.last_login_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }
}
