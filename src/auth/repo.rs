use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::{
    password::CredentialHasher,
    repo_types::{NewUser, User},
};

/// Returned by [`UserStore::create`] when the email is already taken.
#[derive(Debug, thiserror::Error)]
#[error("user with email {0} already exists")]
pub struct DuplicateEmail(pub String);

/// Persistence the auth flows depend on.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Hashes `new.password` before it is stored. Fails with [`DuplicateEmail`]
    /// when the email is taken.
    async fn create(&self, new: NewUser) -> anyhow::Result<User>;

    async fn update_refresh_token(&self, email: &str, hash: &str) -> anyhow::Result<()>;

    async fn update_last_login(&self, email: &str) -> anyhow::Result<()>;
}

const USER_COLUMNS: &str =
    "id, email, name, password, hash_refresh_token, last_login_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
    hasher: Arc<dyn CredentialHasher>,
}

impl PgUserStore {
    pub fn new(db: PgPool, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { db, hasher }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<User> {
        let password = self.hasher.hash(&new.password).await?;
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(&new.email)
        .bind(&new.name)
        .bind(&password)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                anyhow::Error::new(DuplicateEmail(new.email.clone()))
            }
            other => anyhow::Error::new(other).context("insert user"),
        })?;
        Ok(user)
    }

    async fn update_refresh_token(&self, email: &str, hash: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET hash_refresh_token = $2, updated_at = now()
             WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(hash)
        .execute(&self.db)
        .await
        .context("update refresh token")?;
        Ok(())
    }

    async fn update_last_login(&self, email: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET last_login_at = now(), updated_at = now()
             WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(&self.db)
        .await
        .context("update last login")?;
        Ok(())
    }
}
