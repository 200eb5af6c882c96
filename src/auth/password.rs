use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tracing::error;

/// One-way salted hashing used for passwords and for refresh tokens at rest.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> anyhow::Result<String>;
    async fn compare(&self, plain: &str, hashed: &str) -> anyhow::Result<bool>;
}

/// Argon2id with default parameters. Work runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let plain = plain.to_owned();
        tokio::task::spawn_blocking(move || hash_password(&plain)).await?
    }

    async fn compare(&self, plain: &str, hashed: &str) -> anyhow::Result<bool> {
        let plain = plain.to_owned();
        let hashed = hashed.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&plain, &hashed)).await?
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
