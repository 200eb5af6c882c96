use std::time::Duration;

use anyhow::Context;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::{Claims, TokenPayload},
    config::{JwtConfig, TokenConfig},
};

/// Signs `payload` with `secret`, valid for `expires_in`.
pub fn create_token(
    payload: &TokenPayload,
    secret: &str,
    expires_in: Duration,
) -> anyhow::Result<String> {
    let now = OffsetDateTime::now_utc();
    let lifetime = i64::try_from(expires_in.as_secs())
        .map(TimeDuration::seconds)
        .context("token lifetime out of range")?;
    let exp = now
        .checked_add(lifetime)
        .context("token expiry out of range")?;
    let claims = Claims {
        email: payload.email.clone(),
        iat: usize::try_from(now.unix_timestamp()).context("issued-at before epoch")?,
        exp: usize::try_from(exp.unix_timestamp()).context("token expiry out of range")?,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("encode jwt")?;
    Ok(token)
}

/// Fails on a bad signature, a malformed token or an elapsed expiry.
pub fn verify(token: &str, secret: &str) -> anyhow::Result<TokenPayload> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims.into())
}

/// Access and refresh signing material. Each kind only verifies under its own secret.
#[derive(Debug, Clone)]
pub struct TokenKeys {
    access: TokenConfig,
    refresh: TokenConfig,
}

impl TokenKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            access: cfg.access.clone(),
            refresh: cfg.refresh.clone(),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access.ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh.ttl
    }

    pub fn sign_access(&self, email: &str) -> anyhow::Result<String> {
        let token = create_token(
            &TokenPayload {
                email: email.to_owned(),
            },
            &self.access.secret,
            self.access.ttl,
        )?;
        debug!(email = %email, "access token signed");
        Ok(token)
    }

    pub fn sign_refresh(&self, email: &str) -> anyhow::Result<String> {
        let token = create_token(
            &TokenPayload {
                email: email.to_owned(),
            },
            &self.refresh.secret,
            self.refresh.ttl,
        )?;
        debug!(email = %email, "refresh token signed");
        Ok(token)
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<TokenPayload> {
        verify(token, &self.access.secret)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<TokenPayload> {
        verify(token, &self.refresh.secret)
    }
}
