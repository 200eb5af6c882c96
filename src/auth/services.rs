use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::{
        cookies::{format_cookie, logout_cookie, ACCESS_COOKIE, REFRESH_COOKIE},
        jwt::TokenKeys,
        password::CredentialHasher,
        repo::{DuplicateEmail, UserStore},
        repo_types::{NewUser, PublicUser},
    },
    error::{AppError, AppResult},
};

/// Login, registration, session validation and logout flows.
///
/// Credential and token mismatches come back as `Ok(None)`; turning them into
/// 401 responses is the HTTP layer's job. Only store and hasher failures are
/// errors, apart from the duplicate email check in [`AuthService::register`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        keys: TokenKeys,
    ) -> Self {
        Self {
            users,
            hasher,
            keys,
        }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    /// `Authentication` cookie carrying a fresh access token.
    pub fn access_cookie(&self, email: &str) -> AppResult<String> {
        let token = self.keys.sign_access(email)?;
        info!(email = %email, "user logged in");
        Ok(format_cookie(ACCESS_COOKIE, &token, self.keys.access_ttl()))
    }

    /// `Refresh` cookie carrying a fresh refresh token. Only the token's hash
    /// is persisted on the user.
    pub async fn refresh_cookie(&self, email: &str) -> AppResult<String> {
        let token = self.keys.sign_refresh(email)?;
        let hash = self.hasher.hash(&token).await?;
        self.users.update_refresh_token(email, &hash).await?;
        Ok(format_cookie(REFRESH_COOKIE, &token, self.keys.refresh_ttl()))
    }

    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Option<PublicUser>> {
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!(email = %email, "login unknown email");
            return Ok(None);
        };
        if !self.hasher.compare(password, &user.password).await? {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Ok(None);
        }
        self.users.update_last_login(email).await?;
        Ok(Some(user.into()))
    }

    /// `email` comes from an access token whose signature was already checked.
    pub async fn validate_bearer_subject(&self, email: &str) -> AppResult<Option<PublicUser>> {
        let user = self.users.find_by_email(email).await?;
        if user.is_none() {
            warn!(email = %email, "token subject no longer exists");
        }
        Ok(user.map(PublicUser::from))
    }

    pub async fn validate_refresh_match(
        &self,
        raw_token: &str,
        email: &str,
    ) -> AppResult<Option<PublicUser>> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(None);
        };
        let Some(stored) = user.hash_refresh_token.as_deref() else {
            warn!(email = %email, "no active refresh session");
            return Ok(None);
        };
        if !self.hasher.compare(raw_token, stored).await? {
            warn!(email = %email, "refresh token does not match");
            return Ok(None);
        }
        Ok(Some(user.into()))
    }

    /// Fails with `Conflict` before any write when the email is taken. A
    /// concurrent registration that wins the insert also yields `Conflict`.
    pub async fn register(&self, new: NewUser) -> AppResult<PublicUser> {
        if let Some(existing) = self.users.find_by_email(&new.email).await? {
            if !existing.id.is_nil() {
                warn!(email = %new.email, "email already registered");
                return Err(email_taken());
            }
        }
        let email = new.email.clone();
        let user = match self.users.create(new).await {
            Ok(user) => user,
            Err(e) if e.is::<DuplicateEmail>() => {
                warn!(email = %email, "email registered concurrently");
                return Err(email_taken());
            }
            Err(e) => return Err(e.into()),
        };
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.into())
    }

    pub async fn is_authenticated(&self, email: &str) -> AppResult<Option<PublicUser>> {
        Ok(self.users.find_by_email(email).await?.map(PublicUser::from))
    }

    /// Stateless: the stored refresh hash is left as it is.
    pub fn logout(&self) -> String {
        logout_cookie()
    }
}

fn email_taken() -> AppError {
    AppError::Conflict("User with this email already exists".into())
}
