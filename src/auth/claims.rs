use serde::{Deserialize, Serialize};

/// Application payload carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub email: String,
}

/// JWT body on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}

impl From<Claims> for TokenPayload {
    fn from(c: Claims) -> Self {
        Self { email: c.email }
    }
}
