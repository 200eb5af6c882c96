use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IsAuthResponse {
    pub email: String,
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref UPPER_RE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref LOWER_RE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref DIGIT_RE: Regex = Regex::new(r"[0-9]").unwrap();
    static ref SPECIAL_RE: Regex = Regex::new(r"[!@#$%^&*()\-_=+{};:,<.>]").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 8 characters with an uppercase letter, a lowercase letter, a
/// digit and a special character.
pub(crate) fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && UPPER_RE.is_match(password)
        && LOWER_RE.is_match(password)
        && DIGIT_RE.is_match(password)
        && SPECIAL_RE.is_match(password)
}

impl RegisterRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.email = self.email.trim().to_string();
        self.name = self.name.trim().to_string();
        if !is_valid_email(&self.email) {
            return Err(AppError::BadRequest("Invalid email".into()));
        }
        if self.name.is_empty() {
            return Err(AppError::BadRequest("Name is required".into()));
        }
        if !is_strong_password(&self.password) {
            return Err(AppError::BadRequest(
                "Password must contain at least 8 characters, one uppercase, one number and one special case character".into(),
            ));
        }
        Ok(())
    }
}

impl LoginRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.email = self.email.trim().to_string();
        if !is_valid_email(&self.email) {
            return Err(AppError::BadRequest("Invalid email".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest("Password is required".into()));
        }
        Ok(())
    }
}
