//! Email/password authentication with cookie-borne JWT sessions, plus an
//! authenticated transaction resource.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod transactions;
