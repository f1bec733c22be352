//! # Lemon Client (Account Management over Spring Lemon)
//!
//! `lemon_client` is a headless client for the account-management REST API of a
//! Spring Lemon backend: signup, login, email verification, password and email
//! changes, API keys, and admin lookup with user switching.
//!
//! ## Credentials
//!
//! The server authenticates with an opaque bearer credential. Every response may
//! rotate it through the `Lemon-Authorization` header; the envelope persists the
//! new value before the caller sees the response and sends it as
//! `Authorization` on the next request. Credentials live in a
//! [`CredentialStore`](app_lib::CredentialStore) and are never logged.
//!
//! ## Application Context
//!
//! [`App::bootstrap`](app::App::bootstrap) fetches `/api/core/context` once and
//! builds the [`App`](app::App) that every controller under [`routes`] receives
//! explicitly. Role-derived flags are recomputed on every read from the user and
//! the viewing session.
//!
//! ## Forms
//!
//! Controllers post user input through [`features::forms::submit`], which maps
//! Lemon validation errors onto named fields and everything else onto
//! form-level messages.

#[path = "lib/mod.rs"]
pub mod app_lib;

pub mod app;
pub mod cli;
pub mod components;
pub mod features;
pub mod routes;

#[cfg(test)]
mod test_support;

pub use app_lib::GIT_COMMIT_HASH;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
