//! Shared client utilities for API access, configuration, errors, credential
//! storage and build metadata.
//!
//! ## Credential Flow
//!
//! 1. **Bootstrap:** the client resolves the API base URL from the host name and
//!    calls `GET /api/core/context`, sending any stored credential.
//! 2. **Rotation:** every response may carry a fresh credential in
//!    `Lemon-Authorization`; the envelope persists it before returning.
//! 3. **Usage:** the next request sends the most recent credential as
//!    `Authorization`.
//! 4. **Rejection:** a 401 on the context fetch clears the stored credential so
//!    the next attempt starts unauthenticated.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated logic in routes and features. Callers must avoid logging
//! credential material.

pub mod api;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub(crate) mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub mod config;
pub mod errors;
pub mod storage;

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub use api::{ApiClient, RequestBody};
pub use config::AppConfig;
pub use errors::{AppError, ErrorBody, FieldError};
pub use storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
