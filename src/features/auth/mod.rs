//! Auth feature module covering the session store, login, bearer tokens and
//! screen guards. Credentials flow only through the envelope and the
//! credential store; nothing in this module may log token material.
//!
//! Flow Overview: bootstrap fetches the context with any stored credential and
//! hydrates the session user. Login posts url-encoded credentials and replaces
//! the user. Social login and user switching store a `Bearer` token and then
//! refetch the context. Logout clears the stored credential locally.

pub mod client;
pub mod guards;
pub mod state;
pub mod token;
pub mod types;

pub use guards::Denied;
pub use state::Session;
