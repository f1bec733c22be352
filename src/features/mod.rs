//! Domain-level client features (auth, users, forms) and their shared logic.
//! Routes import these modules to keep controller code focused while keeping
//! credential and API handling in dedicated feature areas.

pub mod auth;
pub mod forms;
pub mod users;
