//! Per-user screens under `/users/:id`.

pub mod api_key;
pub mod change_email;
pub mod change_password;
pub mod edit;
pub mod profile;
pub mod verify;
