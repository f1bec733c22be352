pub mod client;
pub mod types;

pub use types::{DerivedFlags, derive_flags};
