//! Form state and the submission pipeline shared by every controller that
//! posts user input.

pub mod state;
pub mod submit;

pub use state::FormState;
pub use submit::{SubmitError, SubmitOptions, apply_error, submit, submit_as};
