pub mod alert;

pub use alert::{Alert, AlertKind, Alerts};
