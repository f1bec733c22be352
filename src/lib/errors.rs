use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lemon sends `null` where a list or message is absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body returned by Lemon APIs on any non-2xx response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default, alias = "exceptionId")]
    pub exception: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<FieldError>,
}

/// One validation failure. `field` is `None` for form level errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Clone, Debug)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    Http {
        status: u16,
        message: String,
        payload: Option<ErrorBody>,
    },
    Parse(String),
    Serialization(String),
    Storage(String),
    SessionExpired(String),
    /// Input rejected locally before any request was sent.
    Validation(String),
}

impl AppError {
    /// Message suitable for alerts: the server's own message when it sent one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http {
                payload: Some(ErrorBody {
                    message: Some(message),
                    ..
                }),
                ..
            } => message.clone(),
            AppError::Http { message, .. }
            | AppError::Config(message)
            | AppError::Network(message)
            | AppError::Timeout(message)
            | AppError::Parse(message)
            | AppError::Serialization(message)
            | AppError::Storage(message)
            | AppError::SessionExpired(message)
            | AppError::Validation(message) => message.clone(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn payload(&self) -> Option<&ErrorBody> {
        match self {
            AppError::Http { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http {
                status, message, ..
            } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
            AppError::Storage(message) => write!(formatter, "Storage error: {message}"),
            AppError::SessionExpired(message) => write!(formatter, "Session expired: {message}"),
            AppError::Validation(message) => write!(formatter, "Invalid input: {message}"),
        }
    }
}

impl std::error::Error for AppError {}
