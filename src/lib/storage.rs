//! Persistent client state. The only value kept across runs is the rotated
//! `Authorization` credential, stored under a single key. Values are wrapped in
//! `SecretString` so they never end up in logs through `Debug`.

use super::errors::AppError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::{
    fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::debug;

/// Key under which the credential is persisted.
pub const AUTH_HEADER_KEY: &str = "authHeader";

/// Storage for the bearer credential shared by the session and the HTTP envelope.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Returns the stored credential, if any.
    ///
    /// # Errors
    /// Returns `AppError::Storage` when the backing store cannot be read.
    fn load(&self) -> Result<Option<SecretString>, AppError>;

    /// Replaces the stored credential.
    ///
    /// # Errors
    /// Returns `AppError::Storage` when the backing store cannot be written.
    fn save(&self, credential: &SecretString) -> Result<(), AppError>;

    /// Removes the stored credential.
    ///
    /// # Errors
    /// Returns `AppError::Storage` when the backing store cannot be written.
    fn clear(&self) -> Result<(), AppError>;
}

/// In-memory store, used by tests and one-shot invocations.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: Mutex<Option<SecretString>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credential(credential: &str) -> Self {
        Self {
            value: Mutex::new(Some(SecretString::from(credential.to_string()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<SecretString>, AppError> {
        let guard = self
            .value
            .lock()
            .map_err(|_| AppError::Storage("Credential store lock poisoned.".to_string()))?;
        Ok(guard
            .as_ref()
            .map(|value| SecretString::from(value.expose_secret().to_string())))
    }

    fn save(&self, credential: &SecretString) -> Result<(), AppError> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| AppError::Storage("Credential store lock poisoned.".to_string()))?;
        *guard = Some(SecretString::from(credential.expose_secret().to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| AppError::Storage("Credential store lock poisoned.".to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// JSON file store; other keys present in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::Storage(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(err) => Err(AppError::Storage(format!(
                "Failed to parse {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: Map<String, Value>) -> Result<(), AppError> {
        let contents = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|err| AppError::Serialization(format!("Failed to encode store: {err}")))?;
        fs::write(&self.path, contents).map_err(|err| {
            AppError::Storage(format!("Failed to write {}: {err}", self.path.display()))
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<SecretString>, AppError> {
        let map = self.read_map()?;
        Ok(map
            .get(AUTH_HEADER_KEY)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(|value| SecretString::from(value.to_string())))
    }

    fn save(&self, credential: &SecretString) -> Result<(), AppError> {
        let mut map = self.read_map()?;
        map.insert(
            AUTH_HEADER_KEY.to_string(),
            Value::String(credential.expose_secret().to_string()),
        );
        debug!("persisting credential to {}", self.path.display());
        self.write_map(map)
    }

    fn clear(&self) -> Result<(), AppError> {
        let mut map = self.read_map()?;
        if map.remove(AUTH_HEADER_KEY).is_none() {
            return Ok(());
        }
        debug!("clearing credential from {}", self.path.display());
        self.write_map(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> FileCredentialStore {
        let path = std::env::temp_dir().join(format!("lemon-auth-{}.json", uuid::Uuid::new_v4()));
        FileCredentialStore::new(path)
    }

    struct FileGuard(PathBuf);

    impl Drop for FileGuard {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("Bearer a".to_string())).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "Bearer a");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let store = temp_store();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_survives_new_instance() {
        let store = temp_store();
        let _guard = FileGuard(store.path().to_path_buf());

        store.save(&SecretString::from("Bearer tok1".to_string())).unwrap();

        let reopened = FileCredentialStore::new(store.path());
        assert_eq!(
            reopened.load().unwrap().unwrap().expose_secret(),
            "Bearer tok1"
        );

        reopened.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_keeps_unrelated_keys() {
        let store = temp_store();
        let _guard = FileGuard(store.path().to_path_buf());
        fs::write(store.path(), r#"{"theme":"dark"}"#).unwrap();

        store.save(&SecretString::from("tok".to_string())).unwrap();
        store.clear().unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains(AUTH_HEADER_KEY));
    }

    #[test]
    fn file_store_rejects_non_object() {
        let store = temp_store();
        let _guard = FileGuard(store.path().to_path_buf());
        fs::write(store.path(), "[1,2]").unwrap();

        assert!(matches!(store.load(), Err(AppError::Storage(_))));
    }
}
