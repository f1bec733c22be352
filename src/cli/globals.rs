use crate::app_lib::{AppConfig, AppError, CredentialStore, FileCredentialStore};
use crate::cli::commands::connection::{DEFAULT_CREDENTIAL_FILE, DEFAULT_HOST};
use std::{path::PathBuf, sync::Arc};

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub host: String,
    pub api_base_url: Option<String>,
    pub credential_file: PathBuf,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_base_url: None,
            credential_file: PathBuf::from(DEFAULT_CREDENTIAL_FILE),
        }
    }
}

impl GlobalArgs {
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_credential_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_file = path.into();
        self
    }

    /// # Errors
    /// Returns `AppError::Config` when no API base URL can be derived.
    pub fn config(&self) -> Result<AppConfig, AppError> {
        AppConfig::resolve(&self.host, self.api_base_url.as_deref())
    }

    #[must_use]
    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        Arc::new(FileCredentialStore::new(self.credential_file.clone()))
    }
}
