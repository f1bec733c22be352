//! API location resolution. The base URL is derived from the host name the
//! client runs as, through a static table, with an optional explicit override
//! so deployments can point at another API without rebuilding. Configuration
//! values are public; do not store secrets here.

use super::errors::AppError;

/// Host name to API base URL mapping.
const SERVER_URLS: &[(&str, &str)] = &[
    ("localhost", "http://localhost:8080"),
    ("frontend.example.com", "http://api.example.com"),
];

/// Client configuration resolved once at bootstrap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub api_base_url: String,
}

impl AppConfig {
    /// Resolves the API base URL for `host`, letting a non-empty override win.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the host is unknown and no override is set.
    pub fn resolve(host: &str, api_base_url: Option<&str>) -> Result<Self, AppError> {
        let host = host.trim().to_string();

        if let Some(value) = api_base_url.and_then(normalize_runtime_value) {
            return Ok(Self {
                host,
                api_base_url: value,
            });
        }

        let api_base_url = server_url_for(&host)
            .ok_or_else(|| AppError::Config(format!("Unable to compute server URL for {host}")))?;

        Ok(Self {
            host,
            api_base_url: api_base_url.to_string(),
        })
    }
}

fn server_url_for(host: &str) -> Option<&'static str> {
    SERVER_URLS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(host))
        .map(|(_, url)| *url)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, normalize_runtime_value};
    use crate::app_lib::AppError;

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  http://api.example.com "),
            Some("http://api.example.com".to_string())
        );
    }

    #[test]
    fn resolve_known_hosts() {
        let local = AppConfig::resolve("localhost", None).expect("localhost is known");
        assert_eq!(local.api_base_url, "http://localhost:8080");

        let frontend = AppConfig::resolve("frontend.example.com", None).expect("host is known");
        assert_eq!(frontend.api_base_url, "http://api.example.com");
    }

    #[test]
    fn resolve_unknown_host_is_config_error() {
        let result = AppConfig::resolve("elsewhere.example.org", None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn resolve_override_wins_and_ignores_blank() {
        let config = AppConfig::resolve("elsewhere.example.org", Some(" http://10.0.0.1:9000 "))
            .expect("override is used");
        assert_eq!(config.api_base_url, "http://10.0.0.1:9000");

        let config = AppConfig::resolve("localhost", Some("  ")).expect("blank override ignored");
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }
}
