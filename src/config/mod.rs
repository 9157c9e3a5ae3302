use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub realtime: RealtimeConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Hosted relational backend: REST data interface plus identity provider,
/// both rooted at `url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    /// Public (anon) key, sent alongside user tokens for identity resolution.
    pub anon_key: String,
    /// Privileged key used for delegated data operations.
    pub service_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    pub url: String,
}

/// Media-storage credentials. Consumed by clients, not by this service;
/// validated at startup so a misconfigured deploy shows up in the logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub url: String,
    pub access_key: String,
}

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";
const DEFAULT_REALTIME_URL: &str = "ws://127.0.0.1:4000/socket";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        Self {
            environment,
            backend: BackendConfig {
                url: env::var("LOOP_BACKEND_URL")
                    .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
                anon_key: env::var("LOOP_BACKEND_ANON_KEY").unwrap_or_default(),
                service_key: env::var("LOOP_BACKEND_SERVICE_KEY").unwrap_or_default(),
            },
            realtime: RealtimeConfig {
                url: env::var("LOOP_REALTIME_URL")
                    .unwrap_or_else(|_| DEFAULT_REALTIME_URL.to_string()),
            },
            storage: StorageConfig {
                url: env::var("LOOP_STORAGE_URL").unwrap_or_default(),
                access_key: env::var("LOOP_STORAGE_KEY").unwrap_or_default(),
            },
        }
    }

    /// Names of settings that are missing or empty. Startup logs the result
    /// and continues; nothing here blocks the process.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.backend.anon_key.is_empty() {
            missing.push("LOOP_BACKEND_ANON_KEY");
        }
        if self.backend.service_key.is_empty() {
            missing.push("LOOP_BACKEND_SERVICE_KEY");
        }
        if self.storage.url.is_empty() {
            missing.push("LOOP_STORAGE_URL");
        }
        if self.storage.access_key.is_empty() {
            missing.push("LOOP_STORAGE_KEY");
        }
        missing
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_missing_settings() {
        let config = AppConfig {
            environment: Environment::Development,
            backend: BackendConfig {
                url: "https://backend.example.com".to_string(),
                anon_key: String::new(),
                service_key: "service".to_string(),
            },
            realtime: RealtimeConfig {
                url: DEFAULT_REALTIME_URL.to_string(),
            },
            storage: StorageConfig {
                url: String::new(),
                access_key: String::new(),
            },
        };

        let missing = config.validate();
        assert_eq!(
            missing,
            vec!["LOOP_BACKEND_ANON_KEY", "LOOP_STORAGE_URL", "LOOP_STORAGE_KEY"]
        );
    }

    #[test]
    fn validate_passes_on_complete_config() {
        let config = AppConfig {
            environment: Environment::Production,
            backend: BackendConfig {
                url: "https://backend.example.com".to_string(),
                anon_key: "anon".to_string(),
                service_key: "service".to_string(),
            },
            realtime: RealtimeConfig {
                url: "wss://realtime.example.com/socket".to_string(),
            },
            storage: StorageConfig {
                url: "https://media.example.com".to_string(),
                access_key: "key".to_string(),
            },
        };
        assert!(config.validate().is_empty());
    }
}
