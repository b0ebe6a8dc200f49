use crate::errors::{AssetSyncError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_EMAIL_DOMAIN: &str = "@traderepublic.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Process-wide configuration, read once at startup.
///
/// Keys match the environment variable names, lowercased
/// (`SNIPE_IT_API_URL` -> `snipe_it_api_url`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub snipe_it_api_url: String,
    pub snipe_it_api_token: String,
    pub jira_api_url: String,
    pub jira_api_token: String,
    pub email_domain: String,
    pub request_timeout_secs: u64,
    pub bind_address: String,
}

impl Settings {
    /// Loads defaults, then the config file, then the process environment.
    ///
    /// An explicit `config_file` must exist; the default one is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::from_sources(config_file, None)
    }

    fn from_sources(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let file = match config_file {
            Some(path) => Some(File::from(path).format(FileFormat::Toml).required(true)),
            None => Self::config_path()
                .ok()
                .map(|path| File::from(path).format(FileFormat::Toml).required(false)),
        };

        let mut builder = Config::builder()
            .set_default("email_domain", DEFAULT_EMAIL_DOMAIN)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?;

        if let Some(file) = file {
            builder = builder.add_source(file);
        }

        let settings: Settings = builder
            .add_source(Environment::default().try_parsing(true).source(env))
            .build()?
            .try_deserialize()?;

        settings.validated()
    }

    fn validated(mut self) -> Result<Self> {
        for (name, value) in [
            ("SNIPE_IT_API_URL", &self.snipe_it_api_url),
            ("SNIPE_IT_API_TOKEN", &self.snipe_it_api_token),
            ("JIRA_API_URL", &self.jira_api_url),
            ("JIRA_API_TOKEN", &self.jira_api_token),
        ] {
            if value.trim().is_empty() {
                return Err(AssetSyncError::ConfigValidationFailed(format!(
                    "{} is empty",
                    name
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(AssetSyncError::ConfigValidationFailed(
                "REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        self.snipe_it_api_url = self.snipe_it_api_url.trim().trim_end_matches('/').to_string();
        self.jira_api_url = self.jira_api_url.trim().trim_end_matches('/').to_string();

        let domain = self.email_domain.trim().to_lowercase();
        let domain = if domain.starts_with('@') {
            domain
        } else {
            format!("@{}", domain)
        };
        if domain.len() < 2 {
            return Err(AssetSyncError::ConfigValidationFailed(
                "EMAIL_DOMAIN must name a domain, e.g. @example.com".to_string(),
            ));
        }
        self.email_domain = domain;

        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| {
            AssetSyncError::ConfigInvalid("HOME environment variable not set".to_string())
        })?;
        Ok(PathBuf::from(home).join(".asset-sync"))
    }
}

/// Keeps the first and last four characters of a secret.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
