use crate::models::category::AssetCategory;
use std::fmt;

#[derive(Debug)]
pub enum AssetSyncError {
    // Configuration errors
    ConfigInvalid(String),
    ConfigValidationFailed(String),

    // Webhook validation errors
    InvalidPayload(String),
    MissingEmail,
    InvalidEmailDomain { email: String, domain: String },

    // Snipe-IT errors
    AssetLookupFailed {
        category: AssetCategory,
        status: Option<u16>,
        message: String,
    },

    // Jira errors
    IssueUpdateFailed {
        issue_key: String,
        status: Option<u16>,
        body: String,
    },

    // Network errors
    NetworkError(String),

    // Generic error
    Other(String),
}

impl AssetSyncError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AssetSyncError::InvalidPayload(_)
                | AssetSyncError::MissingEmail
                | AssetSyncError::InvalidEmailDomain { .. }
        )
    }

    /// Short message returned to the invoker. Details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AssetSyncError::InvalidPayload(_) => "Invalid webhook payload.",
            AssetSyncError::MissingEmail | AssetSyncError::InvalidEmailDomain { .. } => {
                "Invalid email domain or email not provided."
            }
            AssetSyncError::IssueUpdateFailed { .. } => "Failed to update JIRA issue.",
            _ => "Failed to sync assets.",
        }
    }
}

impl fmt::Display for AssetSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration errors
            AssetSyncError::ConfigInvalid(msg) => {
                writeln!(f, "Invalid configuration")?;
                writeln!(f, "   {}\n", msg)?;
                writeln!(f, "   To fix:")?;
                writeln!(f, "   1. Export SNIPE_IT_API_URL, SNIPE_IT_API_TOKEN, JIRA_API_URL and JIRA_API_TOKEN")?;
                write!(f, "   2. Or pass a TOML file with --config")
            }
            AssetSyncError::ConfigValidationFailed(msg) => {
                writeln!(f, "Configuration validation failed")?;
                writeln!(f, "   {}\n", msg)?;
                write!(f, "   Check: asset-sync config show")
            }

            // Webhook validation errors
            AssetSyncError::InvalidPayload(msg) => {
                write!(f, "Invalid webhook payload: {}", msg)
            }
            AssetSyncError::MissingEmail => {
                write!(f, "Personal email field is missing from the issue")
            }
            AssetSyncError::InvalidEmailDomain { email, domain } => {
                write!(f, "Email '{}' does not end with '{}'", email, domain)
            }

            // Snipe-IT errors
            AssetSyncError::AssetLookupFailed {
                category,
                status: Some(status),
                message,
            } => write!(
                f,
                "Failed to fetch data for category {} ({}): {}",
                category.id(),
                status,
                message
            ),
            AssetSyncError::AssetLookupFailed {
                category,
                status: None,
                message,
            } => write!(
                f,
                "Failed to fetch data for category {}: {}",
                category.id(),
                message
            ),

            // Jira errors
            AssetSyncError::IssueUpdateFailed {
                issue_key,
                status: Some(status),
                body,
            } => write!(f, "Failed to update JIRA issue {} ({}): {}", issue_key, status, body),
            AssetSyncError::IssueUpdateFailed {
                issue_key,
                status: None,
                body,
            } => write!(f, "Failed to update JIRA issue {}: {}", issue_key, body),

            // Network errors
            AssetSyncError::NetworkError(msg) => write!(f, "Network error: {}", msg),

            // Generic
            AssetSyncError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for AssetSyncError {}

impl From<config::ConfigError> for AssetSyncError {
    fn from(err: config::ConfigError) -> Self {
        AssetSyncError::ConfigInvalid(err.to_string())
    }
}

impl From<reqwest::Error> for AssetSyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            AssetSyncError::NetworkError(err.to_string())
        } else {
            AssetSyncError::Other(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AssetSyncError>;
