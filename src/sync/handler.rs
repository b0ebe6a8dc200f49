use crate::api::jira::JiraClient;
use crate::api::snipe_it::SnipeItClient;
use crate::config::settings::Settings;
use crate::errors::{AssetSyncError, Result};
use crate::models::category::AssetCategory;
use crate::models::issue::{InboundEvent, UpdatePayload};
use crate::models::response::HandlerResponse;
use tracing::{debug, error, info, warn};

/// Written into a field when no serials matched.
pub const NONE_FOUND: &str = "None Found";

/// Joins serials with `", "` in registry order, or returns [`NONE_FOUND`].
pub fn format_serials(serials: &[String]) -> String {
    if serials.is_empty() {
        NONE_FOUND.to_string()
    } else {
        serials.join(", ")
    }
}

/// Checks the personal email against the organisation domain and lowercases it.
pub fn validate_email(email: Option<&str>, domain: &str) -> Result<String> {
    let email = email
        .filter(|e| !e.is_empty())
        .ok_or(AssetSyncError::MissingEmail)?
        .to_lowercase();
    if !email.ends_with(&domain.to_lowercase()) {
        return Err(AssetSyncError::InvalidEmailDomain {
            email,
            domain: domain.to_string(),
        });
    }

    Ok(email)
}

/// Formatted serials for the three categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSummary {
    pub hardware: String,
    pub locker_keys: String,
    pub access_cards: String,
}

impl AssetSummary {
    pub fn get(&self, category: AssetCategory) -> &str {
        match category {
            AssetCategory::Hardware => &self.hardware,
            AssetCategory::LockerKey => &self.locker_keys,
            AssetCategory::AccessCard => &self.access_cards,
        }
    }

    fn payload(&self) -> UpdatePayload {
        UpdatePayload::new(
            self.hardware.clone(),
            self.locker_keys.clone(),
            self.access_cards.clone(),
        )
    }

    pub fn message(&self) -> String {
        format!(
            "JIRA issue updated successfully with hardware serials: {}, locker keys: {}, and access cards: {}",
            self.hardware, self.locker_keys, self.access_cards
        )
    }
}

pub struct AssetSyncHandler {
    snipe_it: SnipeItClient,
    jira: JiraClient,
    email_domain: String,
}

impl AssetSyncHandler {
    pub fn new(settings: &Settings) -> Result<Self> {
        let snipe_it = SnipeItClient::new(
            settings.snipe_it_api_url.clone(),
            settings.snipe_it_api_token.clone(),
            settings.request_timeout(),
        )?;
        let jira = JiraClient::new(
            settings.jira_api_url.clone(),
            settings.jira_api_token.clone(),
            settings.request_timeout(),
        )?;

        Ok(Self::from_clients(snipe_it, jira, settings.email_domain.clone()))
    }

    pub fn from_clients(snipe_it: SnipeItClient, jira: JiraClient, email_domain: String) -> Self {
        Self {
            snipe_it,
            jira,
            email_domain,
        }
    }

    pub fn snipe_it(&self) -> &SnipeItClient {
        &self.snipe_it
    }

    pub fn jira(&self) -> &JiraClient {
        &self.jira
    }

    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Runs the three category lookups. A failed lookup is logged and counts as empty.
    pub async fn lookup_assets(&self, email: &str) -> AssetSummary {
        let (hardware, locker_keys, access_cards) = tokio::join!(
            self.snipe_it.search_assets(email, AssetCategory::Hardware),
            self.snipe_it.search_assets(email, AssetCategory::LockerKey),
            self.snipe_it.search_assets(email, AssetCategory::AccessCard),
        );

        AssetSummary {
            hardware: format_serials(&or_empty(AssetCategory::Hardware, hardware)),
            locker_keys: format_serials(&or_empty(AssetCategory::LockerKey, locker_keys)),
            access_cards: format_serials(&or_empty(AssetCategory::AccessCard, access_cards)),
        }
    }

    /// Validates the event, looks up assets and writes them into the issue.
    pub async fn sync(&self, event: &InboundEvent) -> Result<AssetSummary> {
        let webhook = event.webhook()?;
        let issue_key = webhook.issue.key;

        let email = validate_email(
            webhook.issue.fields.personal_email.as_deref(),
            &self.email_domain,
        )?;
        debug!(issue_key = %issue_key, "email validated");

        let summary = self.lookup_assets(&email).await;
        debug!(
            issue_key = %issue_key,
            hardware = %summary.hardware,
            locker_keys = %summary.locker_keys,
            access_cards = %summary.access_cards,
            "assets resolved"
        );

        self.jira.update_issue(&issue_key, &summary.payload()).await?;
        info!(issue_key = %issue_key, "issue updated with asset serials");

        Ok(summary)
    }

    /// Entry point for one webhook invocation.
    pub async fn handle(&self, event: &InboundEvent) -> HandlerResponse {
        match self.sync(event).await {
            Ok(summary) => HandlerResponse::ok(&summary.message()),
            Err(err) => {
                match &err {
                    AssetSyncError::IssueUpdateFailed {
                        issue_key,
                        status,
                        body,
                    } => error!(issue_key = %issue_key, status = ?status, body = %body, "failed to update issue"),
                    e if e.is_validation() => warn!(error = %e, "rejected webhook"),
                    e => error!(error = %e, "asset sync failed"),
                }
                HandlerResponse::failure(err.public_message())
            }
        }
    }
}

fn or_empty(category: AssetCategory, result: Result<Vec<String>>) -> Vec<String> {
    match result {
        Ok(serials) => serials,
        Err(e) => {
            warn!(
                category = %category,
                category_id = category.id(),
                error = %e,
                "asset lookup failed, treating as none found"
            );
            Vec::new()
        }
    }
}
