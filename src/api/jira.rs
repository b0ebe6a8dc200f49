use crate::errors::{AssetSyncError, Result};
use crate::models::issue::UpdatePayload;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub struct JiraClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl JiraClient {
    /// `api_token` is the pre-encoded `Basic` credential.
    pub fn new(base_url: String, api_token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_token,
        })
    }

    fn authorization(&self) -> String {
        format!("Basic {}", self.api_token)
    }

    /// Writes the asset fields into `issue_key`. Only `204 No Content` counts as success.
    pub async fn update_issue(&self, issue_key: &str, payload: &UpdatePayload) -> Result<()> {
        let url = format!(
            "{}/issue/{}",
            self.base_url,
            urlencoding::encode(issue_key)
        );

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.authorization())
            .json(payload)
            .send()
            .await
            .map_err(|e| AssetSyncError::IssueUpdateFailed {
                issue_key: issue_key.to_string(),
                status: None,
                body: e.to_string(),
            })?;

        if response.status() != StatusCode::NO_CONTENT {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AssetSyncError::IssueUpdateFailed {
                issue_key: issue_key.to_string(),
                status: Some(status.as_u16()),
                body: text,
            });
        }

        Ok(())
    }

    /// Cheap authenticated request used by `config validate`.
    pub async fn check_connection(&self) -> Result<()> {
        let url = format!("{}/myself", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.authorization())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AssetSyncError::ConfigValidationFailed(format!(
                "Jira API error ({}): {}",
                status, text
            )));
        }

        Ok(())
    }
}
