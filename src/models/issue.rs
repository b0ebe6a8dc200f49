use crate::errors::{AssetSyncError, Result};
use serde::{Deserialize, Serialize};

/// Invocation envelope carrying the raw webhook body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InboundEvent {
    pub body: String,
}

impl InboundEvent {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Accepts either an envelope (`{"body": "..."}`) or the raw webhook JSON.
    pub fn from_input(input: &str) -> Self {
        match serde_json::from_str::<InboundEvent>(input) {
            Ok(event) => event,
            Err(_) => Self::new(input),
        }
    }

    pub fn webhook(&self) -> Result<JiraWebhook> {
        serde_json::from_str(&self.body)
            .map_err(|e| AssetSyncError::InvalidPayload(e.to_string()))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JiraWebhook {
    pub issue: Issue,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IssueFields {
    /// Employee's personal email.
    #[serde(rename = "customfield_11814", default)]
    pub personal_email: Option<String>,
}

/// Body of `PUT /issue/{key}`.
#[derive(Debug, Serialize)]
pub struct UpdatePayload {
    pub fields: AssetFields,
}

#[derive(Debug, Serialize)]
pub struct AssetFields {
    #[serde(rename = "customfield_10374")]
    pub hardware: String,
    #[serde(rename = "customfield_11817")]
    pub locker_keys: String,
    #[serde(rename = "customfield_11823")]
    pub access_cards: String,
}

impl UpdatePayload {
    pub fn new(hardware: String, locker_keys: String, access_cards: String) -> Self {
        Self {
            fields: AssetFields {
                hardware,
                locker_keys,
                access_cards,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_with_email() {
        let event = InboundEvent::new(
            r#"{"issue":{"key":"HR-42","fields":{"customfield_11814":"alice@org.com","summary":"Offboarding"}}}"#,
        );
        let webhook = event.webhook().unwrap();
        assert_eq!(webhook.issue.key, "HR-42");
        assert_eq!(webhook.issue.fields.personal_email.as_deref(), Some("alice@org.com"));
    }

    #[test]
    fn test_webhook_null_or_missing_email() {
        let null_email = InboundEvent::new(r#"{"issue":{"key":"HR-1","fields":{"customfield_11814":null}}}"#);
        assert!(null_email.webhook().unwrap().issue.fields.personal_email.is_none());

        let no_fields = InboundEvent::new(r#"{"issue":{"key":"HR-1"}}"#);
        assert!(no_fields.webhook().unwrap().issue.fields.personal_email.is_none());
    }

    #[test]
    fn test_webhook_without_issue_is_invalid() {
        let event = InboundEvent::new(r#"{"webhookEvent":"jira:issue_updated"}"#);
        assert!(matches!(event.webhook(), Err(AssetSyncError::InvalidPayload(_))));

        let garbage = InboundEvent::new("not json");
        assert!(matches!(garbage.webhook(), Err(AssetSyncError::InvalidPayload(_))));
    }

    #[test]
    fn test_from_input_detects_envelope() {
        let raw = r#"{"issue":{"key":"HR-7","fields":{}}}"#;
        let envelope = serde_json::json!({ "body": raw }).to_string();

        assert_eq!(InboundEvent::from_input(&envelope).body, raw);
        assert_eq!(InboundEvent::from_input(raw).body, raw);
    }

    #[test]
    fn test_update_payload_field_ids() {
        let payload = UpdatePayload::new("HW-1".into(), "None Found".into(), "CARD-9".into());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": {
                    "customfield_10374": "HW-1",
                    "customfield_11817": "None Found",
                    "customfield_11823": "CARD-9"
                }
            })
        );
    }
}
