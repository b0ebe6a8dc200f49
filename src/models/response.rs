use serde::{Deserialize, Serialize};

/// Result returned to whoever invoked the handler.
///
/// `body` holds the message JSON-encoded as a string literal, the shape
/// expected by serverless proxy integrations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            // Serializing a &str cannot fail.
            body: serde_json::to_string(message).unwrap_or_else(|_| format!("\"{}\"", message)),
        }
    }

    pub fn ok(message: &str) -> Self {
        Self::new(200, message)
    }

    /// Every failure class is reported to the invoker as 400.
    pub fn failure(message: &str) -> Self {
        Self::new(400, message)
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Decoded human-readable message.
    pub fn message(&self) -> String {
        serde_json::from_str(&self.body).unwrap_or_else(|_| self.body.clone())
    }
}
