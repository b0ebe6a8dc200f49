use crate::errors::{AssetSyncError, Result};
use crate::models::asset::{matching_serials, HardwareResponse};
use crate::models::category::AssetCategory;
use reqwest::Client;
use std::time::Duration;

pub struct SnipeItClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl SnipeItClient {
    pub fn new(base_url: String, api_token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_token,
        })
    }

    /// Serials of the assets in `category` checked out to `email`.
    ///
    /// Any failure is reported as `AssetLookupFailed` for that category.
    pub async fn search_assets(&self, email: &str, category: AssetCategory) -> Result<Vec<String>> {
        let url = format!("{}/hardware", self.base_url);
        let category_id = category.id().to_string();

        let lookup_failed = |status: Option<u16>, message: String| AssetSyncError::AssetLookupFailed {
            category,
            status,
            message,
        };

        let response = self
            .client
            .get(&url)
            .query(&[("search", email), ("category_id", category_id.as_str())])
            .bearer_auth(&self.api_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| lookup_failed(None, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(lookup_failed(Some(status.as_u16()), text));
        }

        let hardware = response
            .json::<HardwareResponse>()
            .await
            .map_err(|e| lookup_failed(None, format!("Failed to parse Snipe-IT response: {}", e)))?;

        Ok(matching_serials(hardware.rows, email))
    }

    /// Cheap authenticated request used by `config validate`.
    pub async fn check_connection(&self) -> Result<()> {
        let url = format!("{}/hardware", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", "1")])
            .bearer_auth(&self.api_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AssetSyncError::ConfigValidationFailed(format!(
                "Snipe-IT API error ({}): {}",
                status, text
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(url: &str) -> SnipeItClient {
        SnipeItClient::new(url.to_string(), "snipe-token".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search_assets_filters_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/hardware")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".into(), "jane.doe@org.com".into()),
                Matcher::UrlEncoded("category_id".into(), "2".into()),
            ]))
            .match_header("authorization", "Bearer snipe-token")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"total":3,"rows":[
                    {"serial":"C02XK1","assigned_to":{"email":"Jane.Doe@org.com"}},
                    {"serial":"C02XK2","assigned_to":{"email":"jane.doe@org.com.au"}},
                    {"serial":"C02XK3","assigned_to":{"email":"jane.doe@org.com"}}
                ]}"#,
            )
            .create_async()
            .await;

        let serials = client(&server.url())
            .search_assets("jane.doe@org.com", AssetCategory::Hardware)
            .await
            .unwrap();

        assert_eq!(serials, vec!["C02XK1", "C02XK3"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_assets_empty_rows() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/hardware")
            .match_query(Matcher::UrlEncoded("category_id".into(), "26".into()))
            .with_status(200)
            .with_body(r#"{"total":0,"rows":[]}"#)
            .create_async()
            .await;

        let serials = client(&server.url())
            .search_assets("a@org.com", AssetCategory::AccessCard)
            .await
            .unwrap();

        assert!(serials.is_empty());
    }

    #[tokio::test]
    async fn test_search_assets_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/hardware")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status":"error","messages":"Unauthorized."}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .search_assets("a@org.com", AssetCategory::LockerKey)
            .await
            .unwrap_err();

        match err {
            AssetSyncError::AssetLookupFailed {
                category,
                status,
                message,
            } => {
                assert_eq!(category, AssetCategory::LockerKey);
                assert_eq!(status, Some(401));
                assert!(message.contains("Unauthorized"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_assets_bad_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/hardware")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client(&server.url())
            .search_assets("a@org.com", AssetCategory::Hardware)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AssetSyncError::AssetLookupFailed { status: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_search_assets_unreachable() {
        // Nothing listens on port 9 locally.
        let err = client("http://127.0.0.1:9")
            .search_assets("a@org.com", AssetCategory::Hardware)
            .await
            .unwrap_err();

        assert!(matches!(err, AssetSyncError::AssetLookupFailed { .. }));
    }

    #[tokio::test]
    async fn test_check_connection() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/hardware")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .match_header("authorization", "Bearer snipe-token")
            .with_status(200)
            .with_body(r#"{"total":0,"rows":[]}"#)
            .create_async()
            .await;

        client(&server.url()).check_connection().await.unwrap();
        mock.assert_async().await;
    }
}
