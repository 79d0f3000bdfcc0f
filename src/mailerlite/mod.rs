pub mod dto;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;
use crate::models::is_numeric_id;

pub use dto::GroupInfo;

#[derive(Clone, Debug)]
pub struct MailerLiteConfig {
    pub base_url: String,
}

impl MailerLiteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
pub trait MailerLiteClient: Send + Sync {
    async fn fetch_group(&self, api_key: &str, group_id: &str) -> Result<GroupInfo, AppError>;
}

pub struct MailerLiteHttpClient {
    client: Client,
    config: MailerLiteConfig,
}

impl MailerLiteHttpClient {
    pub fn new(config: MailerLiteConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Provider(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MailerLiteClient for MailerLiteHttpClient {
    async fn fetch_group(&self, api_key: &str, group_id: &str) -> Result<GroupInfo, AppError> {
        // stored documents are not validated on load
        if !is_numeric_id(group_id) {
            return Err(AppError::Provider(format!("Invalid MailerLite group id: {}", group_id)));
        }

        let url = format!("{}/groups/{}", self.config.base_url, group_id);

        let response = self.client
            .get(&url)
            .header("X-MailerLite-ApiKey", api_key)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("MailerLite request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!("MailerLite API error {}: {}", status, body)));
        }

        let body_text = response.text().await
            .map_err(|e| AppError::Provider(format!("Failed to read MailerLite response: {}", e)))?;

        serde_json::from_str::<GroupInfo>(&body_text)
            .map_err(|e| {
                tracing::error!("Failed to parse group {}: {}", group_id, e);
                AppError::Provider(format!("Failed to parse MailerLite response: {}", e))
            })
    }
}
