//! Webhook configuration lookup.

use serde::{Deserialize, Serialize};

use crate::client::escape_segment;
use crate::models::{ApiResponse, null_to_default};
use crate::{Client, Result};

/// Webhook endpoints, obtained with [`Client::webhooks`].
#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a> {
    pub(crate) client: &'a Client,
}

/// A configured webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    #[serde(deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(deserialize_with = "null_to_default")]
    pub enabled: bool,
    /// Event types delivered to this webhook, e.g. `delivery`, `bounce`.
    #[serde(deserialize_with = "null_to_default")]
    pub event_types: Vec<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub auth_type: String,
    #[serde(deserialize_with = "null_to_default")]
    pub has_auth_credentials: bool,
    pub last_successful_at: Option<String>,
    pub last_failure_at: Option<String>,
    pub last_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListWebhooksData {
    #[serde(deserialize_with = "null_to_default")]
    pub webhooks: Vec<Webhook>,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<ApiResponse<ListWebhooksData>> {
        self.client.get("webhooks", &[]).await
    }

    pub async fn get(&self, webhook_id: &str) -> Result<ApiResponse<Webhook>> {
        let path = format!("webhooks/{}", escape_segment(webhook_id));
        self.client.get(&path, &[]).await
    }
}
