//! Sending domain management.

use serde::{Deserialize, Serialize};

use crate::client::escape_segment;
use crate::models::{ApiResponse, null_to_default};
use crate::{Client, Result};

/// Domain endpoints, obtained with [`Client::domains`].
#[derive(Debug, Clone, Copy)]
pub struct Domains<'a> {
    pub(crate) client: &'a Client,
}

/// A sending domain as returned by the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    #[serde(deserialize_with = "null_to_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_to_default")]
    pub status: String,
    #[serde(deserialize_with = "null_to_default")]
    pub status_label: String,
    /// Whether the domain is verified for sending.
    #[serde(deserialize_with = "null_to_default")]
    pub can_send: bool,
    pub cname_status: Option<String>,
    pub dkim_status: Option<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_to_default")]
    pub updated_at: String,
}

/// A single domain with its DNS and tracking configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainDetail {
    #[serde(deserialize_with = "null_to_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_to_default")]
    pub status: String,
    #[serde(deserialize_with = "null_to_default")]
    pub status_label: String,
    #[serde(deserialize_with = "null_to_default")]
    pub can_send: bool,
    pub cname_status: Option<String>,
    pub dkim_status: Option<String>,
    pub tracking_domain: Option<String>,
    pub dns: Option<DomainDns>,
    #[serde(deserialize_with = "null_to_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_to_default")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainDns {
    pub dkim: Option<DomainDkim>,
}

/// The DKIM record to publish for a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainDkim {
    #[serde(deserialize_with = "null_to_default")]
    pub selector: String,
    /// Public key value of the TXT record.
    #[serde(deserialize_with = "null_to_default")]
    pub public: String,
}

/// Request body for `POST /domains`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDomainRequest {
    /// Domain name to register, e.g. `example.com`.
    pub domain: String,
}

impl CreateDomainRequest {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

/// A newly registered domain. Starts out pending until DNS is verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDomainData {
    #[serde(deserialize_with = "null_to_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_to_default")]
    pub status: String,
    #[serde(deserialize_with = "null_to_default")]
    pub status_label: String,
    pub dkim: Option<DomainDkim>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListDomainsData {
    #[serde(deserialize_with = "null_to_default")]
    pub domains: Vec<Domain>,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List every sending domain on the account.
    pub async fn list(&self) -> Result<ApiResponse<ListDomainsData>> {
        self.client.get("domains", &[]).await
    }

    /// Fetch one domain including its DNS records.
    ///
    /// # Examples
    /// ```no_run
    /// # use lettr::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), lettr::Error> {
    /// let client = Client::new("your-api-key")?;
    /// match client.domains().get("example.com").await {
    ///     Ok(domain) => println!("{}", domain.data.status_label),
    ///     Err(err) if err.is_not_found() => println!("not registered"),
    ///     Err(err) => return Err(err),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, domain: &str) -> Result<ApiResponse<DomainDetail>> {
        let path = format!("domains/{}", escape_segment(domain));
        self.client.get(&path, &[]).await
    }

    /// Register a new sending domain.
    pub async fn create(
        &self,
        request: &CreateDomainRequest,
    ) -> Result<ApiResponse<CreateDomainData>> {
        self.client.post("domains", request).await
    }

    /// Remove a sending domain. The server answers 204 with no body.
    pub async fn delete(&self, domain: &str) -> Result<()> {
        let path = format!("domains/{}", escape_segment(domain));
        self.client.delete(&path).await
    }
}
