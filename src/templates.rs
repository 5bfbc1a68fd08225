//! Email templates.

use serde::{Deserialize, Serialize};

use crate::models::{ApiResponse, PagePagination, null_to_default};
use crate::{Client, Result};

/// Template endpoints, obtained with [`Client::templates`].
#[derive(Debug, Clone, Copy)]
pub struct Templates<'a> {
    pub(crate) client: &'a Client,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    #[serde(deserialize_with = "null_to_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_to_default")]
    pub project_id: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub folder_id: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_to_default")]
    pub updated_at: String,
}

/// A merge tag found in template content, e.g. `{{FIRST_NAME}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeTag {
    #[serde(deserialize_with = "null_to_default")]
    pub key: String,
    #[serde(deserialize_with = "null_to_default")]
    pub required: bool,
}

/// Filters for `GET /templates`.
///
/// Unset and zero fields are left out of the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListTemplatesParams {
    /// Project to list from; the team's default project when unset.
    pub project_id: Option<u64>,
    /// Results per page (1-100, server default 25).
    pub per_page: Option<u32>,
    /// Page number, starting at 1.
    pub page: Option<u32>,
}

impl ListTemplatesParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let pairs = [
            ("project_id", self.project_id),
            ("per_page", self.per_page.map(u64::from)),
            ("page", self.page.map(u64::from)),
        ];
        pairs
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .filter(|n| *n > 0)
                    .map(|n| (key, n.to_string()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListTemplatesData {
    #[serde(deserialize_with = "null_to_default")]
    pub templates: Vec<Template>,
    #[serde(deserialize_with = "null_to_default")]
    pub pagination: PagePagination,
}

/// Request body for `POST /templates`.
///
/// Provide exactly one of `html` or `json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Topol editor JSON document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<u64>,
}

impl CreateTemplateRequest {
    /// A template with HTML content.
    pub fn html(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html: Some(html.into()),
            ..Self::default()
        }
    }

    /// A template with Topol editor JSON content.
    pub fn topol(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: Some(json.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTemplateData {
    #[serde(deserialize_with = "null_to_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_to_default")]
    pub project_id: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub folder_id: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub active_version: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub merge_tags: Vec<MergeTag>,
    #[serde(deserialize_with = "null_to_default")]
    pub created_at: String,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List templates one page at a time.
    ///
    /// Pass `None` to use server defaults.
    ///
    /// # Examples
    /// ```no_run
    /// # use lettr::{Client, ListTemplatesParams};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), lettr::Error> {
    /// let client = Client::new("your-api-key")?;
    /// let params = ListTemplatesParams { page: Some(2), ..Default::default() };
    /// let page = client.templates().list(Some(&params)).await?;
    /// for template in page.data.templates {
    ///     println!("{} ({})", template.name, template.slug);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(
        &self,
        params: Option<&ListTemplatesParams>,
    ) -> Result<ApiResponse<ListTemplatesData>> {
        let query = params.map(ListTemplatesParams::to_query).unwrap_or_default();
        self.client.get("templates", &query).await
    }

    pub async fn create(
        &self,
        request: &CreateTemplateRequest,
    ) -> Result<ApiResponse<CreateTemplateData>> {
        self.client.post("templates", request).await
    }
}
