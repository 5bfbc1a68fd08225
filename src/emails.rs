//! Email sending and event lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::escape_segment;
use crate::models::{ApiResponse, CursorPagination, null_to_default};
use crate::{Client, Result};

/// Email endpoints, obtained with [`Client::emails`].
#[derive(Debug, Clone, Copy)]
pub struct Emails<'a> {
    pub(crate) client: &'a Client,
}

/// Request body for `POST /emails`.
///
/// Optional fields left as `None` (or empty, for `attachments`) are omitted
/// from the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendEmailRequest {
    /// Sender address.
    pub from: String,
    /// Sender display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    /// Recipient addresses (max 50).
    pub to: Vec<String>,
    pub subject: String,
    /// HTML body. At least one of `html` or `text` is required unless a
    /// template is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Plain text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_version: Option<u32>,
    /// Project the template is sourced from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Values substituted into template merge tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution_data: Option<HashMap<String, serde_json::Value>>,
    /// Custom key-value pairs stored with the email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SendEmailOptions>,
}

impl SendEmailRequest {
    /// Start a request with the required fields.
    pub fn new<I, S>(from: impl Into<String>, to: I, subject: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            from: from.into(),
            to: to.into_iter().map(Into::into).collect(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Render a stored template instead of inline content.
    #[must_use]
    pub fn with_template(mut self, slug: impl Into<String>) -> Self {
        self.template_slug = Some(slug.into());
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Add one template substitution value.
    #[must_use]
    pub fn with_substitution(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.substitution_data
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: SendEmailOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Tracking and delivery toggles.
///
/// `None` defers to the account default; `Some(false)` explicitly disables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_tracking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_tracking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactional: Option<bool>,
}

/// A base64-encoded file attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub name: String,
    /// MIME type, e.g. `application/pdf`.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Base64-encoded content.
    pub data: String,
}

/// Result of a send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendEmailData {
    /// Transmission id, usable with [`Emails::get`].
    #[serde(deserialize_with = "null_to_default")]
    pub request_id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub accepted: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub rejected: u32,
}

/// One event in an email's lifecycle (injection, delivery, bounce, open, click, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailEvent {
    #[serde(deserialize_with = "null_to_default")]
    pub event_id: String,
    #[serde(rename = "type", deserialize_with = "null_to_default")]
    pub event_type: String,
    #[serde(deserialize_with = "null_to_default")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_to_default")]
    pub request_id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub message_id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_to_default")]
    pub friendly_from: String,
    #[serde(deserialize_with = "null_to_default")]
    pub sending_domain: String,
    #[serde(deserialize_with = "null_to_default")]
    pub rcpt_to: String,
    #[serde(deserialize_with = "null_to_default")]
    pub raw_rcpt_to: String,
    #[serde(deserialize_with = "null_to_default")]
    pub recipient_domain: String,
    #[serde(deserialize_with = "null_to_default")]
    pub mailbox_provider: String,
    #[serde(deserialize_with = "null_to_default")]
    pub mailbox_provider_region: String,
    #[serde(deserialize_with = "null_to_default")]
    pub sending_ip: String,
    #[serde(deserialize_with = "null_to_default")]
    pub click_tracking: bool,
    #[serde(deserialize_with = "null_to_default")]
    pub open_tracking: bool,
    #[serde(deserialize_with = "null_to_default")]
    pub transactional: bool,
    #[serde(deserialize_with = "null_to_default")]
    pub msg_size: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub injection_time: String,
    pub reason: Option<String>,
    pub raw_reason: Option<String>,
    pub error_code: Option<String>,
    pub rcpt_meta: Option<HashMap<String, serde_json::Value>>,
}

/// Filters for `GET /emails`.
///
/// Unset, zero, and empty fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEmailsParams {
    /// Results per page (1-100, server default 25).
    pub per_page: Option<u32>,
    /// Cursor from a previous page's [`CursorPagination::next_cursor`].
    pub cursor: Option<String>,
    /// Filter by recipient address.
    pub recipients: Option<String>,
    /// Emails sent on or after this date (ISO 8601, e.g. `2024-01-15`).
    pub from: Option<String>,
    /// Emails sent on or before this date.
    pub to: Option<String>,
}

impl ListEmailsParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(per_page) = self.per_page.filter(|n| *n > 0) {
            query.push(("per_page", per_page.to_string()));
        }
        let strings = [
            ("cursor", &self.cursor),
            ("recipients", &self.recipients),
            ("from", &self.from),
            ("to", &self.to),
        ];
        for (key, value) in strings {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                query.push((key, value.to_string()));
            }
        }
        query
    }
}

/// A page of email events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListEmailsData {
    #[serde(deserialize_with = "null_to_default")]
    pub results: Vec<EmailEvent>,
    #[serde(deserialize_with = "null_to_default")]
    pub total_count: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub pagination: CursorPagination,
}

/// All events recorded for one transmission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetEmailData {
    #[serde(deserialize_with = "null_to_default")]
    pub results: Vec<EmailEvent>,
    #[serde(deserialize_with = "null_to_default")]
    pub total_count: u64,
}

impl<'a> Emails<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Send an email.
    ///
    /// # Examples
    /// ```no_run
    /// # use lettr::{Client, SendEmailRequest};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), lettr::Error> {
    /// let client = Client::new("your-api-key")?;
    /// let sent = client
    ///     .emails()
    ///     .send(
    ///         &SendEmailRequest::new("sender@example.com", ["recipient@example.com"], "Hello")
    ///             .with_html("<h1>Hello!</h1>"),
    ///     )
    ///     .await?;
    /// println!("{}", sent.data.request_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(&self, request: &SendEmailRequest) -> Result<ApiResponse<SendEmailData>> {
        self.client.post("emails", request).await
    }

    /// List sent email events, newest first.
    ///
    /// Pass `None` to use server defaults.
    pub async fn list(
        &self,
        params: Option<&ListEmailsParams>,
    ) -> Result<ApiResponse<ListEmailsData>> {
        let query = params.map(ListEmailsParams::to_query).unwrap_or_default();
        self.client.get("emails", &query).await
    }

    /// All events for the transmission `request_id` returned by [`Emails::send`].
    pub async fn get(&self, request_id: &str) -> Result<ApiResponse<GetEmailData>> {
        let path = format!("emails/{}", escape_segment(request_id));
        self.client.get(&path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_page_only_yields_one_pair() {
        let params = ListEmailsParams {
            per_page: Some(10),
            ..Default::default()
        };
        assert_eq!(params.to_query(), vec![("per_page", "10".to_string())]);
    }

    #[test]
    fn zero_and_empty_values_are_omitted() {
        let params = ListEmailsParams {
            per_page: Some(0),
            cursor: Some(String::new()),
            recipients: None,
            from: Some("2024-01-15".into()),
            to: Some("2024-01-31".into()),
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("from", "2024-01-15".to_string()),
                ("to", "2024-01-31".to_string())
            ]
        );
        assert!(ListEmailsParams::default().to_query().is_empty());
    }

    #[test]
    fn minimal_send_request_omits_optional_fields() {
        let request = SendEmailRequest::new("a@example.com", ["b@example.com"], "Hi");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "from": "a@example.com",
                "to": ["b@example.com"],
                "subject": "Hi",
            })
        );
    }

    #[test]
    fn explicit_false_tracking_is_sent() {
        let request = SendEmailRequest::new("a@example.com", ["b@example.com"], "Hi")
            .with_options(SendEmailOptions {
                open_tracking: Some(false),
                ..Default::default()
            })
            .with_substitution("name", "Ada");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["options"], serde_json::json!({"open_tracking": false}));
        assert_eq!(value["substitution_data"]["name"], "Ada");
    }

    #[test]
    fn attachment_uses_type_key() {
        let attachment = Attachment {
            name: "invoice.pdf".into(),
            content_type: "application/pdf".into(),
            data: "JVBERi0=".into(),
        };
        let value = serde_json::to_value(&attachment).unwrap();
        assert_eq!(value["type"], "application/pdf");
    }

    #[test]
    fn email_event_tolerates_nulls_and_missing_fields() {
        let event: EmailEvent = serde_json::from_value(serde_json::json!({
            "event_id": "evt-1",
            "type": "bounce",
            "reason": "mailbox full",
            "raw_reason": null,
            "rcpt_meta": {"plan": "pro", "seats": 3},
        }))
        .unwrap();
        assert_eq!(event.event_type, "bounce");
        assert_eq!(event.reason.as_deref(), Some("mailbox full"));
        assert!(event.raw_reason.is_none());
        assert_eq!(event.rcpt_meta.unwrap()["seats"], 3);
    }

    #[test]
    fn null_scalars_in_events_decode_to_defaults() {
        let data: GetEmailData = serde_json::from_value(serde_json::json!({
            "results": [{
                "event_id": "evt-2",
                "type": "delivery",
                "subject": null,
                "click_tracking": null,
                "msg_size": null,
            }],
            "total_count": null,
        }))
        .unwrap();
        assert_eq!(data.total_count, 0);
        let event = &data.results[0];
        assert_eq!(event.subject, "");
        assert!(!event.click_tracking);
        assert_eq!(event.msg_size, 0);
    }

    #[test]
    fn send_result_tolerates_null_counts() {
        let data: SendEmailData = serde_json::from_str(
            r#"{"request_id":"7582751837467401763","accepted":null,"rejected":null}"#,
        )
        .unwrap();
        assert_eq!(data.request_id, "7582751837467401763");
        assert_eq!(data.accepted, 0);
        assert_eq!(data.rejected, 0);
    }
}
