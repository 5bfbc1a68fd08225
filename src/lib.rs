//! # Lettr Client
//! Asynchronous client for the Lettr transactional email HTTP API: send email, look up delivery events, and manage sending domains, webhooks, and templates from Rust using [`Client`] and [`ClientBuilder`].
//!
//! ## Layout
//! [`Client`] owns the configuration (API key, base URL, transport). Resource operations live on lightweight service handles borrowed from it: [`Client::emails`], [`Client::domains`], [`Client::webhooks`], and [`Client::templates`]. Every successful call returns the API's `{message, data}` envelope as an [`ApiResponse`].
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Dropping a returned future aborts the in-flight request; wrap a call in `tokio::time::timeout` for a per-call deadline.
//!
//! ## Out of scope
//! No retries, rate-limit handling, streaming, or webhook signature verification. Every failure is returned to the caller as-is.
//!
//! ## Errors
//! Non-2xx responses become [`Error::Api`] carrying an [`ApiError`] with the status, message, optional machine-readable code, and field-level validation messages. Use [`Error::is_not_found`], [`Error::is_validation_error`], and [`Error::is_unauthorized`] to classify them; these look only at the HTTP status. Transport failures are [`Error::Request`] and unreadable success payloads are [`Error::Decode`]; neither is ever classified by status. Diagnostics are emitted through `tracing`.
//!
//! ## Example
//! ```no_run
//! use lettr::{Client, SendEmailRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lettr::Error> {
//!     let client = Client::new("your-api-key")?;
//!
//!     let request = SendEmailRequest::new("sender@example.com", ["recipient@example.com"], "Hello from Lettr")
//!         .with_html("<h1>Hello!</h1>");
//!     let sent = client.emails().send(&request).await?;
//!     println!("Queued: {}", sent.data.request_id);
//!
//!     match client.emails().send(&SendEmailRequest::default()).await {
//!         Err(err) if err.is_validation_error() => {
//!             if let Some(api) = err.api_error() {
//!                 for (field, messages) in api.errors() {
//!                     println!("{field}: {}", messages.join(", "));
//!                 }
//!             }
//!         }
//!         other => println!("{other:?}"),
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod domains;
mod emails;
mod error;
mod models;
mod templates;
mod webhooks;

pub use client::{Client, ClientBuilder};
pub use domains::{
    CreateDomainData, CreateDomainRequest, Domain, DomainDetail, DomainDkim, DomainDns, Domains,
    ListDomainsData,
};
pub use emails::{
    Attachment, EmailEvent, Emails, GetEmailData, ListEmailsData, ListEmailsParams,
    SendEmailData, SendEmailOptions, SendEmailRequest,
};
pub use error::{ApiError, Error};
pub use models::{ApiResponse, AuthCheckData, CursorPagination, HealthCheckData, PagePagination};
pub use templates::{
    CreateTemplateData, CreateTemplateRequest, ListTemplatesData, ListTemplatesParams, MergeTag,
    Template, Templates,
};
pub use webhooks::{ListWebhooksData, Webhook, Webhooks};

/// Version of this crate, sent in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for Lettr operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
