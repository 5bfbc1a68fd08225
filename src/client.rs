//! Lettr async client implementation.

use std::fmt;
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::domains::Domains;
use crate::emails::Emails;
use crate::error::ApiError;
use crate::models::{ApiResponse, AuthCheckData, HealthCheckData};
use crate::templates::Templates;
use crate::webhooks::Webhooks;
use crate::{Error, Result};

/// Async client for the Lettr email API.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like timeouts, proxies, or a custom base URL. The client is cheap to share
/// by reference; every call builds its own request.
///
/// Resource operations live on borrowed service handles returned by
/// [`Client::emails`], [`Client::domains`], [`Client::webhooks`] and
/// [`Client::templates`].
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: Url,
    user_agent: HeaderValue,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a new Lettr client with the default transport (30 second timeout)
    /// and the default base URL.
    ///
    /// # Examples
    /// ```no_run
    /// # use lettr::Client;
    /// # fn main() -> Result<(), lettr::Error> {
    /// let client = Client::new("your-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Create a client on top of a caller-supplied `reqwest::Client`.
    ///
    /// Useful for custom timeouts, TLS settings, or sharing a connection pool.
    pub fn with_http_client(api_key: impl Into<String>, http: reqwest::Client) -> Result<Self> {
        ClientBuilder::new(api_key).http_client(http).build()
    }

    /// The base URL every request path is resolved against.
    ///
    /// Always ends with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Override the base URL, e.g. to point at a mock server.
    ///
    /// The URL must be absolute. A missing trailing `/` is appended so that
    /// request paths join as children of the base path.
    ///
    /// # Examples
    /// ```
    /// # use lettr::Client;
    /// # fn main() -> Result<(), lettr::Error> {
    /// let mut client = Client::new("key")?;
    /// client.set_base_url("https://custom.example.com/api")?;
    /// assert_eq!(client.base_url().as_str(), "https://custom.example.com/api/");
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_base_url(&mut self, raw: &str) -> Result<()> {
        self.base_url = normalize_base_url(raw)?;
        Ok(())
    }

    /// Email sending and event lookup.
    pub fn emails(&self) -> Emails<'_> {
        Emails::new(self)
    }

    /// Sending domain management.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self)
    }

    /// Webhook configuration.
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    /// Email templates.
    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }

    /// Verify that the Lettr API is reachable.
    ///
    /// This is the only call sent without an `Authorization` header.
    ///
    /// # Examples
    /// ```no_run
    /// # use lettr::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), lettr::Error> {
    /// let client = Client::new("your-api-key")?;
    /// let health = client.health_check().await?;
    /// println!("{}", health.data.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn health_check(&self) -> Result<ApiResponse<HealthCheckData>> {
        let request = self.health_request()?;
        self.execute_json(request).await
    }

    fn health_request(&self) -> Result<Request> {
        let mut request = self.build_request(Method::GET, "health", &[], None::<&()>)?;
        request.headers_mut().remove(AUTHORIZATION);
        Ok(request)
    }

    /// Check that the configured API key is valid and return its team.
    ///
    /// An invalid key surfaces as an error for which
    /// [`Error::is_unauthorized`] returns `true`.
    pub async fn validate_api_key(&self) -> Result<ApiResponse<AuthCheckData>> {
        self.get("auth/check", &[]).await
    }

    pub(crate) async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.build_request(Method::GET, path, query, None::<&()>)?;
        self.execute_json(request).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let request = self.build_request(Method::POST, path, &[], Some(body))?;
        self.execute_json(request).await
    }

    /// Send a DELETE and expect an empty (usually 204) response.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let request = self.build_request(Method::DELETE, path, &[], None::<&()>)?;
        self.execute(request).await.map(drop)
    }

    /// Build an authenticated request for `path`, resolved against the base URL.
    ///
    /// Query pairs are appended only when non-empty. A body, when given, is
    /// encoded as JSON and marks the request `Content-Type: application/json`.
    pub(crate) fn build_request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        let mut url = self.base_url.join(path).map_err(|source| Error::InvalidPath {
            path: path.to_string(),
            source,
        })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }

        let mut headers = self.headers()?;
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(Error::Serialize)?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
            builder = builder.body(encoded);
        }

        builder
            .headers(headers)
            .build()
            .map_err(Error::InvalidRequest)
    }

    /// Send a request and turn any non-2xx status into [`Error::Api`].
    async fn execute(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            // An unreadable body still yields a classified error.
            let body = response.bytes().await.ok();
            let err = ApiError::from_response(status, body.as_deref());
            warn!(
                status = status.as_u16(),
                error_code = err.error_code().unwrap_or_default(),
                "lettr api returned an error"
            );
            return Err(err.into());
        }

        debug!(status = status.as_u16(), "request succeeded");
        Ok(response)
    }

    /// Send a request and decode its JSON body.
    ///
    /// `204 No Content` carries no body and yields `T::default()`.
    async fn execute_json<T>(&self, request: Request) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.execute(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(T::default());
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }

    /// Headers sent with every request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(USER_AGENT, self.user_agent.clone());
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| Error::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }
}

/// Escape a user-supplied identifier for use as a single path segment.
pub(crate) fn escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Parse an absolute base URL and make sure its path ends with `/`.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let invalid = |source: url::ParseError| Error::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    };

    let mut url = Url::parse(raw).map_err(invalid)?;
    if url.cannot_be_a_base() {
        return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

const DEFAULT_BASE_URL: &str = "https://app.lettr.com/api/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const JSON: &str = "application/json";

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn default_user_agent() -> String {
    format!("lettr-rust/{}", crate::VERSION)
}

/// Builder for configuring a Lettr client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    base_url: Option<String>,
    timeout: Duration,
    proxy: Option<String>,
    user_agent: String,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Base URL `https://app.lettr.com/api/`
    /// - 30 second request timeout
    /// - No proxy
    /// - User agent `lettr-rust/<version>`
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            user_agent: default_user_agent(),
            http: None,
        }
    }

    /// Override the API base URL.
    ///
    /// Validated and normalized in [`ClientBuilder::build`].
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout of the default transport.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:1080").
    ///
    /// This uses reqwest's proxy support for all requests.
    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Override the default user agent string.
    ///
    /// Checked in [`ClientBuilder::build`]; control characters are rejected.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use a caller-supplied `reqwest::Client`.
    ///
    /// Takes precedence over [`timeout`](Self::timeout) and [`proxy`](Self::proxy).
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the client.
    ///
    /// No network I/O happens here.
    ///
    /// # Examples
    /// ```no_run
    /// # use lettr::Client;
    /// # use std::time::Duration;
    /// # fn main() -> Result<(), lettr::Error> {
    /// let client = Client::builder("your-api-key")
    ///     .timeout(Duration::from_secs(10))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder().timeout(self.timeout);
                if let Some(proxy_url) = &self.proxy {
                    let proxy = reqwest::Proxy::all(proxy_url).map_err(Error::Configuration)?;
                    builder = builder.proxy(proxy);
                }
                builder.build().map_err(Error::Configuration)?
            }
        };

        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| Error::InvalidUserAgent(self.user_agent.clone()))?;

        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        Ok(Client {
            http,
            api_key: self.api_key,
            base_url,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new("test-api-key").unwrap()
    }

    fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
        request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn new_uses_default_base_url() {
        let client = client();
        assert_eq!(client.base_url().as_str(), "https://app.lettr.com/api/");
        assert_eq!(client.api_key, "test-api-key");
    }

    #[test]
    fn with_http_client_keeps_defaults() {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let client = Client::with_http_client("test-api-key", http).unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.user_agent.to_str().unwrap(), default_user_agent());
    }

    #[test]
    fn api_key_is_trimmed() {
        let client = Client::new("  padded-key \n").unwrap();
        assert_eq!(client.api_key, "padded-key");
    }

    #[test]
    fn services_are_bound_to_client() {
        let client = client();
        assert!(std::ptr::eq(client.emails().client, &client));
        assert!(std::ptr::eq(client.domains().client, &client));
        assert!(std::ptr::eq(client.webhooks().client, &client));
        assert!(std::ptr::eq(client.templates().client, &client));
    }

    #[test]
    fn set_base_url_appends_single_slash() {
        let mut client = client();
        client.set_base_url("https://custom.example.com/api").unwrap();
        assert_eq!(client.base_url().as_str(), "https://custom.example.com/api/");

        let first = client.base_url().to_string();
        client.set_base_url(&first).unwrap();
        assert_eq!(client.base_url().as_str(), first);
    }

    #[test]
    fn set_base_url_rejects_relative_url() {
        let mut client = client();
        let err = client.set_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
        assert_eq!(client.base_url().as_str(), "https://app.lettr.com/api/");
    }

    #[test]
    fn set_base_url_rejects_cannot_be_a_base() {
        let mut client = client();
        let err = client.set_base_url("mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }

    #[test]
    fn builder_base_url_is_normalized() {
        let client = Client::builder("key")
            .base_url("http://localhost:8080/v2")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/v2/");
    }

    #[test]
    fn paths_join_under_base_path() {
        let mut client = client();
        client.set_base_url("https://custom.example.com/api").unwrap();
        let request = client
            .build_request(Method::GET, "domains/example.com", &[], None::<&()>)
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://custom.example.com/api/domains/example.com"
        );
    }

    #[test]
    fn request_carries_standard_headers() {
        let client = client();
        let request = client
            .build_request(Method::GET, "auth/check", &[], None::<&()>)
            .unwrap();

        assert_eq!(header(&request, "accept"), Some("application/json"));
        assert_eq!(header(&request, "authorization"), Some("Bearer test-api-key"));
        assert_eq!(
            header(&request, "user-agent"),
            Some(format!("lettr-rust/{}", crate::VERSION).as_str())
        );
        assert!(header(&request, "content-type").is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn health_request_has_no_authorization() {
        let client = client();
        let request = client.health_request().unwrap();
        assert_eq!(request.url().as_str(), "https://app.lettr.com/api/health");
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(header(&request, "accept"), Some("application/json"));
        assert!(header(&request, "user-agent").is_some());
    }

    #[test]
    fn request_with_body_is_json() {
        let client = client();
        let body = serde_json::json!({"domain": "example.com"});
        let request = client
            .build_request(Method::POST, "domains", &[], Some(&body))
            .unwrap();

        assert_eq!(header(&request, "content-type"), Some("application/json"));
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(bytes, br#"{"domain":"example.com"}"#);
    }

    #[test]
    fn query_is_appended_only_when_present() {
        let client = client();
        let request = client
            .build_request(Method::GET, "emails", &[("per_page", "10".to_string())], None::<&()>)
            .unwrap();
        assert_eq!(request.url().query(), Some("per_page=10"));

        let request = client
            .build_request(Method::GET, "emails", &[], None::<&()>)
            .unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn invalid_api_key_is_a_construction_error() {
        let client = Client::new("bad\u{7f}key").unwrap();
        let err = client
            .build_request(Method::GET, "auth/check", &[], None::<&()>)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidApiKey));
    }

    #[test]
    fn invalid_user_agent_is_rejected_at_build() {
        let err = Client::builder("key")
            .user_agent("bad\u{7f}agent")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUserAgent(ref ua) if ua == "bad\u{7f}agent"));
    }

    #[test]
    fn custom_user_agent_is_sent() {
        let client = Client::builder("key").user_agent("my-app/2.0").build().unwrap();
        let request = client
            .build_request(Method::GET, "auth/check", &[], None::<&()>)
            .unwrap();
        assert_eq!(header(&request, "user-agent"), Some("my-app/2.0"));
    }

    #[test]
    fn unparsable_proxy_is_a_configuration_error() {
        let err = Client::builder("key")
            .proxy("http://[::1")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.api_error().is_none());
    }

    #[test]
    fn unserializable_body_is_a_construction_error() {
        use std::collections::HashMap;

        let client = client();
        let mut body = HashMap::new();
        body.insert(vec![1u8], "map keys must be strings");
        let err = client
            .build_request(Method::POST, "emails", &[], Some(&body))
            .unwrap_err();
        assert!(matches!(err, Error::Serialize(_)));
    }

    #[test]
    fn escape_segment_encodes_reserved_characters() {
        assert_eq!(escape_segment("example.com"), "example.com");
        assert_eq!(escape_segment("a/b c?d"), "a%2Fb%20c%3Fd");
        assert_eq!(escape_segment("wh_1-x~"), "wh_1-x~");
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("test-api-key"));
    }
}
