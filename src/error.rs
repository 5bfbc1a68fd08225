//! Error types for the Lettr client.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// Errors returned by [`Client`](crate::Client) and the resource services.
///
/// Construction failures ([`Error::InvalidBaseUrl`], [`Error::InvalidPath`],
/// [`Error::InvalidApiKey`], [`Error::InvalidUserAgent`], [`Error::Configuration`],
/// [`Error::InvalidRequest`], [`Error::Serialize`]) are raised before any
/// network I/O. [`Error::Request`] covers transport failures and is never classified by
/// status code. Only [`Error::Api`] carries an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The base URL override could not be parsed as an absolute URL.
    #[error("lettr: invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A relative request path could not be resolved against the base URL.
    #[error("lettr: invalid path {path:?}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// The API key contains characters that cannot appear in an HTTP header.
    #[error("lettr: api key is not a valid header value")]
    InvalidApiKey,

    /// The configured user agent cannot appear in an HTTP header.
    #[error("lettr: user agent {0:?} is not a valid header value")]
    InvalidUserAgent(String),

    /// The HTTP transport could not be configured, e.g. an unparsable proxy.
    #[error("lettr: failed to configure transport: {0}")]
    Configuration(#[source] reqwest::Error),

    /// The HTTP request could not be assembled.
    #[error("lettr: failed to build request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    /// The outgoing request body could not be encoded as JSON.
    #[error("lettr: failed to marshal request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Network failure or timeout.
    #[error("lettr: request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A successful response carried a body that is not the expected JSON.
    #[error("lettr: failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// The API error, if this failure came from a non-2xx response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of the response, for API errors only.
    pub fn status(&self) -> Option<StatusCode> {
        self.api_error().map(ApiError::status)
    }

    /// Machine-readable error code sent by the API, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.api_error().and_then(ApiError::error_code)
    }

    /// `true` for a 404 API response.
    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found)
    }

    /// `true` for a 422 API response.
    pub fn is_validation_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_validation_error)
    }

    /// `true` for a 401 API response.
    pub fn is_unauthorized(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_unauthorized)
    }
}

/// An error response returned by the Lettr API.
///
/// The message always falls back to the canonical reason phrase of the status
/// when the body is missing, unreadable, or has an empty `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error_code: Option<String>,
    errors: BTreeMap<String, Vec<String>>,
}

/// Wire shape of an error body: `{message, error_code?, errors?}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    /// Classify a non-2xx response from its status and raw body.
    ///
    /// `body` is `None` when the body could not be read at all.
    pub(crate) fn from_response(status: StatusCode, body: Option<&[u8]>) -> Self {
        let parsed = body
            .and_then(|bytes| serde_json::from_slice::<ErrorBody>(bytes).ok())
            .unwrap_or_default();

        let message = parsed
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status_text(status).to_string());

        Self {
            status,
            message,
            error_code: parsed.error_code.filter(|c| !c.is_empty()),
            errors: parsed.errors.unwrap_or_default(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable code such as `validation_error` or `not_found`.
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    /// Field-level validation messages, keyed by field name.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn is_validation_error(&self) -> bool {
        self.status == StatusCode::UNPROCESSABLE_ENTITY
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lettr: {} {}", self.status.as_u16(), self.message)?;
        if let Some(code) = &self.error_code {
            write!(f, " (code: {code})")?;
        }
        for (field, messages) in &self.errors {
            for message in messages {
                write!(f, "; {field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_validation_body() {
        let body = br#"{"message":"Validation failed.","error_code":"validation_error","errors":{"from":["required"]}}"#;
        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, Some(body));

        assert_eq!(err.message(), "Validation failed.");
        assert_eq!(err.error_code(), Some("validation_error"));
        assert_eq!(err.errors()["from"], vec!["required".to_string()]);
        assert!(err.is_validation_error());
        assert!(!err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn falls_back_to_status_text_without_body() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, None);
        assert_eq!(err.message(), "Not Found");
        assert!(err.error_code().is_none());
        assert!(err.errors().is_empty());
    }

    #[test]
    fn falls_back_to_status_text_on_garbage() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, Some(b"<html>oops</html>"));
        assert_eq!(err.message(), "Bad Gateway");
    }

    #[test]
    fn falls_back_to_status_text_on_empty_message() {
        let err = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            Some(br#"{"message":"","error_code":"unauthorized"}"#),
        );
        assert_eq!(err.message(), "Unauthorized");
        assert_eq!(err.error_code(), Some("unauthorized"));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn tolerates_null_fields() {
        let err = ApiError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(br#"{"message":null,"error_code":null,"errors":null}"#),
        );
        assert_eq!(err.message(), "Internal Server Error");
        assert!(err.errors().is_empty());
    }

    #[test]
    fn display_includes_code_and_fields() {
        let body = br#"{"message":"Validation failed.","error_code":"validation_error","errors":{"to":["too many"],"from":["required"]}}"#;
        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, Some(body));
        assert_eq!(
            err.to_string(),
            "lettr: 422 Validation failed. (code: validation_error); from: required; to: too many"
        );
    }

    #[test]
    fn non_api_errors_are_not_classified() {
        let err = Error::Decode(serde_json::from_str::<u8>("nope").unwrap_err());
        assert!(!err.is_not_found());
        assert!(!err.is_validation_error());
        assert!(!err.is_unauthorized());
        assert!(err.status().is_none());
        assert!(err.error_code().is_none());
    }

    #[test]
    fn api_variant_delegates_predicates() {
        let err = Error::from(ApiError::from_response(StatusCode::NOT_FOUND, None));
        assert!(err.is_not_found());
        assert!(!err.is_validation_error());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
