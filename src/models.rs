//! Wire types shared across resources.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode a field that the server may send as `null`, falling back to the
/// type's default.
///
/// Paired with `#[serde(default)]` so that omitted and `null` fields behave
/// the same.
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The `{message, data}` envelope every successful response is wrapped in.
///
/// A `204 No Content` answer decodes to the default envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ApiResponse<T> {
    /// Human-readable status message.
    #[serde(deserialize_with = "null_to_default")]
    pub message: String,
    /// Resource-specific payload.
    #[serde(deserialize_with = "null_to_default")]
    pub data: T,
}

/// Cursor-based pagination used by time-ordered listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorPagination {
    /// Cursor for the next page, `None` on the last page.
    pub next_cursor: Option<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub per_page: u32,
}

/// Page-number pagination used by catalog listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePagination {
    #[serde(deserialize_with = "null_to_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub per_page: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub current_page: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub last_page: u32,
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckData {
    #[serde(deserialize_with = "null_to_default")]
    pub status: String,
    #[serde(deserialize_with = "null_to_default")]
    pub timestamp: String,
}

/// Payload of `GET /auth/check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthCheckData {
    /// Team the API key belongs to.
    #[serde(deserialize_with = "null_to_default")]
    pub team_id: u64,
    #[serde(deserialize_with = "null_to_default")]
    pub timestamp: String,
}
