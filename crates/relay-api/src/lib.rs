use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream default for `max_connections` when the field is omitted.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 40;

/// Accepted values for `max_connections`.
pub const MAX_CONNECTIONS_RANGE: RangeInclusive<u32> = 1..=100;

/// Uniform wrapper around every bot API response.
///
/// `result` only carries meaning when `ok` is true, use [`Envelope::into_result`]
/// instead of reading it directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

/// An envelope with `ok: false`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub description: String,
    pub error_code: Option<i64>,
    pub parameters: Option<Map<String, Value>>,
}

impl Envelope {
    /// Returns the result payload, or `null` when a successful call carried none.
    pub fn into_result(self) -> Result<Value, Rejection> {
        if self.ok {
            Ok(self.result.unwrap_or(Value::Null))
        } else {
            Err(Rejection {
                description: self.description.unwrap_or_default(),
                error_code: self.error_code,
                parameters: self.parameters,
            })
        }
    }
}

/// Result of `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub can_join_groups: bool,
    #[serde(default)]
    pub can_read_all_group_messages: bool,
    #[serde(default)]
    pub supports_inline_queries: bool,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("max_connections must be between 1 and 100, got {0}")]
pub struct InvalidMaxConnections(pub u32);

/// Body of `setWebhook`. Unset options are left out of the JSON so the
/// upstream applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRegistration {
    /// HTTPS url to send updates to. An empty string removes the webhook.
    pub url: String,
    /// Public key certificate, so the upstream can check a self-signed root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    /// Fixed IP used instead of resolving `url` through DNS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    /// Update types to receive. Empty means whatever was configured before.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_updates: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub drop_pending_updates: bool,
}

impl WebhookRegistration {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn certificate(mut self, certificate: impl Into<String>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    pub fn ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Result<Self, InvalidMaxConnections> {
        if !MAX_CONNECTIONS_RANGE.contains(&max) {
            return Err(InvalidMaxConnections(max));
        }
        self.max_connections = Some(max);
        Ok(self)
    }

    pub fn allowed_updates<I, S>(mut self, updates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_updates = updates.into_iter().map(Into::into).collect();
        self
    }

    pub fn drop_pending_updates(mut self, drop: bool) -> Self {
        self.drop_pending_updates = drop;
        self
    }

    /// Connection limit the upstream will actually use.
    pub fn effective_max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

/// Checks the media type of a `Content-Type` value, ignoring parameters such
/// as `charset`.
pub fn is_json_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .map(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
