//! Versioned host command/response envelopes.

use serde::{Deserialize, Serialize};

/// Contract version for host command/response envelopes.
pub const CONTRACT_VERSION: u32 = 1;

/// Commands understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandName {
    #[serde(rename = "host.ping")]
    HostPing,
    #[serde(rename = "host.stop")]
    HostStop,
    #[serde(rename = "search.by_name")]
    SearchByName,
    #[serde(rename = "search.by_interest")]
    SearchByInterest,
    #[serde(rename = "search.rerun_last")]
    SearchRerunLast,
    #[serde(rename = "history.list")]
    HistoryList,
    #[serde(rename = "history.last")]
    HistoryLast,
    #[serde(rename = "history.clear")]
    HistoryClear,
    #[serde(rename = "sources.health")]
    SourcesHealth,
}

/// A versioned command envelope from a frontend to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub v: u32,
    pub request_id: String,
    pub command: CommandName,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CommandEnvelope {
    /// Build a v1 command envelope.
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        command: CommandName,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            command,
            payload,
        }
    }

    /// Validate envelope version and request id.
    pub fn validate(&self) -> crate::Result<()> {
        if self.v != CONTRACT_VERSION {
            return Err(crate::ProfileError::Protocol(format!(
                "unsupported contract version {}; expected {}",
                self.v, CONTRACT_VERSION
            )));
        }
        if self.request_id.trim().is_empty() {
            return Err(crate::ProfileError::Protocol(
                "request_id cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A versioned response envelope from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub v: u32,
    pub request_id: String,
    pub ok: bool,
    pub payload: serde_json::Value,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Build a successful response envelope.
    #[must_use]
    pub fn ok(request_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            ok: true,
            payload,
            error: None,
        }
    }

    /// Build an error response envelope.
    #[must_use]
    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            ok: false,
            payload: serde_json::Value::Null,
            error: Some(message.into()),
        }
    }
}

/// Payload of `search.by_name` and `search.by_interest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub user_id: String,
    pub term: String,
    #[serde(default)]
    pub include_extended_bio: bool,
}

/// Payload of the history commands and `search.rerun_last`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub user_id: String,
    #[serde(default)]
    pub include_extended_bio: bool,
}
