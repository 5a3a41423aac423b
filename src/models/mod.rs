use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Web-form surface: one submitted query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchQueryRequest {
    #[validate(length(max = 512, message = "query is too long"))]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQueryResponse {
    pub query: String,
    /// Rendered markdown, or the gateway's diagnostic string.
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

/// Agent-tool surface: the agent passes the queries it distilled from the
/// conversation turn; only the first one is searched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RetrieveRequest {
    #[validate(length(min = 1, message = "at least one query is required"))]
    pub queries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveResponse {
    pub status: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplesResponse {
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub search_ready: bool,
    pub query_log_enabled: bool,
    /// Echoed so a misconfigured deployment can be spotted from /health.
    pub serving_config: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
            timestamp: Utc::now(),
        }
    }
}
