use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::NotificationError;

pub const UTC_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn response_time_now() -> String {
    Utc::now().format(UTC_DATETIME_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    pub message: String,
}

impl From<&NotificationError> for ErrorInfo {
    fn from(err: &NotificationError) -> Self {
        Self {
            error_code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outbound envelope for the interactive call. Callers always get a
/// response time, and either a populated `response` or a populated
/// `errors` list, never both.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub responsetime: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorInfo>,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(id: Option<String>, version: Option<String>, response: T) -> Self {
        Self {
            id,
            version,
            responsetime: response_time_now(),
            response: Some(response),
            errors: Vec::new(),
        }
    }

    pub fn failure(id: Option<String>, version: Option<String>, err: &NotificationError) -> Self {
        Self {
            id,
            version,
            responsetime: response_time_now(),
            response: None,
            errors: vec![ErrorInfo::from(err)],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub message: String,
}

/// Status field both notification gateways answer with.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayStatus {
    pub status: String,
}

/// Generic shape of every upstream reply this service consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ServiceEnvelope<T> {
    #[serde(default)]
    pub response: Option<T>,

    #[serde(default)]
    pub errors: Option<Vec<ErrorInfo>>,
}
