use serde::{Deserialize, Serialize};

/// Error body returned by the backend: `{ "detail": string | [{ "msg": string }] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Items(Vec<ValidationItem>),
}

/// One entry of a structured validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationItem {
    pub msg: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loc: Vec<serde_json::Value>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ApiErrorBody {
    /// Decode an error body, tolerating non-JSON or unrelated payloads.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}
