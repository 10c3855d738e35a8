//! Payloads of the WhatsApp messaging API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /account/status` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub status: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub quality_rating: Option<String>,
}

impl AccountStatus {
    pub fn is_connected(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "connected" | "active"
        )
    }
}

/// `POST /validate-contact` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactValidation {
    pub valid: bool,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppTemplate {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `POST /send-template` and `POST /send-text` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMessage {
    pub template_name: String,
    pub contact: String,
    pub lead_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub contact: String,
    pub message: String,
}

/// Templates from a bare array or a `data` / `templates` wrapper; any
/// other shape yields no templates.
pub fn parse_template_list(body: Value) -> crate::Result<Vec<WhatsAppTemplate>> {
    let list = match body {
        Value::Array(_) => body,
        Value::Object(mut map) => {
            let list = map
                .remove("data")
                .filter(Value::is_array)
                .or_else(|| map.remove("templates").filter(Value::is_array));
            match list {
                Some(list) => list,
                None => return Ok(Vec::new()),
            }
        }
        _ => return Ok(Vec::new()),
    };
    Ok(serde_json::from_value(list)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_list_shapes() -> anyhow::Result<()> {
        let bare = parse_template_list(json!([{ "name": "welcome" }]))?;
        assert_eq!(bare[0].name, "welcome");

        let data = parse_template_list(json!({ "data": [{ "name": "a" }, { "name": "b" }] }))?;
        assert_eq!(data.len(), 2);

        let wrapped = parse_template_list(json!({ "templates": [{ "name": "follow_up" }] }))?;
        assert_eq!(wrapped[0].name, "follow_up");

        assert!(parse_template_list(json!({ "items": [{ "name": "x" }] }))?.is_empty());
        assert!(parse_template_list(json!("nope"))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_account_status_connected() {
        let status = AccountStatus {
            status: "CONNECTED".into(),
            phone_number: None,
            quality_rating: None,
        };
        assert!(status.is_connected());
    }
}
