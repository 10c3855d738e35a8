use std::fmt;

use async_trait::async_trait;
use leadgrid_types::api::{ApiErrorBody, ErrorDetail};
use serde_json::Value;

/// Why a gateway call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Field validation failures (`{"detail": [{"msg": ...}]}`)
    Validation(Vec<String>),
    /// Server refused with a plain detail string
    Rejected(String),
    /// No response (network, timeout)
    Transport(String),
    NotFound,
    /// Any other failure, with whatever message was available
    Unknown(Option<String>),
}

impl MutationError {
    /// Normalize a non-2xx response body.
    pub fn from_response(status: u16, body: &Value) -> Self {
        if status == 404 {
            return MutationError::NotFound;
        }
        let parsed = ApiErrorBody::from_value(body);
        match parsed {
            Some(ApiErrorBody {
                detail: Some(ErrorDetail::Items(items)),
                ..
            }) if !items.is_empty() => {
                MutationError::Validation(items.into_iter().map(|i| i.msg).collect())
            }
            Some(ApiErrorBody {
                detail: Some(ErrorDetail::Text(text)),
                ..
            }) if !text.is_empty() => MutationError::Rejected(text),
            Some(ApiErrorBody {
                message: Some(message),
                ..
            }) => MutationError::Unknown(Some(message)),
            _ => MutationError::Unknown(Some(format!("HTTP {}", status))),
        }
    }

    /// User-facing reason: validation messages joined by ", ", the plain
    /// detail, the transport/error message, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            MutationError::Validation(messages) if !messages.is_empty() => messages.join(", "),
            MutationError::Rejected(detail) => detail.clone(),
            MutationError::Transport(message) => message.clone(),
            MutationError::NotFound => "Not found".to_string(),
            MutationError::Unknown(Some(message)) => message.clone(),
            MutationError::Validation(_) | MutationError::Unknown(None) => fallback.to_string(),
        }
    }
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationError::Validation(messages) => {
                write!(f, "Validation failed: {}", messages.join(", "))
            }
            MutationError::Rejected(detail) => write!(f, "Rejected: {}", detail),
            MutationError::Transport(message) => write!(f, "Transport error: {}", message),
            MutationError::NotFound => write!(f, "Not found"),
            MutationError::Unknown(Some(message)) => write!(f, "Unknown error: {}", message),
            MutationError::Unknown(None) => write!(f, "Unknown error"),
        }
    }
}

impl std::error::Error for MutationError {}

pub type MutationResult<T> = std::result::Result<T, MutationError>;

/// Server-side create/update/delete for one entity kind.
///
/// Implementations never touch the cached snapshot; callers reconcile it
/// from the returned row.
#[async_trait]
pub trait RowGateway: Send + Sync {
    type Row: Send;
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    async fn create(&self, draft: Self::Draft) -> MutationResult<Self::Row>;

    async fn update(&self, id: &str, patch: Self::Patch) -> MutationResult<Self::Row>;

    async fn delete(&self, id: &str) -> MutationResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_detail() {
        let err = MutationError::from_response(
            422,
            &json!({ "detail": [{ "msg": "invalid transition" }, { "msg": "stage locked" }] }),
        );
        assert_eq!(
            err.user_message("Failed to update stage"),
            "invalid transition, stage locked"
        );
    }

    #[test]
    fn test_plain_detail_and_not_found() {
        let err = MutationError::from_response(400, &json!({ "detail": "Lead is archived" }));
        assert_eq!(err, MutationError::Rejected("Lead is archived".into()));
        assert_eq!(
            MutationError::from_response(404, &json!({})),
            MutationError::NotFound
        );
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(
            MutationError::Unknown(None).user_message("Failed to update stage"),
            "Failed to update stage"
        );
        assert_eq!(
            MutationError::from_response(500, &json!("boom")),
            MutationError::Unknown(Some("HTTP 500".into()))
        );
    }
}
