//! WhatsApp messaging: the REST endpoints and the composer behind the
//! lead row's WhatsApp modal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leadgrid_types::{
    AccountStatus, ContactValidation, MessageReceipt, TemplateMessage, TextMessage,
    WhatsAppTemplate, parse_template_list,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiRequest};
use crate::cells::InFlightGuard;
use crate::gateway::{MutationError, MutationResult};
use crate::notify::{Notification, NotificationRelay};
use crate::rest::{decode, send, to_body};
use crate::store::WhatsAppTarget;

pub struct WhatsAppGateway<C> {
    client: Arc<C>,
}

impl<C> Clone for WhatsAppGateway<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: ApiClient> WhatsAppGateway<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn account_status(&self) -> MutationResult<AccountStatus> {
        let body = send(self.client.as_ref(), ApiRequest::get("/account/status")).await?;
        decode(body)
    }

    pub async fn validate_contact(&self, contact: &str) -> MutationResult<ContactValidation> {
        let request = ApiRequest::post("/validate-contact", json!({ "contact": contact }));
        let body = send(self.client.as_ref(), request).await?;
        decode(body)
    }

    pub async fn templates(&self) -> MutationResult<Vec<WhatsAppTemplate>> {
        let body = send(self.client.as_ref(), ApiRequest::get("/templates")).await?;
        parse_template_list(body).map_err(|e| MutationError::Unknown(Some(e.to_string())))
    }

    pub async fn send_template(&self, message: &TemplateMessage) -> MutationResult<MessageReceipt> {
        let request = ApiRequest::post("/send-template", to_body(message)?);
        let body = send(self.client.as_ref(), request).await?;
        decode(body)
    }

    pub async fn send_text(&self, message: &TextMessage) -> MutationResult<MessageReceipt> {
        let request = ApiRequest::post("/send-text", to_body(message)?);
        let body = send(self.client.as_ref(), request).await?;
        decode(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Template(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent(MessageReceipt),
    /// Nothing to send, or the contact was rejected
    Invalid,
    /// A send from this composer is still in flight
    Busy,
    Failed(MutationError),
}

/// The WhatsApp modal for one target. Every send ends in exactly one
/// notification unless it is refused as busy.
#[derive(Debug, Default)]
pub struct WhatsAppComposer {
    sending: AtomicBool,
}

impl WhatsAppComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    /// Validate the contact, then send a template or a free-text message.
    pub async fn send<C, R>(
        &self,
        target: &WhatsAppTarget,
        content: MessageContent,
        gateway: &WhatsAppGateway<C>,
        relay: &R,
    ) -> SendOutcome
    where
        C: ApiClient,
        R: NotificationRelay + ?Sized,
    {
        let Some(_guard) = InFlightGuard::acquire(&self.sending) else {
            debug!(lead_id = %target.lead_id, "whatsapp send already in flight");
            return SendOutcome::Busy;
        };

        let missing = match &content {
            MessageContent::Template(name) if name.trim().is_empty() => {
                Some("Please select a template")
            }
            MessageContent::Text(text) if text.trim().is_empty() => Some("Please enter a message"),
            _ => None,
        };
        if let Some(message) = missing {
            relay.notify(Notification::error(message).titled("Missing Content"));
            return SendOutcome::Invalid;
        }

        match gateway.validate_contact(&target.phone_number).await {
            Ok(validation) if !validation.valid => {
                let reason = validation
                    .message
                    .unwrap_or_else(|| format!("{} is not a WhatsApp number", target.phone_number));
                relay.notify(Notification::error(reason).titled("Invalid Contact"));
                return SendOutcome::Invalid;
            }
            Ok(_) => {}
            Err(err) => return fail(target, err, relay),
        }

        let result = match content {
            MessageContent::Template(template_name) => {
                gateway
                    .send_template(&TemplateMessage {
                        template_name: template_name.trim().to_string(),
                        contact: target.phone_number.clone(),
                        lead_name: target.lead_name.clone(),
                    })
                    .await
            }
            MessageContent::Text(message) => {
                gateway
                    .send_text(&TextMessage {
                        contact: target.phone_number.clone(),
                        message,
                    })
                    .await
            }
        };

        match result {
            Ok(receipt) if receipt.success => {
                relay.notify(
                    Notification::success(format!("WhatsApp message sent to {}", target.lead_name))
                        .titled("Message Sent"),
                );
                SendOutcome::Sent(receipt)
            }
            Ok(receipt) => fail(target, MutationError::Rejected(rejection(&receipt)), relay),
            Err(err) => fail(target, err, relay),
        }
    }
}

fn rejection(receipt: &MessageReceipt) -> String {
    receipt
        .message
        .clone()
        .unwrap_or_else(|| "message was not accepted".to_string())
}

fn fail<R: NotificationRelay + ?Sized>(
    target: &WhatsAppTarget,
    err: MutationError,
    relay: &R,
) -> SendOutcome {
    warn!(lead_id = %target.lead_id, error = %err, "whatsapp send failed");
    relay.notify(
        Notification::error(format!(
            "Failed to send WhatsApp message: {}",
            err.user_message("Unknown error")
        ))
        .titled("Send Failed"),
    );
    SendOutcome::Failed(err)
}
