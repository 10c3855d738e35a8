use std::sync::atomic::{AtomicBool, Ordering};

use leadgrid_types::Lead;
use tracing::warn;

use super::InFlightGuard;
use crate::gateway::{MutationError, RowGateway};
use crate::interaction::{Clipboard, Confirmer};
use crate::navigation::{Navigator, Route};
use crate::notify::{Notification, NotificationRelay};
use crate::store::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent
    Cancelled,
    Busy,
    Deleted,
    Failed(MutationError),
}

/// Row actions menu: copy, view, edit, delete.
#[derive(Debug, Default)]
pub struct ActionMenu {
    deleting: AtomicBool,
}

impl ActionMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::Acquire)
    }

    pub async fn copy_id<C, R>(&self, lead: &Lead, clipboard: &C, relay: &R)
    where
        C: Clipboard + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        copy(&lead.id, clipboard, relay).await;
    }

    /// Copy the lead's email; leads without one get an error instead.
    pub async fn copy_email<C, R>(&self, lead: &Lead, clipboard: &C, relay: &R)
    where
        C: Clipboard + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        match lead.email.as_deref().filter(|e| !e.trim().is_empty()) {
            Some(email) => copy(email, clipboard, relay).await,
            None => relay.notify(
                Notification::error("No email address available for this lead")
                    .titled("No Email"),
            ),
        }
    }

    pub fn view_details<N: Navigator + ?Sized>(&self, lead: &Lead, navigator: &N) {
        navigator.push(&Route::LeadDetail(lead.id.clone()).path());
    }

    /// Action opening the edit modal for this lead.
    pub fn edit(&self, lead: &Lead) -> Action {
        Action::OpenEditModal(lead.id.clone())
    }

    /// Delete after confirmation. Cancelling has no side effects.
    pub async fn delete<K, G, R>(
        &self,
        lead: &Lead,
        confirmer: &K,
        gateway: &G,
        relay: &R,
    ) -> DeleteOutcome
    where
        K: Confirmer + ?Sized,
        G: RowGateway<Row = Lead> + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        if self.is_deleting() {
            return DeleteOutcome::Busy;
        }
        let confirmed = confirmer
            .confirm(
                "Delete Lead",
                &format!(
                    "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                    lead.name
                ),
            )
            .await;
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }

        let Some(_guard) = InFlightGuard::acquire(&self.deleting) else {
            return DeleteOutcome::Busy;
        };
        match gateway.delete(&lead.id).await {
            Ok(()) => {
                relay.notify(Notification::success(format!(
                    "Lead \"{}\" has been deleted successfully.",
                    lead.name
                )));
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(lead_id = %lead.id, error = %err, "lead delete failed");
                relay.notify(Notification::error(format!(
                    "Failed to delete lead: {}",
                    err.user_message("Failed to delete lead")
                )));
                DeleteOutcome::Failed(err)
            }
        }
    }
}

async fn copy<C, R>(text: &str, clipboard: &C, relay: &R)
where
    C: Clipboard + ?Sized,
    R: NotificationRelay + ?Sized,
{
    match clipboard.write_text(text).await {
        Ok(()) => relay.notify(Notification::success("Copied to clipboard!")),
        Err(err) => relay.notify(Notification::error(err).titled("Failed to copy to clipboard")),
    }
}
