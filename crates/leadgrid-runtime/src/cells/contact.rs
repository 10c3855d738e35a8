use leadgrid_types::{Lead, UserProfile};

use crate::notify::{Notification, NotificationRelay};
use crate::store::{Action, WhatsAppTarget};

/// Email and WhatsApp buttons of a lead row.
///
/// Both return the store action that opens the composer, or notify and
/// return `None` when a precondition fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContactActions;

impl ContactActions {
    pub fn email<R: NotificationRelay + ?Sized>(&self, lead: &Lead, relay: &R) -> Option<Action> {
        if lead.id.trim().is_empty() {
            relay.notify(Notification::error("No lead ID available").titled("Error"));
            return None;
        }
        Some(Action::OpenEmailDialog(lead.id.clone()))
    }

    pub fn whatsapp<R: NotificationRelay + ?Sized>(
        &self,
        lead: &Lead,
        user: Option<&UserProfile>,
        relay: &R,
    ) -> Option<Action> {
        let Some(phone) = lead.reachable_phone() else {
            relay.notify(
                Notification::error("No phone number available for this lead")
                    .titled("No Phone Number"),
            );
            return None;
        };
        let Some(user) = user else {
            relay.notify(Notification::error("User data not available").titled("Error"));
            return None;
        };
        Some(Action::OpenWhatsApp(WhatsAppTarget::new(lead, phone, user)))
    }
}
