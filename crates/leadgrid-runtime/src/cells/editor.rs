use std::sync::atomic::{AtomicBool, Ordering};

use leadgrid_types::{Classification, ClassificationOption, Lead, LeadPatch, display_name_for};
use serde::Serialize;
use tracing::{debug, warn};

use super::InFlightGuard;
use crate::gateway::{MutationError, RowGateway};
use crate::notify::{Notification, NotificationRelay};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub color: Option<String>,
    pub selected: bool,
}

/// What a stage/status cell shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditorView {
    /// Reference options have not resolved yet
    Loading,
    Select {
        value: String,
        label: String,
        options: Vec<OptionView>,
        /// A mutation from this cell is in flight
        disabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Selected value equals the current one; nothing sent
    Unchanged,
    /// A previous change from this cell is still in flight
    Busy,
    Updated(Lead),
    Failed(MutationError),
}

/// Stage or status dropdown of one lead row.
#[derive(Debug)]
pub struct ClassificationEditor {
    classification: Classification,
    in_flight: AtomicBool,
}

impl ClassificationEditor {
    pub fn new(classification: Classification) -> Self {
        Self {
            classification,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn stage() -> Self {
        Self::new(Classification::Stage)
    }

    pub fn status() -> Self {
        Self::new(Classification::Status)
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn current<'a>(&self, lead: &'a Lead) -> &'a str {
        match self.classification {
            Classification::Stage => &lead.stage,
            Classification::Status => &lead.status,
        }
    }

    /// `options` is `None` until the reference data has loaded.
    pub fn view(&self, lead: &Lead, options: Option<&[ClassificationOption]>) -> EditorView {
        let Some(options) = options else {
            return EditorView::Loading;
        };
        let value = self.current(lead);
        EditorView::Select {
            value: value.to_string(),
            label: display_name_for(options, value).to_string(),
            options: options
                .iter()
                .map(|o| OptionView {
                    value: o.name.clone(),
                    label: o.display_name.clone(),
                    color: o.color.clone(),
                    selected: o.name == value,
                })
                .collect(),
            disabled: self.is_in_flight(),
        }
    }

    /// Send the new value through the gateway and emit exactly one
    /// notification for the outcome.
    pub async fn commit<G, R>(
        &self,
        lead: &Lead,
        value: &str,
        options: &[ClassificationOption],
        gateway: &G,
        relay: &R,
    ) -> EditOutcome
    where
        G: RowGateway<Row = Lead, Patch = LeadPatch> + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        if self.current(lead) == value {
            return EditOutcome::Unchanged;
        }
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!(lead_id = %lead.id, "editor busy, ignoring change");
            return EditOutcome::Busy;
        };

        let noun = self.classification.noun();
        let patch = match self.classification {
            Classification::Stage => LeadPatch::stage(value),
            Classification::Status => LeadPatch::status(value),
        };

        match gateway.update(&lead.id, patch).await {
            Ok(updated) => {
                let display = display_name_for(options, value);
                relay.notify(
                    Notification::success(format!(
                        "{}'s {} updated to \"{}\"",
                        lead.name, noun, display
                    ))
                    .titled(format!(
                        "Lead {} updated successfully!",
                        self.classification.title()
                    )),
                );
                EditOutcome::Updated(updated)
            }
            Err(err) => {
                warn!(lead_id = %lead.id, error = %err, "{} update failed", noun);
                let reason = err.user_message(&format!("Failed to update {}", noun));
                relay.notify(Notification::error(format!(
                    "Failed to update {}'s {}: {}",
                    lead.name, noun, reason
                )));
                EditOutcome::Failed(err)
            }
        }
    }
}
