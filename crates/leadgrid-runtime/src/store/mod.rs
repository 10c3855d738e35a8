//! Application state container.
//!
//! One [`AppState`] value, changed only by dispatching [`Action`]s through
//! the pure [`reduce`] function.

pub mod selectors;

use std::collections::BTreeSet;

use leadgrid_types::{Lead, UserProfile};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }
}

/// Filter inputs of the leads screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadFilters {
    pub name: String,
    pub stage: String,
    pub department: String,
    pub source: String,
    pub assigned_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadsUiState {
    pub filters: LeadFilters,
    pub selected: BTreeSet<String>,
    pub bulk_update_open: bool,
    /// Lead whose edit modal is open
    pub editing: Option<String>,
}

/// Lead and sender handed to the WhatsApp composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhatsAppTarget {
    pub lead_id: String,
    pub lead_name: String,
    pub phone_number: String,
    pub lead_email: Option<String>,
    pub user_id: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
}

impl WhatsAppTarget {
    pub fn new(lead: &Lead, phone_number: &str, user: &UserProfile) -> Self {
        Self {
            lead_id: lead.id.clone(),
            lead_name: lead.name.clone(),
            phone_number: phone_number.to_string(),
            lead_email: lead.email.clone(),
            user_id: user.id.clone(),
            user_first_name: user.first_name.clone(),
            user_last_name: user.last_name.clone(),
            user_email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DialogState {
    /// Lead id the email composer is open for
    pub email_lead: Option<String>,
    pub whatsapp: Option<WhatsAppTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub auth: AuthState,
    pub leads: LeadsUiState,
    pub dialogs: DialogState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // auth
    SessionRestored {
        access_token: String,
        user: UserProfile,
    },
    LoggedOut,

    // filters
    SetNameFilter(String),
    SetStageFilter(String),
    SetDepartmentFilter(String),
    SetSourceFilter(String),
    SetAssignedToFilter(String),
    ClearFilters,

    // selection
    ToggleLeadSelection(String),
    SelectAllLeads(Vec<String>),
    ClearSelection,

    // modals
    OpenBulkUpdate,
    CloseBulkUpdate,
    OpenEditModal(String),
    CloseEditModal,
    OpenEmailDialog(String),
    CloseEmailDialog,
    OpenWhatsApp(WhatsAppTarget),
    CloseWhatsApp,
}

pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    let leads = &mut state.leads;
    match action {
        Action::SessionRestored { access_token, user } => {
            state.auth = AuthState {
                access_token: Some(access_token.clone()),
                user: Some(user.clone()),
            };
        }
        Action::LoggedOut => {
            state = AppState::default();
        }

        Action::SetNameFilter(v) => leads.filters.name = v.clone(),
        Action::SetStageFilter(v) => leads.filters.stage = v.clone(),
        Action::SetDepartmentFilter(v) => leads.filters.department = v.clone(),
        Action::SetSourceFilter(v) => leads.filters.source = v.clone(),
        Action::SetAssignedToFilter(v) => leads.filters.assigned_to = v.clone(),
        Action::ClearFilters => leads.filters = LeadFilters::default(),

        Action::ToggleLeadSelection(id) => {
            if !leads.selected.remove(id) {
                leads.selected.insert(id.clone());
            }
        }
        Action::SelectAllLeads(ids) => leads.selected = ids.iter().cloned().collect(),
        Action::ClearSelection => leads.selected.clear(),

        Action::OpenBulkUpdate => leads.bulk_update_open = true,
        Action::CloseBulkUpdate => {
            leads.bulk_update_open = false;
            leads.selected.clear();
        }
        Action::OpenEditModal(id) => leads.editing = Some(id.clone()),
        Action::CloseEditModal => leads.editing = None,

        Action::OpenEmailDialog(id) => state.dialogs.email_lead = Some(id.clone()),
        Action::CloseEmailDialog => state.dialogs.email_lead = None,
        Action::OpenWhatsApp(target) => state.dialogs.whatsapp = Some(target.clone()),
        Action::CloseWhatsApp => state.dialogs.whatsapp = None,
    }
    state
}

/// Holds the current state and applies actions one at a time.
#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "dispatch");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, &action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            email: "neha@example.com".into(),
            first_name: "Neha".into(),
            last_name: "K".into(),
            role: None,
        }
    }

    #[test]
    fn test_toggle_selection() {
        let mut store = Store::default();
        store.dispatch(Action::ToggleLeadSelection("a".into()));
        store.dispatch(Action::ToggleLeadSelection("b".into()));
        store.dispatch(Action::ToggleLeadSelection("a".into()));
        assert_eq!(
            store.state().leads.selected.iter().collect::<Vec<_>>(),
            vec!["b"]
        );
    }

    #[test]
    fn test_close_bulk_update_clears_selection() {
        let mut store = Store::default();
        store.dispatch(Action::SelectAllLeads(vec!["a".into(), "b".into()]));
        store.dispatch(Action::OpenBulkUpdate);
        store.dispatch(Action::CloseBulkUpdate);
        assert!(!store.state().leads.bulk_update_open);
        assert!(store.state().leads.selected.is_empty());
    }

    #[test]
    fn test_logout_resets_everything() {
        let mut store = Store::default();
        store.dispatch(Action::SessionRestored {
            access_token: "t".into(),
            user: user(),
        });
        store.dispatch(Action::SetStageFilter("won".into()));
        assert!(store.state().auth.is_authenticated());

        store.dispatch(Action::LoggedOut);
        assert_eq!(store.state(), &AppState::default());
    }

    #[test]
    fn test_reduce_is_pure() {
        let before = AppState::default();
        let after = reduce(before.clone(), &Action::OpenEditModal("L-1".into()));
        assert_eq!(before.leads.editing, None);
        assert_eq!(after.leads.editing.as_deref(), Some("L-1"));
    }
}
