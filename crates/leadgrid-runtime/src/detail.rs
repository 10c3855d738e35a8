//! Lead detail page: record loading, overview panel and lazily loaded tabs.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use leadgrid_types::Lead;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::gateway::{MutationError, MutationResult};
use crate::navigation::{Navigator, Route};
use crate::rest::{Leads, RestGateway};

#[async_trait]
pub trait DetailLoader: Send + Sync {
    async fn load(&self, id: &str) -> MutationResult<Lead>;
}

#[async_trait]
impl<C: ApiClient> DetailLoader for RestGateway<C, Leads> {
    async fn load(&self, id: &str) -> MutationResult<Lead> {
        self.get(id).await
    }
}

/// Loads the content of one tab panel for an entity.
#[async_trait]
pub trait TabLoader: Send + Sync {
    async fn load_tab(&self, tab: DetailTab, entity_id: &str) -> MutationResult<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailTab {
    Timeline,
    #[default]
    Tasks,
    Notes,
    Documents,
    Activity,
    Contacts,
}

impl DetailTab {
    pub const ALL: [DetailTab; 6] = [
        DetailTab::Timeline,
        DetailTab::Tasks,
        DetailTab::Notes,
        DetailTab::Documents,
        DetailTab::Activity,
        DetailTab::Contacts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailTab::Timeline => "timeline",
            DetailTab::Tasks => "tasks",
            DetailTab::Notes => "notes",
            DetailTab::Documents => "documents",
            DetailTab::Activity => "activity",
            DetailTab::Contacts => "contacts",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Timeline => "Timeline",
            DetailTab::Tasks => "Tasks & Reminders",
            DetailTab::Notes => "Notes",
            DetailTab::Documents => "Documents",
            DetailTab::Activity => "Activity",
            DetailTab::Contacts => "Contacts",
        }
    }

    /// Static panel that never calls a loader.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, DetailTab::Activity)
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for DetailTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum TabState {
    Idle,
    Loading,
    Ready(Value),
    Failed(String),
    ComingSoon,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    #[default]
    Idle,
    Loading,
    Ready(Box<Lead>),
    NotFound,
    Failed(String),
}

/// Overview panel of a loaded lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub priority: String,
    pub stage: String,
    pub status: String,
    pub source: String,
    pub assigned_to: String,
    pub co_assignees: String,
    pub created_on: String,
    pub last_contacted: String,
    pub tags: Vec<String>,
    pub notes: Vec<String>,
    pub lead_score: u32,
}

impl Overview {
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.reachable_phone().map(str::to_string),
            priority: lead.priority.label(),
            stage: lead.stage.clone(),
            status: lead.status.clone(),
            source: lead.source.clone(),
            assigned_to: lead
                .assignee_display()
                .unwrap_or_else(|| "Unassigned".to_string()),
            co_assignees: if lead.co_assignees_names.is_empty() {
                "Unassigned".to_string()
            } else {
                lead.co_assignees_names.join(", ")
            },
            created_on: lead.created_at.format("%Y-%m-%d").to_string(),
            last_contacted: lead
                .last_contacted
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Never".to_string()),
            tags: lead.tags.clone(),
            notes: lead.note_lines(),
            lead_score: lead.lead_score,
        }
    }
}

/// Pending record load; stale once another id is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub entity_id: String,
    generation: u64,
}

/// Pending tab load for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRequest {
    pub tab: DetailTab,
    pub entity_id: String,
    epoch: u64,
}

#[derive(Debug, Default)]
pub struct DetailView {
    entity_id: Option<String>,
    generation: u64,
    /// Bumped whenever the tab map is reset for a new entity
    tab_epoch: u64,
    record: DetailState,
    active_tab: DetailTab,
    tabs: HashMap<(DetailTab, String), TabState>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn state(&self) -> &DetailState {
        &self.record
    }

    pub fn lead(&self) -> Option<&Lead> {
        match &self.record {
            DetailState::Ready(lead) => Some(lead),
            _ => None,
        }
    }

    pub fn overview(&self) -> Option<Overview> {
        self.lead().map(Overview::from_lead)
    }

    pub fn active_tab(&self) -> DetailTab {
        self.active_tab
    }

    pub fn tab_state(&self, tab: DetailTab) -> TabState {
        if tab.is_placeholder() {
            return TabState::ComingSoon;
        }
        let Some(id) = &self.entity_id else {
            return TabState::Idle;
        };
        self.tabs
            .get(&(tab, id.clone()))
            .cloned()
            .unwrap_or(TabState::Idle)
    }

    /// Start showing `id`. Opening a different id resets every tab.
    pub fn begin_open(&mut self, id: &str) -> OpenRequest {
        if self.entity_id.as_deref() != Some(id) {
            debug!(entity_id = id, "detail view switched entity");
            self.tabs.clear();
            self.tab_epoch += 1;
            self.active_tab = DetailTab::default();
        }
        self.generation += 1;
        self.entity_id = Some(id.to_string());
        self.record = DetailState::Loading;
        OpenRequest {
            entity_id: id.to_string(),
            generation: self.generation,
        }
    }

    pub fn complete_open(&mut self, request: OpenRequest, result: MutationResult<Lead>) -> bool {
        if request.generation != self.generation {
            warn!(entity_id = %request.entity_id, "discarding late detail response");
            return false;
        }
        self.record = match result {
            Ok(lead) => DetailState::Ready(Box::new(lead)),
            Err(MutationError::NotFound) => DetailState::NotFound,
            Err(err) => DetailState::Failed(err.user_message("Failed to load lead")),
        };
        true
    }

    pub async fn open<L: DetailLoader + ?Sized>(&mut self, id: &str, loader: &L) -> &DetailState {
        let request = self.begin_open(id);
        let result = loader.load(id).await;
        self.complete_open(request, result);
        self.state()
    }

    /// Activate a tab; returns a load request the first time the tab is
    /// shown for the current entity.
    pub fn begin_tab(&mut self, tab: DetailTab) -> Option<TabRequest> {
        self.active_tab = tab;
        if tab.is_placeholder() {
            return None;
        }
        let id = self.entity_id.clone()?;
        let key = (tab, id.clone());
        if self.tabs.contains_key(&key) {
            return None;
        }
        self.tabs.insert(key, TabState::Loading);
        Some(TabRequest {
            tab,
            entity_id: id,
            epoch: self.tab_epoch,
        })
    }

    pub fn complete_tab(&mut self, request: TabRequest, result: MutationResult<Value>) -> bool {
        if request.epoch != self.tab_epoch
            || self.entity_id.as_deref() != Some(request.entity_id.as_str())
        {
            warn!(
                tab = %request.tab,
                entity_id = %request.entity_id,
                "discarding tab response for previous entity"
            );
            return false;
        }
        let state = match result {
            Ok(value) => TabState::Ready(value),
            Err(err) => {
                TabState::Failed(err.user_message(&format!("Failed to load {}", request.tab)))
            }
        };
        self.tabs.insert((request.tab, request.entity_id), state);
        true
    }

    pub async fn select_tab<L: TabLoader + ?Sized>(
        &mut self,
        tab: DetailTab,
        loader: &L,
    ) -> TabState {
        if let Some(request) = self.begin_tab(tab) {
            let result = loader.load_tab(request.tab, &request.entity_id).await;
            self.complete_tab(request, result);
        }
        self.tab_state(tab)
    }

    /// "Go Back" from the detail page.
    pub fn back_to_list<N: Navigator + ?Sized>(&self, navigator: &N) {
        navigator.push(&Route::MyLeads.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tab_loads_once_and_resets_on_new_entity() {
        let mut view = DetailView::new();
        view.begin_open("a");

        let request = view.begin_tab(DetailTab::Notes);
        assert!(request.is_some());
        assert!(view.begin_tab(DetailTab::Notes).is_none());
        if let Some(request) = request {
            assert!(view.complete_tab(request, Ok(json!(["n1"]))));
        }
        assert_eq!(view.tab_state(DetailTab::Notes), TabState::Ready(json!(["n1"])));
        assert_eq!(view.tab_state(DetailTab::Tasks), TabState::Idle);

        view.begin_open("b");
        assert_eq!(view.tab_state(DetailTab::Notes), TabState::Idle);
        assert_eq!(view.active_tab(), DetailTab::Tasks);
    }

    #[test]
    fn test_late_tab_response_discarded() {
        let mut view = DetailView::new();
        view.begin_open("a");
        let request = view.begin_tab(DetailTab::Timeline).unwrap();

        view.begin_open("b");
        assert!(!view.complete_tab(request, Ok(json!([]))));
        assert_eq!(view.tab_state(DetailTab::Timeline), TabState::Idle);
    }

    #[test]
    fn test_tab_response_from_earlier_visit_discarded() {
        let mut view = DetailView::new();
        view.begin_open("a");
        let stale = view.begin_tab(DetailTab::Notes).unwrap();

        view.begin_open("b");
        view.begin_open("a");
        assert!(!view.complete_tab(stale, Ok(json!(["stale"]))));
        assert_eq!(view.tab_state(DetailTab::Notes), TabState::Idle);

        let fresh = view.begin_tab(DetailTab::Notes).unwrap();
        assert!(view.complete_tab(fresh, Ok(json!(["fresh"]))));
        assert_eq!(view.tab_state(DetailTab::Notes), TabState::Ready(json!(["fresh"])));
    }

    #[test]
    fn test_reopening_same_entity_keeps_pending_tab() {
        let mut view = DetailView::new();
        view.begin_open("a");
        let request = view.begin_tab(DetailTab::Tasks).unwrap();

        view.begin_open("a");
        assert!(view.complete_tab(request, Ok(json!([]))));
        assert_eq!(view.tab_state(DetailTab::Tasks), TabState::Ready(json!([])));
    }

    #[test]
    fn test_activity_is_static() {
        let mut view = DetailView::new();
        view.begin_open("a");
        assert!(view.begin_tab(DetailTab::Activity).is_none());
        assert_eq!(view.tab_state(DetailTab::Activity), TabState::ComingSoon);
    }

    #[test]
    fn test_not_found_state() {
        let mut view = DetailView::new();
        let request = view.begin_open("missing");
        view.complete_open(request, Err(MutationError::NotFound));
        assert_eq!(view.state(), &DetailState::NotFound);
        assert!(view.overview().is_none());
    }
}
