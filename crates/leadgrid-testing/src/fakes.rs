//! In-memory stand-ins for the runtime's ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use leadgrid_runtime::{
    ApiClient, ApiRequest, ApiResponse, Clipboard, Confirmer, DetailLoader, DetailTab,
    MutationError, MutationResult, Notification, NotificationRelay, RowGateway, TabLoader,
    TransportError,
};
use leadgrid_types::{Department, DepartmentDraft, Lead, LeadPatch, NewLead};
use serde_json::Value;

use crate::fixtures::base_time;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Relay that keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.notifications)
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        lock(&self.notifications).last().cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.notifications).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationRelay for RecordingRelay {
    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }
}

/// API client answering from a queue of canned responses.
///
/// Every request is recorded; running out of responses is a transport error.
#[derive(Debug, Default)]
pub struct ScriptedApiClient {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        lock(&self.responses).push_back(Ok(ApiResponse { status, body }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        lock(&self.responses).push_back(Err(TransportError(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// "METHOD /path" for each recorded request.
    pub fn request_lines(&self) -> Vec<String> {
        lock(&self.requests).iter().map(|r| r.to_string()).collect()
    }
}

#[async_trait]
impl ApiClient for ScriptedApiClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let line = request.to_string();
        lock(&self.requests).push(request);
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError(format!("no scripted response for {}", line))))
    }
}

/// Lead gateway over an in-memory list, counting calls.
#[derive(Debug, Default)]
pub struct FakeLeadGateway {
    rows: Mutex<Vec<Lead>>,
    calls: AtomicUsize,
    yielding: bool,
    failure: Mutex<Option<MutationError>>,
}

impl FakeLeadGateway {
    pub fn new(rows: Vec<Lead>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    /// Yield to the scheduler before answering, so concurrent callers interleave.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    /// Fail every mutation with `error`.
    pub fn failing(self, error: MutationError) -> Self {
        *lock(&self.failure) = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<Lead> {
        lock(&self.rows).clone()
    }

    async fn enter(&self) -> MutationResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.yielding {
            tokio::task::yield_now().await;
        }
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RowGateway for FakeLeadGateway {
    type Row = Lead;
    type Draft = NewLead;
    type Patch = LeadPatch;

    async fn create(&self, draft: NewLead) -> MutationResult<Lead> {
        self.enter().await?;
        let mut rows = lock(&self.rows);
        let lead = draft.into_lead(format!("lead-new-{}", rows.len() + 1), base_time());
        rows.insert(0, lead.clone());
        Ok(lead)
    }

    async fn update(&self, id: &str, patch: LeadPatch) -> MutationResult<Lead> {
        self.enter().await?;
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or(MutationError::NotFound)?;
        *row = row.patched(&patch);
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> MutationResult<()> {
        self.enter().await?;
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|lead| lead.id != id);
        if rows.len() == before {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl DetailLoader for FakeLeadGateway {
    async fn load(&self, id: &str) -> MutationResult<Lead> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.rows)
            .iter()
            .find(|lead| lead.id == id)
            .cloned()
            .ok_or(MutationError::NotFound)
    }
}

/// Department gateway over an in-memory list.
#[derive(Debug, Default)]
pub struct FakeDepartmentGateway {
    rows: Mutex<Vec<Department>>,
    calls: AtomicUsize,
    failure: Mutex<Option<MutationError>>,
}

impl FakeDepartmentGateway {
    pub fn new(rows: Vec<Department>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn failing(self, error: MutationError) -> Self {
        *lock(&self.failure) = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<Department> {
        lock(&self.rows).clone()
    }

    fn enter(&self) -> MutationResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RowGateway for FakeDepartmentGateway {
    type Row = Department;
    type Draft = DepartmentDraft;
    type Patch = DepartmentDraft;

    async fn create(&self, draft: DepartmentDraft) -> MutationResult<Department> {
        self.enter()?;
        let mut rows = lock(&self.rows);
        let department = Department {
            id: format!("dept-{}", rows.len() + 1),
            name: draft.name,
            description: draft.description,
            is_active: draft.is_active,
            is_predefined: false,
            user_count: 0,
        };
        rows.push(department.clone());
        Ok(department)
    }

    async fn update(&self, id: &str, patch: DepartmentDraft) -> MutationResult<Department> {
        self.enter()?;
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(MutationError::NotFound)?;
        row.name = patch.name;
        row.description = patch.description;
        row.is_active = patch.is_active;
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> MutationResult<()> {
        self.enter()?;
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|d| d.id != id);
        if rows.len() == before {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }
}

/// Confirmer with a fixed answer that records what it was asked.
#[derive(Debug, Default)]
pub struct FixedConfirmer {
    answer: bool,
    asked: Mutex<Vec<(String, String)>>,
}

impl FixedConfirmer {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Default::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    pub fn asked(&self) -> Vec<(String, String)> {
        lock(&self.asked).clone()
    }
}

#[async_trait]
impl Confirmer for FixedConfirmer {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        lock(&self.asked).push((title.to_string(), message.to_string()));
        self.answer
    }
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    failure: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        lock(&self.contents).clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        if let Some(message) = &self.failure {
            return Err(message.clone());
        }
        *lock(&self.contents) = Some(text.to_string());
        Ok(())
    }
}

/// Tab loader returning a fixed payload and counting loads per call.
#[derive(Debug, Default)]
pub struct CountingTabLoader {
    loads: Mutex<Vec<(DetailTab, String)>>,
}

impl CountingTabLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loads(&self) -> Vec<(DetailTab, String)> {
        lock(&self.loads).clone()
    }

    pub fn count(&self) -> usize {
        lock(&self.loads).len()
    }
}

#[async_trait]
impl TabLoader for CountingTabLoader {
    async fn load_tab(&self, tab: DetailTab, entity_id: &str) -> MutationResult<Value> {
        lock(&self.loads).push((tab, entity_id.to_string()));
        Ok(serde_json::json!({ "tab": tab.as_str(), "entityId": entity_id, "items": [] }))
    }
}
