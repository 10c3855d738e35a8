//! JSON-file backend speaking the same routes as the leads API.
//!
//! Leads live in one JSON file (a bare array or `{"leads": [...]}`); stage and
//! status options and departments live next to it in the data directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use leadgrid_runtime::{ApiClient, ApiRequest, ApiResponse, Method, TransportError};
use leadgrid_types::{
    Classification, ClassificationOption, Department, DepartmentDraft, DepartmentList, Lead,
    LeadPatch, LeadStats, MultiAssignmentStats, NewLead, parse_lead_list,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::debug;

pub struct FileApiClient {
    leads_path: PathBuf,
    data_dir: PathBuf,
    /// Signed-in user's email, used for the `my_leads` counter
    user_email: Option<String>,
    // Serializes read-modify-write cycles on the files.
    lock: Mutex<()>,
}

type Reply = Result<ApiResponse, TransportError>;

impl FileApiClient {
    pub fn new(leads_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            leads_path: leads_path.into(),
            data_dir: data_dir.into(),
            user_email: None,
            lock: Mutex::new(()),
        }
    }

    pub fn with_user_email(mut self, email: Option<String>) -> Self {
        self.user_email = email;
        self
    }

    pub fn leads_path(&self) -> &Path {
        &self.leads_path
    }

    fn departments_path(&self) -> PathBuf {
        self.data_dir.join("departments.json")
    }

    fn options_path(&self, classification: Classification) -> PathBuf {
        match classification {
            Classification::Stage => self.data_dir.join("stages.json"),
            Classification::Status => self.data_dir.join("statuses.json"),
        }
    }

    async fn read_leads(&self) -> Result<Vec<Lead>, TransportError> {
        let bytes = tokio::fs::read(&self.leads_path)
            .await
            .map_err(|e| io_error(&self.leads_path, e))?;
        parse_lead_list(&bytes)
            .map_err(|e| TransportError(format!("{}: {}", self.leads_path.display(), e)))
    }

    async fn write_leads(&self, leads: &[Lead]) -> Result<(), TransportError> {
        write_json(&self.leads_path, leads).await
    }

    async fn read_departments(&self) -> Result<Vec<Department>, TransportError> {
        let path = self.departments_path();
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }
        read_json(&path).await
    }

    /// Options from `stages.json` / `statuses.json`, or the distinct values
    /// found in the leads when the file is absent.
    async fn read_options(
        &self,
        classification: Classification,
    ) -> Result<Vec<ClassificationOption>, TransportError> {
        let path = self.options_path(classification);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return read_json(&path).await;
        }
        let leads = self.read_leads().await?;
        let mut names: Vec<&str> = leads
            .iter()
            .map(|lead| match classification {
                Classification::Stage => lead.stage.as_str(),
                Classification::Status => lead.status.as_str(),
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        Ok(names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let mut option = ClassificationOption::new(name, name);
                option.sort_order = i as i32;
                option
            })
            .collect())
    }

    async fn update_lead(&self, id: &str, body: Option<Value>) -> Reply {
        let patch: LeadPatch = match parse_body(body) {
            Ok(patch) => patch,
            Err(reply) => return Ok(reply),
        };
        for (classification, value) in [
            (Classification::Stage, &patch.stage),
            (Classification::Status, &patch.status),
        ] {
            let Some(value) = value else { continue };
            let options = self.read_options(classification).await?;
            if !options.iter().any(|o| &o.name == value && o.is_active) {
                return Ok(detail(
                    400,
                    &format!("Unknown {} \"{}\"", classification.noun(), value),
                ));
            }
        }

        let mut leads = self.read_leads().await?;
        let Some(lead) = leads.iter_mut().find(|lead| lead.id == id) else {
            return Ok(detail(404, "Lead not found"));
        };
        *lead = lead.patched(&patch);
        let updated = lead.clone();
        self.write_leads(&leads).await?;
        ok(200, &updated)
    }

    async fn create_lead(&self, body: Option<Value>) -> Reply {
        let draft: NewLead = match parse_body(body) {
            Ok(draft) => draft,
            Err(reply) => return Ok(reply),
        };
        if draft.name.trim().is_empty() {
            return Ok(validation("name", "Name is required"));
        }
        let mut leads = self.read_leads().await?;
        let lead = draft.into_lead(uuid::Uuid::new_v4().to_string(), Utc::now());
        leads.insert(0, lead.clone());
        self.write_leads(&leads).await?;
        ok(201, &lead)
    }

    async fn delete_lead(&self, id: &str) -> Reply {
        let mut leads = self.read_leads().await?;
        let before = leads.len();
        leads.retain(|lead| lead.id != id);
        if leads.len() == before {
            return Ok(detail(404, "Lead not found"));
        }
        self.write_leads(&leads).await?;
        Ok(ApiResponse {
            status: 204,
            body: Value::Null,
        })
    }

    async fn create_department(&self, body: Option<Value>) -> Reply {
        let draft: DepartmentDraft = match parse_body(body) {
            Ok(draft) => draft,
            Err(reply) => return Ok(reply),
        };
        let mut departments = self.read_departments().await?;
        if departments
            .iter()
            .any(|d| d.name.eq_ignore_ascii_case(&draft.name))
        {
            return Ok(detail(400, "Department already exists"));
        }
        let department = Department {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            description: draft.description,
            is_active: draft.is_active,
            is_predefined: false,
            user_count: 0,
        };
        departments.push(department.clone());
        write_json(&self.departments_path(), &departments).await?;
        ok(201, &department)
    }

    async fn delete_department(&self, id: &str) -> Reply {
        let mut departments = self.read_departments().await?;
        let Some(position) = departments.iter().position(|d| d.id == id) else {
            return Ok(detail(404, "Department not found"));
        };
        if departments[position].is_predefined {
            return Ok(detail(400, "Cannot delete predefined department"));
        }
        departments.remove(position);
        write_json(&self.departments_path(), &departments).await?;
        Ok(ApiResponse {
            status: 204,
            body: Value::Null,
        })
    }
}

#[async_trait]
impl ApiClient for FileApiClient {
    async fn send(&self, request: ApiRequest) -> Reply {
        let _guard = self.lock.lock().await;
        debug!(request = %request, "file backend");
        let ApiRequest { method, path, body } = request;
        let (route, query) = path.split_once('?').unwrap_or((path.as_str(), ""));
        let segments: Vec<&str> = route.trim_matches('/').split('/').collect();

        match (method, segments.as_slice()) {
            (Method::Get, ["leads"]) => ok(200, &self.read_leads().await?),
            (Method::Get, ["leads", "stats"]) => {
                let include_multi = query_flag(query, "include_multi_assignment_stats");
                let leads = self.read_leads().await?;
                ok(200, &stats(&leads, self.user_email.as_deref(), include_multi))
            }
            (Method::Post, ["leads"]) => self.create_lead(body).await,
            (Method::Get, ["leads", id]) => {
                match self.read_leads().await?.into_iter().find(|l| l.id == *id) {
                    Some(lead) => ok(200, &lead),
                    None => Ok(detail(404, "Lead not found")),
                }
            }
            (Method::Put, ["leads", id]) => self.update_lead(id, body).await,
            (Method::Delete, ["leads", id]) => self.delete_lead(id).await,
            (Method::Get, ["stages", "active"]) => {
                let stages = self.read_options(Classification::Stage).await?;
                Ok(ApiResponse::ok(json!({ "stages": active(stages) })))
            }
            (Method::Get, ["statuses", "active"]) => {
                let statuses = self.read_options(Classification::Status).await?;
                Ok(ApiResponse::ok(json!({ "statuses": active(statuses) })))
            }
            (Method::Get, ["admin", "departments"]) => {
                let list = DepartmentList::from_departments(self.read_departments().await?);
                ok(200, &list)
            }
            (Method::Post, ["admin", "departments"]) => self.create_department(body).await,
            (Method::Delete, ["admin", "departments", id]) => self.delete_department(id).await,
            _ => Ok(detail(404, "Not Found")),
        }
    }
}

/// Counters over the lead file. Open leads are active ones; in progress
/// are open leads past the initial stage and not yet closed; closed won
/// are converted leads.
fn stats(leads: &[Lead], user_email: Option<&str>, include_multi: bool) -> LeadStats {
    let open = |l: &&Lead| l.status == "active";
    LeadStats {
        total_leads: leads.len() as u64,
        open_leads: leads.iter().filter(open).count() as u64,
        in_progress_leads: leads
            .iter()
            .filter(open)
            .filter(|l| l.stage != "initial" && l.stage != "closed")
            .count() as u64,
        closed_won_leads: leads.iter().filter(|l| l.status == "converted").count() as u64,
        my_leads: user_email.map_or(0, |email| {
            leads
                .iter()
                .filter(|l| l.assigned_to.as_deref() == Some(email))
                .count() as u64
        }),
        multi_assignment_stats: include_multi.then(|| MultiAssignmentStats {
            multi_assigned_leads: leads
                .iter()
                .filter(|l| !l.co_assignees_names.is_empty())
                .count() as u64,
            single_assigned_leads: leads
                .iter()
                .filter(|l| l.assigned_to.is_some() && l.co_assignees_names.is_empty())
                .count() as u64,
            unassigned_leads: leads
                .iter()
                .filter(|l| l.assigned_to.is_none() && l.co_assignees_names.is_empty())
                .count() as u64,
        }),
    }
}

fn query_flag(query: &str, name: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == name && value == "true")
}

fn active(options: Vec<ClassificationOption>) -> Vec<ClassificationOption> {
    options.into_iter().filter(|o| o.is_active).collect()
}

fn ok<T: Serialize + ?Sized>(status: u16, value: &T) -> Reply {
    let body = serde_json::to_value(value).map_err(|e| TransportError(e.to_string()))?;
    Ok(ApiResponse { status, body })
}

fn detail(status: u16, message: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: json!({ "detail": message }),
    }
}

fn validation(field: &str, message: &str) -> ApiResponse {
    ApiResponse {
        status: 422,
        body: json!({
            "detail": [{ "msg": message, "loc": ["body", field], "type": "value_error" }]
        }),
    }
}

fn parse_body<T: DeserializeOwned>(body: Option<Value>) -> Result<T, ApiResponse> {
    let body = body.ok_or_else(|| detail(400, "Request body required"))?;
    serde_json::from_value(body).map_err(|e| detail(422, &e.to_string()))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TransportError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TransportError(format!("{}: {}", path.display(), e)))
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), TransportError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| TransportError(e.to_string()))?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(parent, e))?;
    }
    tokio::fs::write(path, text)
        .await
        .map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, err: std::io::Error) -> TransportError {
    TransportError(format!("{}: {}", path.display(), err))
}
