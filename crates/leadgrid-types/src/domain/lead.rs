use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, GridRow, Result};

/// Lead priority as sent by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Badge text shown in the detail header, e.g. "High Priority".
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{} Priority", capitalized)
    }
}

fn default_status() -> String {
    "active".to_string()
}

/// One lead as returned by the leads endpoints.
///
/// Field names follow the backend's camelCase JSON; declaration order is
/// also the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub source: String,
    pub stage: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    #[serde(default)]
    pub co_assignees_names: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub lead_category: Option<String>,
    #[serde(default)]
    pub lead_score: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_contacted: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl GridRow for Lead {
    fn row_id(&self) -> &str {
        &self.id
    }
}

impl Lead {
    /// Phone number usable for messaging, falling back to the generic contact field.
    pub fn reachable_phone(&self) -> Option<&str> {
        self.phone_number
            .as_deref()
            .or(self.contact.as_deref())
            .filter(|p| !p.trim().is_empty())
    }

    /// Display name for the assignee column.
    ///
    /// Prefers the resolved name; otherwise uses the local part of the
    /// assignee email. `None` means unassigned.
    pub fn assignee_display(&self) -> Option<String> {
        if let Some(name) = self.assigned_to_name.as_deref()
            && !name.trim().is_empty()
        {
            return Some(name.to_string());
        }
        let email = self.assigned_to.as_deref()?;
        if email.trim().is_empty() {
            return None;
        }
        Some(email.split('@').next().unwrap_or(email).to_string())
    }

    /// Bullet lines of the free-form notes ("Extra Info").
    pub fn note_lines(&self) -> Vec<String> {
        self.notes
            .as_deref()
            .map(|notes| {
                notes
                    .split('•')
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Return a copy with the patch applied. The id never changes.
    pub fn patched(&self, patch: &LeadPatch) -> Lead {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(email) = &patch.email {
            next.email = Some(email.clone());
        }
        if let Some(phone) = &patch.phone_number {
            next.phone_number = Some(phone.clone());
        }
        if let Some(source) = &patch.source {
            next.source = source.clone();
        }
        if let Some(stage) = &patch.stage {
            next.stage = stage.clone();
        }
        if let Some(status) = &patch.status {
            next.status = status.clone();
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(tags) = &patch.tags {
            next.tags = tags.clone();
        }
        if let Some(assigned_to) = &patch.assigned_to {
            next.assigned_to = Some(assigned_to.clone());
        }
        if let Some(department) = &patch.department {
            next.department = Some(department.clone());
        }
        if let Some(category) = &patch.lead_category {
            next.lead_category = Some(category.clone());
        }
        if let Some(notes) = &patch.notes {
            next.notes = Some(notes.clone());
        }
        next
    }
}

/// Partial update for a lead; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeadPatch {
    pub fn stage(stage: impl Into<String>) -> Self {
        Self {
            stage: Some(stage.into()),
            ..Default::default()
        }
    }

    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == LeadPatch::default()
    }
}

/// Payload for creating a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub source: String,
    pub stage: String,
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewLead {
    /// Materialize the draft as a lead with a server-assigned id.
    pub fn into_lead(self, id: String, created_at: DateTime<Utc>) -> Lead {
        Lead {
            id,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            contact: None,
            source: self.source,
            stage: self.stage,
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            assigned_to: self.assigned_to,
            assigned_to_name: None,
            co_assignees_names: Vec::new(),
            department: self.department,
            lead_category: self.lead_category,
            lead_score: 0,
            created_at,
            last_contacted: None,
            notes: self.notes,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LeadListPayload {
    Bare(Vec<Lead>),
    Wrapped {
        #[serde(alias = "data")]
        leads: Vec<Lead>,
    },
}

/// Decode a leads list that is either a bare array or wrapped in `{ "leads": [...] }`
/// (`data` is accepted as an alias).
pub fn parse_lead_list(bytes: &[u8]) -> Result<Vec<Lead>> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if !(value.is_array() || value.is_object()) {
        return Err(Error::Shape("expected an array or object of leads".to_string()));
    }
    let payload: LeadListPayload = serde_json::from_value(value)?;
    Ok(match payload {
        LeadListPayload::Bare(leads) => leads,
        LeadListPayload::Wrapped { leads } => leads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Lead {
        Lead {
            id: "L-1".into(),
            name: "Asha Rao".into(),
            email: Some("asha@example.com".into()),
            phone_number: None,
            contact: Some("+91 98400 00000".into()),
            source: "website".into(),
            stage: "initial".into(),
            status: "active".into(),
            priority: Priority::High,
            tags: vec!["ielts".into()],
            assigned_to: Some("neha@example.com".into()),
            assigned_to_name: None,
            co_assignees_names: vec![],
            department: Some("sales".into()),
            lead_category: None,
            lead_score: 10,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            last_contacted: None,
            notes: Some("Prefers email • Budget approved •  ".into()),
        }
    }

    #[test]
    fn test_priority_label() {
        assert_eq!(Priority::High.label(), "High Priority");
        assert_eq!(Priority::default().label(), "Medium Priority");
    }

    #[test]
    fn test_reachable_phone_falls_back_to_contact() {
        let lead = sample();
        assert_eq!(lead.reachable_phone(), Some("+91 98400 00000"));
    }

    #[test]
    fn test_assignee_display_uses_email_local_part() {
        let lead = sample();
        assert_eq!(lead.assignee_display().as_deref(), Some("neha"));

        let mut unassigned = sample();
        unassigned.assigned_to = None;
        assert_eq!(unassigned.assignee_display(), None);
    }

    #[test]
    fn test_note_lines_split_on_bullets() {
        assert_eq!(sample().note_lines(), vec!["Prefers email", "Budget approved"]);
    }

    #[test]
    fn test_patch_keeps_id() {
        let lead = sample();
        let patched = lead.patched(&LeadPatch::stage("counselling"));
        assert_eq!(patched.id, "L-1");
        assert_eq!(patched.stage, "counselling");
        assert_eq!(lead.stage, "initial");
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let json = serde_json::to_value(LeadPatch::status("closed")).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "closed" }));
    }

    #[test]
    fn test_parse_lead_list_accepts_wrapped_and_bare() -> anyhow::Result<()> {
        let bare = br#"[{"id":"1","name":"A","stage":"initial","createdAt":"2025-01-01T00:00:00Z"}]"#;
        let wrapped = br#"{"leads":[{"id":"1","name":"A","stage":"initial","createdAt":"2025-01-01T00:00:00Z"}]}"#;
        let aliased = br#"{"data":[{"id":"1","name":"A","stage":"initial","createdAt":"2025-01-01T00:00:00Z"}]}"#;

        for payload in [&bare[..], &wrapped[..], &aliased[..]] {
            let leads = parse_lead_list(payload)?;
            assert_eq!(leads.len(), 1);
            assert_eq!(leads[0].status, "active");
        }
        assert!(parse_lead_list(b"42").is_err());
        Ok(())
    }
}
