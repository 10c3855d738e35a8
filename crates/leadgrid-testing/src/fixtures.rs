//! Sample data shared by engine, runtime and CLI tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use leadgrid_types::{ClassificationOption, Department, Lead, Priority, UserProfile};

const STAGES: [&str; 4] = ["initial", "contacted", "counselling", "closed"];
const SOURCES: [&str; 3] = ["website", "referral", "walk_in"];

/// Fixed reference instant so date-dependent tests are reproducible.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Fluent builder for a single lead.
///
/// # Example
/// ```
/// use leadgrid_testing::LeadBuilder;
///
/// let lead = LeadBuilder::new("L-1").name("Asha Rao").stage("contacted").build();
/// assert_eq!(lead.stage, "contacted");
/// ```
#[derive(Debug, Clone)]
pub struct LeadBuilder {
    lead: Lead,
}

impl LeadBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            lead: Lead {
                id: id.to_string(),
                name: format!("Lead {}", id),
                email: None,
                phone_number: None,
                contact: None,
                source: "website".to_string(),
                stage: "initial".to_string(),
                status: "active".to_string(),
                priority: Priority::Medium,
                tags: Vec::new(),
                assigned_to: None,
                assigned_to_name: None,
                co_assignees_names: Vec::new(),
                department: None,
                lead_category: None,
                lead_score: 0,
                created_at: base_time(),
                last_contacted: None,
                notes: None,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.lead.name = name.to_string();
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.lead.email = Some(email.to_string());
        self
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.lead.phone_number = Some(phone.to_string());
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.lead.source = source.to_string();
        self
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.lead.stage = stage.to_string();
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.lead.status = status.to_string();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.lead.priority = priority;
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.lead.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn assigned_to(mut self, email: &str) -> Self {
        self.lead.assigned_to = Some(email.to_string());
        self
    }

    pub fn department(mut self, department: &str) -> Self {
        self.lead.department = Some(department.to_string());
        self
    }

    pub fn score(mut self, score: u32) -> Self {
        self.lead.lead_score = score;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.lead.created_at = created_at;
        self
    }

    pub fn last_contacted(mut self, at: DateTime<Utc>) -> Self {
        self.lead.last_contacted = Some(at);
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.lead.notes = Some(notes.to_string());
        self
    }

    pub fn build(self) -> Lead {
        self.lead
    }
}

/// `count` leads with ids `lead-1..=lead-count`, one day apart, cycling
/// through stages and sources.
pub fn leads(count: usize) -> Vec<Lead> {
    (1..=count)
        .map(|i| {
            LeadBuilder::new(&format!("lead-{}", i))
                .name(&format!("Lead {}", i))
                .email(&format!("lead{}@example.com", i))
                .phone(&format!("+91 90000 {:05}", i))
                .stage(STAGES[(i - 1) % STAGES.len()])
                .source(SOURCES[(i - 1) % SOURCES.len()])
                .score((i % 5) as u32)
                .created_at(base_time() + Duration::days(i as i64))
                .build()
        })
        .collect()
}

pub fn stage_options() -> Vec<ClassificationOption> {
    STAGES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut option = ClassificationOption::new(*name, title_case(name));
            option.sort_order = i as i32;
            option
        })
        .collect()
}

pub fn status_options() -> Vec<ClassificationOption> {
    ["active", "inactive", "converted"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut option = ClassificationOption::new(*name, title_case(name));
            option.sort_order = i as i32;
            option
        })
        .collect()
}

pub fn department(id: &str, name: &str, predefined: bool) -> Department {
    Department {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} team", name),
        is_active: true,
        is_predefined: predefined,
        user_count: 0,
    }
}

/// Two predefined departments and one custom one.
pub fn departments() -> Vec<Department> {
    vec![
        department("dept-admissions", "Admissions", true),
        department("dept-sales", "Sales", true),
        department("dept-visa", "Visa Desk", false),
    ]
}

pub fn user() -> UserProfile {
    UserProfile {
        id: "user-1".to_string(),
        email: "neha@example.com".to_string(),
        first_name: "Neha".to_string(),
        last_name: "Kapoor".to_string(),
        role: Some("agent".to_string()),
    }
}

fn title_case(raw: &str) -> String {
    raw.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
