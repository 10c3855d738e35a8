use serde::{Deserialize, Serialize};

/// `GET /leads/stats` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStats {
    #[serde(default)]
    pub total_leads: u64,
    #[serde(default)]
    pub open_leads: u64,
    #[serde(default)]
    pub in_progress_leads: u64,
    #[serde(default)]
    pub closed_won_leads: u64,
    /// Leads assigned to the requesting user
    #[serde(default)]
    pub my_leads: u64,
    /// Present only when requested with `include_multi_assignment_stats`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_assignment_stats: Option<MultiAssignmentStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAssignmentStats {
    #[serde(default)]
    pub multi_assigned_leads: u64,
    #[serde(default)]
    pub single_assigned_leads: u64,
    #[serde(default)]
    pub unassigned_leads: u64,
}
