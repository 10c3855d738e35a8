//! Dashboard: lead statistics cards, welcome line and quick actions.

use leadgrid_types::{LeadStats, UserProfile};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::gateway::MutationResult;
use crate::rest::fetch_lead_stats;

pub const STATS_ERROR_TITLE: &str = "Unable to load statistics";
pub const STATS_ERROR_HINT: &str =
    "Please try refreshing or contact support if the issue persists.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum StatsState {
    #[default]
    Idle,
    Loading,
    Ready(LeadStats),
    Failed(String),
}

/// One counter card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: u64,
    pub caption: &'static str,
}

/// Pending stats fetch; superseded by any later refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRequest {
    pub include_multi_assignment_stats: bool,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    user: Option<UserProfile>,
    state: StatsState,
    generation: u64,
}

impl Dashboard {
    pub fn new(user: Option<UserProfile>) -> Self {
        Self {
            user,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &StatsState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == StatsState::Loading
    }

    /// Admins also get the multi-assignment breakdown.
    pub fn includes_multi_assignment_stats(&self) -> bool {
        self.user.as_ref().is_some_and(UserProfile::is_admin)
    }

    pub fn welcome(&self) -> String {
        let (first, last) = self
            .user
            .as_ref()
            .map(|u| (u.first_name.as_str(), u.last_name.as_str()))
            .unwrap_or_default();
        format!("Welcome back, {} {}!", first, last)
    }

    pub fn refresh_label(&self) -> &'static str {
        if self.is_loading() {
            "Refreshing..."
        } else {
            "Refresh"
        }
    }

    pub fn primary_action(&self) -> (&'static str, &'static str) {
        if self.includes_multi_assignment_stats() {
            ("Manage All Leads", "View and manage all leads in the system")
        } else {
            ("View My Leads", "Access your assigned leads")
        }
    }

    pub fn begin_refresh(&mut self) -> StatsRequest {
        self.generation += 1;
        self.state = StatsState::Loading;
        StatsRequest {
            include_multi_assignment_stats: self.includes_multi_assignment_stats(),
            generation: self.generation,
        }
    }

    pub fn complete_refresh(
        &mut self,
        request: StatsRequest,
        result: MutationResult<LeadStats>,
    ) -> bool {
        if request.generation != self.generation {
            warn!("discarding superseded stats response");
            return false;
        }
        self.state = match result {
            Ok(stats) => {
                debug!(total = stats.total_leads, "stats loaded");
                StatsState::Ready(stats)
            }
            Err(err) => {
                warn!(error = %err, "stats request failed");
                StatsState::Failed(err.user_message(STATS_ERROR_TITLE))
            }
        };
        true
    }

    pub async fn refresh<C: ApiClient + ?Sized>(&mut self, client: &C) -> &StatsState {
        let request = self.begin_refresh();
        let result = fetch_lead_stats(client, request.include_multi_assignment_stats).await;
        self.complete_refresh(request, result);
        self.state()
    }

    pub fn stats(&self) -> Option<&LeadStats> {
        match &self.state {
            StatsState::Ready(stats) => Some(stats),
            _ => None,
        }
    }

    /// The four counter cards; `None` while loading or after a failure.
    pub fn cards(&self) -> Option<Vec<StatCard>> {
        let stats = self.stats()?;
        Some(vec![
            StatCard {
                title: "Total Leads",
                value: stats.total_leads,
                caption: "All time",
            },
            StatCard {
                title: "Open Leads",
                value: stats.open_leads,
                caption: "Active prospects",
            },
            StatCard {
                title: "In Progress",
                value: stats.in_progress_leads,
                caption: "Being worked on",
            },
            StatCard {
                title: "Closed Won",
                value: stats.closed_won_leads,
                caption: "Successful conversions",
            },
        ])
    }

    /// "My Leads" card; shows 0 until stats load.
    pub fn my_leads(&self) -> u64 {
        self.stats().map(|s| s.my_leads).unwrap_or(0)
    }

    /// Error banner title and hint after a failed fetch.
    pub fn error_banner(&self) -> Option<(&'static str, &'static str)> {
        matches!(self.state, StatsState::Failed(_)).then_some((STATS_ERROR_TITLE, STATS_ERROR_HINT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MutationError;

    fn user(role: &str) -> UserProfile {
        UserProfile {
            id: "u-1".into(),
            email: "neha@example.com".into(),
            first_name: "Neha".into(),
            last_name: "Kapoor".into(),
            role: Some(role.into()),
        }
    }

    #[test]
    fn test_loading_then_ready() {
        let mut dashboard = Dashboard::new(Some(user("agent")));
        assert_eq!(dashboard.welcome(), "Welcome back, Neha Kapoor!");
        assert_eq!(dashboard.refresh_label(), "Refresh");

        let request = dashboard.begin_refresh();
        assert!(!request.include_multi_assignment_stats);
        assert_eq!(dashboard.refresh_label(), "Refreshing...");
        assert!(dashboard.cards().is_none());
        assert_eq!(dashboard.my_leads(), 0);

        let stats = LeadStats {
            total_leads: 12,
            open_leads: 7,
            my_leads: 3,
            ..LeadStats::default()
        };
        assert!(dashboard.complete_refresh(request, Ok(stats)));
        let cards = dashboard.cards().unwrap_or_default();
        assert_eq!(cards.len(), 4);
        assert_eq!((cards[1].title, cards[1].value), ("Open Leads", 7));
        assert_eq!(dashboard.my_leads(), 3);
        assert_eq!(dashboard.refresh_label(), "Refresh");
    }

    #[test]
    fn test_failure_shows_banner() {
        let mut dashboard = Dashboard::new(None);
        let request = dashboard.begin_refresh();
        dashboard.complete_refresh(request, Err(MutationError::Transport("offline".into())));

        assert_eq!(
            dashboard.error_banner(),
            Some((STATS_ERROR_TITLE, STATS_ERROR_HINT))
        );
        assert!(dashboard.cards().is_none());
        assert_eq!(dashboard.welcome(), "Welcome back,  !");
    }

    #[test]
    fn test_superseded_refresh_is_discarded() {
        let mut dashboard = Dashboard::new(Some(user("admin")));
        let first = dashboard.begin_refresh();
        let second = dashboard.begin_refresh();
        assert!(second.include_multi_assignment_stats);

        assert!(!dashboard.complete_refresh(first, Ok(LeadStats::default())));
        assert!(dashboard.is_loading());
        assert!(dashboard.complete_refresh(second, Ok(LeadStats::default())));
        assert_eq!(dashboard.primary_action().0, "Manage All Leads");
    }
}
