use std::sync::Arc;

use leadgrid_runtime::{Dashboard, StatsState};
use leadgrid_testing::ScriptedApiClient;
use leadgrid_testing::fixtures::user;
use serde_json::json;

#[tokio::test]
async fn test_agent_dashboard_requests_plain_stats() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedApiClient::new().respond(
        200,
        json!({
            "total_leads": 25,
            "open_leads": 18,
            "in_progress_leads": 9,
            "closed_won_leads": 4,
            "my_leads": 6
        }),
    ));
    let mut dashboard = Dashboard::new(Some(user()));

    dashboard.refresh(client.as_ref()).await;

    assert_eq!(
        client.request_lines(),
        vec!["GET /leads/stats?include_multi_assignment_stats=false"]
    );
    let cards: Vec<(&str, u64)> = dashboard
        .cards()
        .unwrap_or_default()
        .iter()
        .map(|c| (c.title, c.value))
        .collect();
    assert_eq!(
        cards,
        vec![("Total Leads", 25), ("Open Leads", 18), ("In Progress", 9), ("Closed Won", 4)]
    );
    assert_eq!(dashboard.my_leads(), 6);
    assert_eq!(dashboard.welcome(), "Welcome back, Neha Kapoor!");
    Ok(())
}

#[tokio::test]
async fn test_admin_dashboard_includes_multi_assignment() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedApiClient::new().respond(
        200,
        json!({
            "total_leads": 3,
            "multi_assignment_stats": {
                "multi_assigned_leads": 1,
                "single_assigned_leads": 1,
                "unassigned_leads": 1
            }
        }),
    ));
    let mut admin = user();
    admin.role = Some("admin".to_string());
    let mut dashboard = Dashboard::new(Some(admin));

    dashboard.refresh(client.as_ref()).await;

    assert_eq!(
        client.request_lines(),
        vec!["GET /leads/stats?include_multi_assignment_stats=true"]
    );
    let multi = dashboard
        .stats()
        .and_then(|s| s.multi_assignment_stats.clone())
        .unwrap_or_default();
    assert_eq!(multi.unassigned_leads, 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_stats_show_error_state() {
    let client = Arc::new(ScriptedApiClient::new().respond(500, json!({ "message": "boom" })));
    let mut dashboard = Dashboard::new(Some(user()));

    let state = dashboard.refresh(client.as_ref()).await.clone();

    assert!(matches!(state, StatsState::Failed(_)));
    assert_eq!(
        dashboard.error_banner().map(|(title, _)| title),
        Some("Unable to load statistics")
    );
    assert!(dashboard.cards().is_none());
    assert_eq!(dashboard.my_leads(), 0);
    assert_eq!(dashboard.refresh_label(), "Refresh");
}
