use leadgrid_runtime::{DetailState, DetailTab, DetailView, HistoryNavigator, Route, TabState};
use leadgrid_testing::fixtures::base_time;
use leadgrid_testing::{CountingTabLoader, FakeLeadGateway, LeadBuilder};
use leadgrid_types::Priority;

fn gateway() -> FakeLeadGateway {
    FakeLeadGateway::new(vec![
        LeadBuilder::new("L-1")
            .name("Asha Rao")
            .priority(Priority::High)
            .notes("Prefers email • Budget approved")
            .build(),
        LeadBuilder::new("L-2").name("Ravi").build(),
    ])
}

#[tokio::test]
async fn test_open_builds_overview() -> anyhow::Result<()> {
    let mut view = DetailView::new();

    view.open("L-1", &gateway()).await;

    let overview = view.overview().ok_or_else(|| anyhow::anyhow!("no overview"))?;
    assert_eq!(overview.name, "Asha Rao");
    assert_eq!(overview.priority, "High Priority");
    assert_eq!(overview.assigned_to, "Unassigned");
    assert_eq!(overview.last_contacted, "Never");
    assert_eq!(overview.created_on, base_time().format("%Y-%m-%d").to_string());
    assert_eq!(overview.notes, vec!["Prefers email", "Budget approved"]);
    Ok(())
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let mut view = DetailView::new();

    let state = view.open("missing", &gateway()).await;

    assert_eq!(*state, DetailState::NotFound);
}

#[tokio::test]
async fn test_tabs_load_once_per_entity() {
    let gateway = gateway();
    let loader = CountingTabLoader::new();
    let mut view = DetailView::new();
    view.open("L-1", &gateway).await;

    let first = view.select_tab(DetailTab::Notes, &loader).await;
    view.select_tab(DetailTab::Tasks, &loader).await;
    view.select_tab(DetailTab::Notes, &loader).await;

    assert!(matches!(first, TabState::Ready(_)));
    assert_eq!(loader.count(), 2);
    assert_eq!(view.active_tab(), DetailTab::Notes);

    view.open("L-2", &gateway).await;
    assert_eq!(view.active_tab(), DetailTab::Tasks);
    assert_eq!(view.tab_state(DetailTab::Notes), TabState::Idle);
    view.select_tab(DetailTab::Notes, &loader).await;
    assert_eq!(loader.count(), 3);
    assert_eq!(loader.loads()[2], (DetailTab::Notes, "L-2".to_string()));
}

#[tokio::test]
async fn test_activity_tab_is_placeholder() {
    let loader = CountingTabLoader::new();
    let mut view = DetailView::new();
    view.open("L-1", &gateway()).await;

    let state = view.select_tab(DetailTab::Activity, &loader).await;

    assert_eq!(state, TabState::ComingSoon);
    assert_eq!(loader.count(), 0);
}

#[tokio::test]
async fn test_late_tab_response_for_previous_entity_is_discarded() -> anyhow::Result<()> {
    let gateway = gateway();
    let mut view = DetailView::new();
    view.open("L-1", &gateway).await;

    let request = view
        .begin_tab(DetailTab::Documents)
        .ok_or_else(|| anyhow::anyhow!("expected a load request"))?;
    view.open("L-2", &gateway).await;

    assert!(!view.complete_tab(request, Ok(serde_json::json!([]))));
    assert_eq!(view.tab_state(DetailTab::Documents), TabState::Idle);
    Ok(())
}

#[test]
fn test_back_to_list_navigates_home() {
    let navigator = HistoryNavigator::new("/my-leads/L-1");

    DetailView::new().back_to_list(&navigator);

    assert_eq!(navigator.current_route(), Some(Route::MyLeads));
}
