use leadgrid_runtime::departments::validate;
use leadgrid_runtime::{
    CreateOutcome, DeleteOutcome, DepartmentAdmin, MutationError, NotificationKind,
};
use leadgrid_testing::assertions::assert_single_notification;
use leadgrid_testing::fixtures::departments;
use leadgrid_testing::{FakeDepartmentGateway, FixedConfirmer, RecordingRelay};
use leadgrid_types::DepartmentDraft;

fn draft(name: &str, description: &str) -> DepartmentDraft {
    DepartmentDraft {
        name: name.to_string(),
        description: description.to_string(),
        is_active: true,
    }
}

fn admin() -> DepartmentAdmin {
    let mut admin = DepartmentAdmin::new();
    admin.load(departments());
    admin
}

#[test]
fn test_validate_requires_name_and_description() {
    let errors = validate(&draft("  ", ""));
    assert_eq!(errors.get("name"), Some(&"Department name is required"));
    assert_eq!(errors.get("description"), Some(&"Description is required"));
    assert!(validate(&draft("Visa", "Visa desk")).is_empty());
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_gateway() {
    let mut admin = admin();
    let gateway = FakeDepartmentGateway::new(departments());
    let relay = RecordingRelay::new();

    let outcome = admin.create(draft("", "Visa desk"), &gateway, &relay).await;

    assert!(matches!(outcome, CreateOutcome::Invalid(_)));
    assert_eq!(gateway.calls(), 0);
    assert_eq!(
        relay.last().and_then(|n| n.title).as_deref(),
        Some("Validation Error")
    );
}

#[tokio::test]
async fn test_create_trims_and_inserts() -> anyhow::Result<()> {
    let mut admin = admin();
    let gateway = FakeDepartmentGateway::new(departments());
    let relay = RecordingRelay::new();

    let outcome = admin
        .create(draft("  Alumni ", " Alumni relations "), &gateway, &relay)
        .await;

    let CreateOutcome::Created(created) = outcome else {
        anyhow::bail!("expected a created department, got {:?}", outcome);
    };
    assert_eq!(created.name, "Alumni");
    assert_eq!(created.description, "Alumni relations");
    assert_eq!(admin.departments()[0].name, "Alumni");
    assert_eq!(admin.summary().custom_count, 2);
    assert_single_notification(
        &relay.notifications(),
        NotificationKind::Success,
        "Department \"Alumni\" created successfully!",
    )
}

#[tokio::test]
async fn test_predefined_department_is_not_deleted() {
    let mut admin = admin();
    let gateway = FakeDepartmentGateway::new(departments());
    let relay = RecordingRelay::new();
    let confirmer = FixedConfirmer::accepting();
    let predefined = departments()[0].clone();

    let outcome = admin.delete(&predefined, &confirmer, &gateway, &relay).await;

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert!(confirmer.asked().is_empty());
    assert_eq!(gateway.calls(), 0);
    assert_eq!(relay.len(), 1);
}

#[tokio::test]
async fn test_delete_failure_keeps_row() -> anyhow::Result<()> {
    let mut admin = admin();
    let gateway = FakeDepartmentGateway::new(departments()).failing(MutationError::NotFound);
    let relay = RecordingRelay::new();
    let custom = departments()[2].clone();

    let outcome = admin
        .delete(&custom, &FixedConfirmer::accepting(), &gateway, &relay)
        .await;

    assert!(matches!(outcome, DeleteOutcome::Failed(_)));
    assert_eq!(admin.departments().len(), 3);
    assert_single_notification(
        &relay.notifications(),
        NotificationKind::Error,
        "Failed to delete department. Please try again.",
    )
}
