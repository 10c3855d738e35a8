use anyhow::Result;
use assert_cmd::Command;
use leadgrid_testing::fixtures::user;
use leadgrid_testing::{LeadBuilder, TestWorld};
use predicates::prelude::*;

fn leadgrid(world: &TestWorld) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("leadgrid");
    world.configure_command(&mut cmd);
    cmd
}

fn seeded_world() -> Result<TestWorld> {
    let world = TestWorld::new()?;
    world.write_leads(&[
        LeadBuilder::new("L-1")
            .stage("contacted")
            .assigned_to("neha@example.com")
            .build(),
        LeadBuilder::new("L-2").stage("initial").build(),
        LeadBuilder::new("L-3")
            .stage("closed")
            .status("converted")
            .assigned_to("neha@example.com")
            .build(),
        LeadBuilder::new("L-4")
            .stage("counselling")
            .assigned_to("ravi@example.com")
            .build(),
    ])?;
    Ok(world)
}

#[test]
fn test_dashboard_shows_counters_for_session_user() -> Result<()> {
    let world = seeded_world()?.with_session(&user())?;

    leadgrid(&world)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, Neha Kapoor!"))
        .stdout(predicate::str::contains("4  All time"))
        .stdout(predicate::str::contains("3  Active prospects"))
        .stdout(predicate::str::contains("2  Being worked on"))
        .stdout(predicate::str::contains("1  Successful conversions"))
        .stdout(predicate::str::contains("My Leads: 2"))
        .stdout(predicate::str::contains("Multi-assigned").not())
        .stdout(predicate::str::contains("View My Leads"));
    Ok(())
}

#[test]
fn test_admin_dashboard_json_has_multi_assignment() -> Result<()> {
    let mut admin = user();
    admin.role = Some("admin".to_string());
    let world = seeded_world()?.with_session(&admin)?;

    let output = assert_cmd::cargo::cargo_bin_cmd!("leadgrid")
        .arg("--data-dir")
        .arg(world.data_dir())
        .args(["--format", "json", "dashboard"])
        .output()?;
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(summary["stats"]["state"], "ready");
    let stats = &summary["stats"]["data"];
    assert_eq!(stats["total_leads"], 4);
    assert_eq!(stats["multi_assignment_stats"]["single_assigned_leads"], 3);
    assert_eq!(stats["multi_assignment_stats"]["unassigned_leads"], 1);
    Ok(())
}

#[test]
fn test_dashboard_without_leads_file_fails() -> Result<()> {
    let world = TestWorld::new()?;

    leadgrid(&world)
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to load statistics"));
    Ok(())
}
