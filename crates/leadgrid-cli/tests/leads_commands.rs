//! End-to-end tests of the `leads` commands against a JSON data directory.

use anyhow::Result;
use assert_cmd::Command;
use leadgrid_testing::TestWorld;
use predicates::prelude::*;

fn leadgrid(world: &TestWorld) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("leadgrid");
    world.configure_command(&mut cmd);
    cmd
}

#[test]
fn test_list_shows_first_page() -> Result<()> {
    let world = TestWorld::new()?.with_leads(25)?;

    leadgrid(&world)
        .args(["leads", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lead 10"))
        .stdout(predicate::str::contains("Lead 11").not())
        .stdout(predicate::str::contains("Counselling"))
        .stdout(predicate::str::contains("0 of 25 row(s) selected. Page 1 of 3"));
    Ok(())
}

#[test]
fn test_list_filters_and_pages() -> Result<()> {
    let world = TestWorld::new()?.with_leads(25)?;

    leadgrid(&world)
        .args(["leads", "list", "--stage", "closed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Filters: Stage: Closed"))
        .stdout(predicate::str::contains("0 of 6 row(s) selected. Page 1 of 1"));

    leadgrid(&world)
        .args(["leads", "list", "--page", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lead 25"))
        .stdout(predicate::str::contains("Page 3 of 3"));

    leadgrid(&world)
        .args(["leads", "list", "--search", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No leads match your filters."));
    Ok(())
}

#[test]
fn test_list_json_sorted() -> Result<()> {
    let world = TestWorld::new()?.with_leads(25)?;

    let output = assert_cmd::cargo::cargo_bin_cmd!("leadgrid")
        .arg("--data-dir")
        .arg(world.data_dir())
        .args(["--format", "json", "leads", "list", "--sort", "name:desc"])
        .output()?;

    assert!(output.status.success());
    let view: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(view["rows"][0]["row_id"], "lead-9");
    assert_eq!(view["pagination"]["total_rows"], 25);
    let name_header = view["headers"]
        .as_array()
        .and_then(|headers| headers.iter().find(|h| h["column_id"] == "name"))
        .cloned()
        .unwrap_or_default();
    assert_eq!(name_header["sort"], "descending");
    Ok(())
}

#[test]
fn test_set_stage_updates_file_and_notifies() -> Result<()> {
    let world = TestWorld::new()?.with_leads(5)?;

    leadgrid(&world)
        .args(["leads", "set-stage", "lead-1", "closed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Lead 1's stage updated to \"Closed\"",
        ));

    let leads = world.read_leads()?;
    let lead = leads.iter().find(|l| l.id == "lead-1");
    assert_eq!(lead.map(|l| l.stage.as_str()), Some("closed"));
    Ok(())
}

#[test]
fn test_set_stage_to_current_value_is_a_no_op() -> Result<()> {
    let world = TestWorld::new()?.with_leads(3)?;
    let before = std::fs::read_to_string(world.leads_file())?;

    leadgrid(&world)
        .args(["leads", "set-stage", "lead-1", "initial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage is already \"initial\""))
        .stdout(predicate::str::contains("updated").not());

    assert_eq!(std::fs::read_to_string(world.leads_file())?, before);
    Ok(())
}

#[test]
fn test_rejected_stage_reports_failure() -> Result<()> {
    let world = TestWorld::new()?.with_leads(3)?;

    leadgrid(&world)
        .args(["leads", "set-stage", "lead-2", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to update Lead 2's stage: Unknown stage \"bogus\"",
        ));

    let leads = world.read_leads()?;
    assert_eq!(leads[1].stage, "contacted");
    Ok(())
}

#[test]
fn test_delete_requires_confirmation() -> Result<()> {
    let world = TestWorld::new()?.with_leads(4)?;

    leadgrid(&world)
        .args(["leads", "delete", "lead-2"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
    assert_eq!(world.read_leads()?.len(), 4);

    leadgrid(&world)
        .args(["leads", "delete", "lead-2", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Lead \"Lead 2\" has been deleted successfully.",
        ));
    let ids: Vec<String> = world.read_leads()?.into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec!["lead-1", "lead-3", "lead-4"]);
    Ok(())
}

#[test]
fn test_export_writes_csv() -> Result<()> {
    let world = TestWorld::new()?.with_leads(12)?;
    let out = world.temp_dir().join("out.csv");

    leadgrid(&world)
        .args(["leads", "export", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 12 leads"));

    let mut reader = csv::Reader::from_path(&out)?;
    let headers = reader.headers()?.clone();
    assert_eq!(headers.get(0), Some("id"));
    assert_eq!(headers.get(1), Some("name"));
    assert_eq!(reader.records().count(), 12);
    Ok(())
}

#[test]
fn test_export_defaults_to_title_file_name() -> Result<()> {
    let world = TestWorld::new()?.with_leads(2)?;

    leadgrid(&world).args(["leads", "export"]).assert().success();

    assert!(world.temp_dir().join("leads_export.csv").exists());
    Ok(())
}

#[test]
fn test_show_renders_overview() -> Result<()> {
    let world = TestWorld::new()?.with_leads(3)?;

    leadgrid(&world)
        .args(["leads", "show", "lead-3", "--tab", "activity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lead 3"))
        .stdout(predicate::str::contains("Medium Priority"))
        .stdout(predicate::str::contains("Never"))
        .stdout(predicate::str::contains("Coming soon"));

    leadgrid(&world)
        .args(["leads", "show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Lead not found: missing"));
    Ok(())
}

#[test]
fn test_missing_leads_file_is_an_error() -> Result<()> {
    let world = TestWorld::new()?;

    leadgrid(&world)
        .args(["leads", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    Ok(())
}
