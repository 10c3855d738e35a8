//! Isolated data directory for CLI integration tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assert_cmd::Command;
use leadgrid_runtime::FileSessionStorage;
use leadgrid_runtime::session;
use leadgrid_types::{ClassificationOption, Department, Lead, UserProfile};
use tempfile::TempDir;

use crate::fixtures;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use leadgrid_testing::TestWorld;
///
/// let world = TestWorld::new().unwrap().with_leads(3).unwrap();
/// assert!(world.leads_file().exists());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
}

impl TestWorld {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let data_dir = temp_dir.path().join(".leadgrid");
        std::fs::create_dir_all(&data_dir).context("Failed to create data dir")?;
        Ok(Self { temp_dir, data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn leads_file(&self) -> PathBuf {
        self.data_dir.join("leads.json")
    }

    /// Seed `count` fixture leads plus the default stage and status options.
    pub fn with_leads(self, count: usize) -> Result<Self> {
        self.write_leads(&fixtures::leads(count))?;
        self.write_options("stages.json", &fixtures::stage_options())?;
        self.write_options("statuses.json", &fixtures::status_options())?;
        Ok(self)
    }

    pub fn with_departments(self) -> Result<Self> {
        self.write_json("departments.json", &fixtures::departments())?;
        Ok(self)
    }

    /// Persist a signed-in session for `user` in the data directory.
    pub fn with_session(self, user: &UserProfile) -> Result<Self> {
        session::persist(&FileSessionStorage::in_dir(&self.data_dir), "test-token", user)
            .context("Failed to write session")?;
        Ok(self)
    }

    pub fn write_leads(&self, leads: &[Lead]) -> Result<()> {
        self.write_json("leads.json", leads)
    }

    pub fn read_leads(&self) -> Result<Vec<Lead>> {
        let text = std::fs::read_to_string(self.leads_file())?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn read_departments(&self) -> Result<Vec<Department>> {
        let text = std::fs::read_to_string(self.data_dir.join("departments.json"))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_options(&self, name: &str, options: &[ClassificationOption]) -> Result<()> {
        self.write_json(name, options)
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        std::fs::write(self.data_dir.join(name), text)
            .with_context(|| format!("Failed to write {}", name))
    }

    /// Configure a CLI command with this world's data directory and plain output.
    ///
    /// The caller provides the base command, e.g. `cargo_bin_cmd!("leadgrid")`.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir")
            .arg(&self.data_dir)
            .arg("--format")
            .arg("plain")
            .current_dir(self.temp_dir.path())
            .env_remove("LEADGRID_PATH")
    }
}
