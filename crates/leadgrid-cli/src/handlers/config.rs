use std::path::Path;

use anyhow::Result;
use leadgrid_runtime::Config;

use crate::console::Console;

pub fn init(config_path: &Path, force: bool, console: &Console) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }
    Config::default().save_to(config_path)?;
    console.line(&format!("Wrote {}", config_path.display()));
    Ok(())
}

pub fn show(config_path: &Path, console: &Console) -> Result<()> {
    let config = Config::load_from(config_path)?;
    if console.is_json() {
        return console.json(&config);
    }
    console.line(&format!("# {}", config_path.display()));
    console.line(toml::to_string_pretty(&config)?.trim_end());
    Ok(())
}
