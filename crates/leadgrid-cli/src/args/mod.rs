// Commands are namespaced by screen: `dashboard`, `leads`, `departments`, `config`.

mod commands;
mod enums;

pub use commands::*;
pub use enums::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "leadgrid")]
#[command(about = "Browse, filter, export and edit leads", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to $LEADGRID_PATH, then the XDG data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}
