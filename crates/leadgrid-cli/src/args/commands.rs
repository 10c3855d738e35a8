use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show lead statistics for the signed-in user")]
    Dashboard,

    #[command(about = "Browse and edit leads")]
    Leads {
        /// Leads JSON file (defaults to <data-dir>/leads.json)
        #[arg(long, global = true)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        command: LeadsCommand,
    },

    #[command(about = "Manage departments")]
    Departments {
        #[command(subcommand)]
        command: DepartmentsCommand,
    },

    #[command(about = "Manage leadgrid configuration")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// Search text matched against text columns
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub stage: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub source: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    /// Sort directive: `column` or `column:asc|desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// 1-based page number
    #[arg(long, default_value = "1")]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,

    /// Hide a column (repeatable)
    #[arg(long = "hide")]
    pub hidden: Vec<String>,
}

#[derive(Subcommand)]
pub enum LeadsCommand {
    #[command(about = "Show one page of the leads table")]
    List {
        #[command(flatten)]
        grid: GridArgs,
    },

    #[command(about = "Export every lead to CSV")]
    Export {
        /// Output path (defaults to `<title>_export.csv` in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    #[command(about = "Show the detail overview of a lead")]
    Show {
        id: String,

        /// Also load a detail tab (timeline, tasks, notes, documents, activity, contacts)
        #[arg(long)]
        tab: Option<String>,
    },

    #[command(about = "Change the stage of a lead")]
    SetStage { id: String, stage: String },

    #[command(about = "Change the status of a lead")]
    SetStatus { id: String, status: String },

    #[command(about = "Delete a lead")]
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DepartmentsCommand {
    #[command(about = "List departments with counts")]
    List {
        /// Search text matched against name, description and type
        #[arg(long)]
        search: Option<String>,

        /// Sort directive: `column` or `column:asc|desc`
        #[arg(long)]
        sort: Option<String>,

        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: usize,
    },

    #[command(about = "Export every department to CSV")]
    Export {
        /// Output path (defaults to `departments_export.csv` in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    #[command(about = "Create a department")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        inactive: bool,
    },

    #[command(about = "Delete a custom department")]
    Delete {
        id: String,

        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Write a default config.toml")]
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    #[command(about = "Print the effective configuration")]
    Show,
}
