use std::path::PathBuf;

use anyhow::Result;
use leadgrid_runtime::session;
use leadgrid_runtime::{Config, FileSessionStorage, resolve_data_dir};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands, ConfigCommand, DepartmentsCommand, LeadsCommand, LogLevel};
use crate::backend::FileApiClient;
use crate::console::Console;
use crate::handlers::{self, HandlerContext};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let config_path = data_dir.join("config.toml");
    let console = Console::new(cli.format);

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommand::Init { force } => handlers::config::init(&config_path, force, &console),
            ConfigCommand::Show => handlers::config::show(&config_path, &console),
        },

        Commands::Dashboard => {
            let leads_path = data_dir.join("leads.json");
            let ctx = context(&config_path, leads_path, data_dir, console)?;
            handlers::dashboard::handle(&ctx)
        }

        Commands::Leads { file, command } => {
            let leads_path = file.unwrap_or_else(|| data_dir.join("leads.json"));
            let ctx = context(&config_path, leads_path, data_dir, console)?;

            match command {
                LeadsCommand::List { grid } => handlers::leads_list::handle(&ctx, &grid),
                LeadsCommand::Export { out } => handlers::leads_export::handle(&ctx, out),
                LeadsCommand::Show { id, tab } => {
                    handlers::leads_show::handle(&ctx, &id, tab.as_deref())
                }
                LeadsCommand::SetStage { id, stage } => handlers::leads_update::handle(
                    &ctx,
                    &id,
                    leadgrid_types::Classification::Stage,
                    &stage,
                ),
                LeadsCommand::SetStatus { id, status } => handlers::leads_update::handle(
                    &ctx,
                    &id,
                    leadgrid_types::Classification::Status,
                    &status,
                ),
                LeadsCommand::Delete { id, yes } => handlers::leads_delete::handle(&ctx, &id, yes),
            }
        }

        Commands::Departments { command } => {
            let leads_path = data_dir.join("leads.json");
            let ctx = context(&config_path, leads_path, data_dir, console)?;

            match command {
                DepartmentsCommand::List { search, sort, page } => {
                    handlers::departments::list(&ctx, search, sort, page)
                }
                DepartmentsCommand::Export { out } => handlers::departments::export(&ctx, out),
                DepartmentsCommand::Create {
                    name,
                    description,
                    inactive,
                } => handlers::departments::create(&ctx, name, description, !inactive),
                DepartmentsCommand::Delete { id, yes } => {
                    handlers::departments::delete(&ctx, &id, yes)
                }
            }
        }
    }
}

fn context(
    config_path: &std::path::Path,
    leads_path: PathBuf,
    data_dir: PathBuf,
    console: Console,
) -> Result<HandlerContext> {
    let config = Config::load_from(config_path)?;
    let auth = session::hydrate(&FileSessionStorage::in_dir(&data_dir));
    let client = FileApiClient::new(leads_path, data_dir)
        .with_user_email(auth.user.as_ref().map(|u| u.email.clone()));
    HandlerContext::new(config, client, auth.user, console)
}

fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    // A subscriber may already be installed when running in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
