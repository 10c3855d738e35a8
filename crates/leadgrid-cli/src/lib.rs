mod args;
mod backend;
mod commands;
mod console;
mod handlers;

pub use args::{Cli, Commands, ConfigCommand, DepartmentsCommand, LeadsCommand};
pub use backend::FileApiClient;
pub use commands::run;
