// src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::config::Settings;

pub mod args;
pub mod commands;
pub mod error;

pub fn execute_command(cli: Cli, settings: &Settings) -> CliResult<()> {
    match cli.command {
        Some(Commands::Serve { bind }) => commands::serve(settings, bind),
        Some(Commands::Import {
            path,
            user,
            server,
            dry_run,
        }) => commands::import(settings, &path, user, server.as_deref(), dry_run),
        Some(Commands::List {
            category,
            user,
            is_json,
        }) => commands::list(settings, category.as_deref(), user, is_json),
        Some(Commands::Categories) => commands::categories(settings),
        Some(Commands::Open { id }) => commands::open(settings, id),
        Some(Commands::CreateDb { path }) => commands::create_db(&path),
        Some(Commands::Config) => commands::show_config(),
        None => Ok(()),
    }
}
