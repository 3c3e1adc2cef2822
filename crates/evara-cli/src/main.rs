//! Evara CLI - wedding planning lists and the planning assistant from the terminal

mod cli;
mod commands;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::ask::run_ask;
use crate::commands::common::AppContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::events::run_events;
use crate::commands::guests::run_guests;
use crate::commands::sync::run_sync;
use crate::commands::tasks::run_tasks;
use crate::commands::vendors::run_vendors;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    // Completions must work even when the config file is broken
    if let Commands::Completions { shell, output } = &command {
        return run_completions(*shell, output.as_deref());
    }

    let ctx = AppContext::resolve(cli.db_path, cli.config)?;
    dispatch(command, &ctx).await
}

async fn dispatch(command: Commands, ctx: &AppContext) -> Result<(), CliError> {
    match command {
        Commands::Guests { command } => run_guests(command, ctx).await,
        Commands::Vendors { command } => run_vendors(command, ctx).await,
        Commands::Tasks { command } => run_tasks(command, ctx).await,
        Commands::Events { command } => run_events(command, ctx).await,
        Commands::Ask { question } => run_ask(&question, ctx).await,
        Commands::Sync => run_sync(ctx).await,
        Commands::Config { command } => run_config(command, ctx),
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}

fn log_filter() -> EnvFilter {
    ["evara_core=info", "evara_cli=info"]
        .into_iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive)
}
