use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ticketeer::cmd::config::{self as config_cmd, ConfigArgs};
use ticketeer::cmd::project::{self as project_cmd, ProjectArgs};
use ticketeer::cmd::search::{self as search_cmd, AssignArgs, SearchArgs, UsersArgs};
use ticketeer::cmd::ticket::{self as ticket_cmd, CreateArgs};
use ticketeer::config::AppConfig;
use ticketeer::context::AppContext;
use ticketeer::error::AppResult;
use ticketeer::infra::jira::JiraClient;
use ticketeer::infra::llm::OpenAiClient;
use ticketeer::infra::recent_store::FileRecentStore;

#[derive(Parser)]
#[command(name = "ticketeer", author, version, about = "Jira tickets from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search tickets by text, assignee and project.
    Search(SearchArgs),
    /// Draft a ticket from a rough description and create it.
    Create(CreateArgs),
    /// List projects, most recently opened first.
    Projects(ProjectArgs),
    /// Change or clear the assignee of a ticket.
    Assign(AssignArgs),
    /// List users, optionally only those assignable in a project.
    Users(UsersArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        command => {
            let context = build_context()?;
            dispatch(&context, command).await
        }
    }
}

async fn dispatch(context: &AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Search(args) => search_cmd::run(context, args).await,
        Commands::Assign(args) => search_cmd::run_assign(context, args).await,
        Commands::Users(args) => search_cmd::run_users(context, args).await,
        Commands::Projects(args) => project_cmd::run(context, args).await,
        Commands::Create(args) => {
            let ticket = ticket_cmd::run(context, args).await?;
            println!("Ticket {} created.", ticket.key);
            if let Some(url) = &ticket.url {
                println!("View ticket: {url}");
            }
            Ok(())
        }
        Commands::Config(args) => config_cmd::run(args.command),
    }
}

fn build_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;

    for setting in config.missing_settings() {
        tracing::warn!("{setting} not configured; run `ticketeer config init`");
    }

    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_domain.clone(),
        config.jira_email.clone(),
        config.jira_token.clone(),
    ));
    let language_model = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    let recent = Arc::new(FileRecentStore::load()?);

    Ok(AppContext::new(config, issue_tracker, language_model, recent))
}
