//! Solace - counselling chat client
//!
#![doc = "Solace - counselling chat client"]
#![doc = "Main entry point for the Solace command-line application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use solace::api::ResourceQuery;
use solace::cli::{Cli, Commands};
use solace::commands::{self, AppContext};
use solace::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let ctx = AppContext::open(config)?;

    // Execute command
    match cli.command {
        Commands::Chat { resume } => {
            tracing::info!("Starting interactive chat");
            if let Some(r) = &resume {
                tracing::debug!("Resuming conversation: {}", r);
            }
            commands::chat::run_chat(ctx, resume).await?;
        }
        Commands::Sessions { command } => {
            commands::sessions::handle_sessions(&ctx.sessions, command)?;
        }
        Commands::Resources {
            category,
            location,
            limit,
        } => {
            let query = ResourceQuery {
                category,
                location,
                limit,
            };
            commands::resources::list_resources(&ctx.client, query).await?;
        }
        Commands::Login { username, password } => {
            commands::account::login(&ctx, username, password).await?;
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            commands::account::register(&ctx, username, email, password).await?;
        }
        Commands::Logout => {
            commands::account::logout(&ctx).await?;
        }
        Commands::Whoami => {
            commands::account::whoami(&ctx).await?;
        }
        Commands::UpdateProfile { json } => {
            commands::account::update_profile(&ctx, &json).await?;
        }
        Commands::Messages { command } => {
            commands::messages::handle_messages(&ctx.client, command).await?;
        }
        Commands::Psychologists { command } => {
            commands::browse::handle_psychologists(&ctx.client, command).await?;
        }
        Commands::Orders { command } => {
            commands::browse::handle_orders(&ctx.client, command).await?;
        }
        Commands::Articles { command } => {
            commands::browse::handle_articles(&ctx.client, command).await?;
        }
        Commands::Admin { resource, command } => {
            tracing::info!("Starting admin command for {:?}", resource);
            commands::admin::handle_admin(&ctx.client, resource.into(), command).await?;
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "solace=debug" } else { "solace=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
