use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;
mod console;

use bootstrap::Bootstrap;

#[derive(Parser)]
#[command(name = "pitchdesk")]
#[command(about = "Pitchdesk - outreach texts and channel radar for freelancers", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/pitchdesk/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local user identifier
    #[arg(long, global = true, default_value = "local")]
    user: String,

    /// Keep all data in memory for this run
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console: compose messages and browse the radar
    Chat,
    /// Search channels and add them to the catalog
    Search {
        /// Free-text query
        #[arg(required = true)]
        query: Vec<String>,
        /// Maximum number of channels to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Paraphrase a text, optionally for a known channel
    Rewrite {
        text: String,
        /// Number of variants to produce
        #[arg(long, default_value_t = 1)]
        variants: usize,
        /// Target channel username from the catalog
        #[arg(long)]
        channel: Option<String>,
    },
    /// Show or edit the local profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the profile and search keywords
    Show,
    /// Update profile fields; omitted fields stay unchanged
    Set {
        #[arg(long)]
        name: Option<String>,
        /// Comma-separated list
        #[arg(long)]
        specializations: Option<String>,
        #[arg(long)]
        services: Option<String>,
        /// Comma-separated radar keywords
        #[arg(long)]
        keywords: Option<String>,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pitchdesk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let app = Bootstrap::load(cli.config, cli.in_memory)?;

    match cli.command {
        Commands::Chat => commands::chat::run(&app, &cli.user).await?,
        Commands::Search { query, limit } => {
            commands::search::run(&app, &query.join(" "), limit).await?
        }
        Commands::Rewrite {
            text,
            variants,
            channel,
        } => commands::rewrite::run(&app, &text, variants, channel.as_deref()).await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&app, &cli.user).await?,
            ProfileAction::Set {
                name,
                specializations,
                services,
                keywords,
            } => {
                commands::profile::set(
                    &app,
                    &cli.user,
                    commands::profile::ProfileEdit {
                        name,
                        specializations,
                        services,
                        keywords,
                    },
                )
                .await?
            }
        },
    }

    Ok(())
}
