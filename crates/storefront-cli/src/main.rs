//! Storefront admin CLI.
//!
//! Operator access to the user administration core from a terminal.

mod commands;
mod presenter;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront admin - user profiles, orders and accounts", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory containing storefront.yaml (defaults plus STOREFRONT_* env vars if omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full profile of a user (profile, addresses, activity, stats, security)
    Profile {
        /// User id
        id: String,
    },

    /// Show the complete order history of a user
    History {
        /// User id
        id: String,
    },

    /// List users
    Users {
        /// Only users with this role id
        #[arg(long)]
        role: Option<String>,
    },

    /// Delete a user after confirmation
    Delete {
        /// User id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = commands::App::build(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Profile { id } => app.profile(&id).await,
        Commands::History { id } => app.history(&id).await,
        Commands::Users { role } => app.users(role.as_deref()).await,
        Commands::Delete { id, yes } => app.delete(&id, yes).await,
    };

    let ended = app.end_session().await;
    result.and(ended)
}
