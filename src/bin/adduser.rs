//! crossroads_adduser - account provisioning tool
//!
//! Adds a player account to the accounts file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossroads::auth::AccountStore;
use crossroads::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crossroads account tool
#[derive(Parser, Debug)]
#[command(
    name = "crossroads_adduser",
    version,
    about = "Add a player account for crossroads"
)]
struct Args {
    /// Username to create
    username: String,

    /// Accounts file (overrides the config)
    #[arg(short, long)]
    accounts: Option<PathBuf>,

    /// Config file (default: crossroads.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crossroads=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let path = args.accounts.unwrap_or(config.accounts_file);

    let password = std::env::var("CROSSROADS_PASSWORD")
        .map_err(|_| anyhow::anyhow!("CROSSROADS_PASSWORD environment variable is required"))?;

    let mut accounts = AccountStore::open(&path)?;
    let identity = accounts.register(&args.username, &password)?;
    info!(
        "Created account {} ({}) in {}",
        identity.username,
        identity.id,
        path.display()
    );

    Ok(())
}
