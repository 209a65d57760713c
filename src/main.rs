//! crossroads - terminal game driver

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossroads::auth::{AccountStore, Identity};
use crossroads::items::Catalog;
use crossroads::persistence::SaveStore;
use crossroads::{Command, Config, Game, GameEvent};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  new <warrior|mage> [name]   start a new character
  explore (e)                 look around
  attack (a), block (b), flee (f)
  drink <potion name>         drink a potion
  use <n>                     use or equip inventory item n
  status, inventory (i), enemy
  save, load
  help, quit";

/// Crossroads text RPG
#[derive(Parser, Debug)]
#[command(name = "crossroads", version, about = "Play the crossroads text RPG")]
struct Args {
    /// Config file (default: crossroads.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account to play as; omit to play as guest
    #[arg(short, long)]
    user: Option<String>,

    /// Create the account before playing
    #[arg(long, requires = "user")]
    register: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let identity = match &args.user {
        Some(username) => sign_in(&config, username, args.register)?,
        None => Identity::new("guest", "guest"),
    };
    info!("Playing as {}", identity.username);

    let sink = |event: GameEvent| println!("{}", event.text());
    let mut game = Game::new(
        Arc::new(Catalog::standard()),
        SaveStore::new(&config.save_dir),
        identity,
        Box::new(sink),
    )
    .with_location(&config.start_location);
    if let Some(seed) = config.seed {
        game = game.with_seed(seed);
    }

    println!("{}", HELP);
    println!("{}", game.location());
    repl(&mut game)
}

/// Register or log in; the password comes from CROSSROADS_PASSWORD or stdin
fn sign_in(config: &Config, username: &str, register: bool) -> Result<Identity> {
    let mut accounts = AccountStore::open(&config.accounts_file)
        .with_context(|| format!("Failed to open {}", config.accounts_file.display()))?;

    if !register && accounts.authenticate(username).is_none() {
        bail!("Unknown user {}; run with --register to create it", username);
    }

    let password = match std::env::var("CROSSROADS_PASSWORD") {
        Ok(password) => password,
        Err(_) => prompt("Password: ")?,
    };

    let identity = if register {
        accounts.register(username, &password)?
    } else {
        accounts.login(username, &password)?
    };
    Ok(identity)
}

fn prompt(text: &str) -> Result<String> {
    print!("{}", text);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn repl(game: &mut Game) -> Result<()> {
    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim().to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "help" | "?" => println!("{}", HELP),
            "status" => match game.player_status() {
                Some(status) => println!("{}", status),
                None => println!("No character. Try: new warrior"),
            },
            "inventory" | "i" => {
                let listing = game.inventory_listing();
                if listing.is_empty() {
                    println!("Your inventory is empty.");
                }
                for entry in listing {
                    println!("{}", entry);
                }
            }
            "enemy" => match game.enemy_status() {
                Some(enemy) => println!("{}", enemy),
                None => println!("You are not fighting anything."),
            },
            "" => {}
            _ => match line.parse::<Command>() {
                // failures are already reported through the sink
                Ok(command) => {
                    let _ = game.execute(command);
                }
                Err(e) => println!("! {}", e),
            },
        }
        print!("> ");
        io::stdout().flush()?;
    }

    info!("Goodbye");
    Ok(())
}
