//! PAIN Control - drive the PAIN hooks against a server directory
//!
//! Each subcommand fires one host hook the way the server would, using the
//! file-backed host from `pain_common`.

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "painctl")]
#[command(about = "PAIN - items start unexamined, profiles only know what they carry", long_about = None)]
#[command(version)]
struct Cli {
    /// Server root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/user/mods/pain/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the pained profiles file if it is missing
    Init,

    /// Run database-load adjustment on the item and profile templates
    Catalog {
        /// Report what would change without writing templates back
        #[arg(long)]
        dry_run: bool,
    },

    /// Fire the game-mode route for a session
    GameMode {
        /// Session (profile) ID
        session_id: String,
    },

    /// Register a new account through the PAIN account hook
    Register {
        #[arg(long)]
        username: String,

        #[arg(long, default_value = "")]
        password: String,

        #[arg(long, default_value = "Standard")]
        edition: String,
    },

    /// Show pained profiles, or whether one profile is pained
    Status {
        /// Profile ID to check
        profile_id: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = commands::Context::load(cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::init(&ctx),
        Commands::Catalog { dry_run } => commands::catalog(&ctx, dry_run),
        Commands::GameMode { session_id } => commands::game_mode(&ctx, &session_id),
        Commands::Register {
            username,
            password,
            edition,
        } => commands::register(&ctx, username, password, edition),
        Commands::Status { profile_id } => commands::status(&ctx, profile_id.as_deref()),
    }
}
