// CLI module for handling command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pslauncher", version)]
#[command(about = "Patch packager, updater and launcher for a private WotLK server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack the .dbc files in a directory into an MPQ patch archive
    Pack {
        /// Directory containing .dbc files
        source: PathBuf,
        /// Archive to create, e.g. patches/patch-Z.MPQ
        output: PathBuf,
    },
    /// Download the latest patch if the server has a newer version
    Update {
        /// Client directory to update (defaults to wow_path from the config)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Install if needed, check files, update the patch and start the game
    Launch {
        /// Answer yes to every prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or edit launcher_config.json
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Set one key, e.g. `config set wow_path D:/Games/WoW`
    Set { key: String, value: String },
}
