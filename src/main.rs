mod cli;
mod commands;
mod config;
mod constants;
mod fetch;
mod hash;
mod http;
mod install;
mod orchestrator;
mod packager;
mod patch;
mod prompt;
mod ui;
mod version;

#[cfg(test)]
mod test_support;

use clap::Parser;
use cli::{Cli, Commands};
use log::debug;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Usage errors exit 1; --help and --version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            ui::error(&format!("Fatal error: {:#}", e));
            debug!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Pack { source, output } => commands::pack::pack(&source, &output),
        Commands::Update { root } => commands::update::update(root).await,
        Commands::Launch { yes } => commands::launch::launch(yes).await,
        Commands::Config { action } => {
            commands::config::config(action)?;
            Ok(true)
        }
    }
}
