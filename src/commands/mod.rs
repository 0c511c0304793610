// Entry points for each subcommand

pub mod config;
pub mod launch;
pub mod pack;
pub mod update;
