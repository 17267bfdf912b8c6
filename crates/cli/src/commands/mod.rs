//! CLI commands module.

use anyhow::Result;
use clap::Subcommand;

mod genesis;
mod menu;

#[derive(Subcommand, Default)]
pub enum Commands {
    /// Interactive ledger menu
    #[default]
    Menu,
    /// Show the genesis block
    Genesis,
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Menu => menu::run(),
        Commands::Genesis => genesis::run(),
    }
}
