//! Show the genesis block.

use crate::display;
use anyhow::{Context, Result};
use colored::Colorize;
use ledgerchain_chain::Blockchain;
use std::io::{self, Write};

pub fn run() -> Result<()> {
    let chain = Blockchain::new();
    let genesis = chain.tip().context("Chain has no genesis block")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "{}", "Genesis Block:".bold().cyan())?;
    display::write_block(&mut out, genesis)?;
    out.flush()?;
    Ok(())
}
