//! Interactive ledger menu.

use crate::display;
use anyhow::{Context, Result};
use colored::Colorize;
use ledgerchain_chain::Blockchain;
use ledgerchain_core::MerkleTree;
use std::io::{self, BufRead, Write};

pub fn run() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new()?;
    menu.run(stdin.lock(), &mut stdout.lock())
}

/// Menu state: the ledger and the merkle summary of its current blocks.
pub struct Menu {
    chain: Blockchain,
    tree: MerkleTree,
}

impl Menu {
    pub fn new() -> Result<Self> {
        let chain = Blockchain::new();
        let tree = chain
            .merkle_tree()
            .context("Failed to summarize the genesis chain")?;
        Ok(Self { chain, tree })
    }

    /// Run until the operator exits or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let mut lines = input.lines();

        loop {
            writeln!(out)?;
            writeln!(out, "{}", "Ledger Menu:".bold().cyan())?;
            writeln!(out, "  1. Add Transaction")?;
            writeln!(out, "  2. View Blockchain")?;
            writeln!(out, "  3. Exit")?;

            let Some(choice) = prompt(&mut lines, out, "Enter your choice: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => {
                    if !self.add_transaction(&mut lines, out)? {
                        break;
                    }
                }
                "2" => self.view(out)?,
                "3" | "exit" => {
                    writeln!(out, "Exiting the ledger.")?;
                    break;
                }
                other => writeln!(
                    out,
                    "{} '{}'. Please enter a valid option.",
                    "Invalid choice".yellow(),
                    other
                )?,
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Returns `false` if input ended mid-prompt.
    fn add_transaction<I, W>(&mut self, lines: &mut I, out: &mut W) -> Result<bool>
    where
        I: Iterator<Item = io::Result<String>>,
        W: Write,
    {
        let Some(sender) = prompt(lines, out, "Enter sender: ")? else {
            return Ok(false);
        };
        let Some(recipient) = prompt(lines, out, "Enter recipient: ")? else {
            return Ok(false);
        };
        let Some(amount) = prompt(lines, out, "Enter amount: ")? else {
            return Ok(false);
        };

        let amount: f64 = match amount.parse() {
            Ok(amount) => amount,
            Err(_) => {
                writeln!(out, "{} '{}'.", "Invalid amount".yellow(), amount)?;
                return Ok(true);
            }
        };

        match self.chain.transfer(sender, recipient, amount) {
            Ok(block) => {
                writeln!(
                    out,
                    "{}  Transaction added in block {} ({})",
                    "✓".green().bold(),
                    block.index,
                    block.hash.short(16).bright_yellow()
                )?;
                self.tree = self.chain.merkle_tree()?;
            }
            Err(e) => writeln!(out, "{} {}", "Transaction rejected:".red().bold(), e)?,
        }

        Ok(true)
    }

    fn view<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        display::write_tree(out, &self.tree)?;
        display::write_chain(out, &self.chain)?;
        display::write_stats(out, &self.chain.stats()?)?;
        Ok(())
    }
}

fn prompt<I, W>(lines: &mut I, out: &mut W, label: &str) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    write!(out, "{label}")?;
    out.flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str) -> (Menu, String) {
        let mut menu = Menu::new().unwrap();
        let mut out = Vec::new();
        menu.run(Cursor::new(script.to_string()), &mut out).unwrap();
        (menu, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit() {
        let (_, out) = run_script("3\n");
        assert!(out.contains("Exiting the ledger."));
    }

    #[test]
    fn test_end_of_input_stops_loop() {
        let (menu, _) = run_script("");
        assert_eq!(menu.chain.len(), 1);
    }

    #[test]
    fn test_first_transaction_rejected() {
        let (menu, out) = run_script("1\nA\nB\n10\n3\n");

        assert!(out.contains("Transaction rejected:"));
        assert!(out.contains("unknown sender A"));
        assert_eq!(menu.chain.len(), 1);
    }

    #[test]
    fn test_invalid_amount_is_not_fatal() {
        let (menu, out) = run_script("1\nA\nB\nten\n3\n");

        assert!(out.contains("Invalid amount"));
        assert!(out.contains("Exiting the ledger."));
        assert_eq!(menu.chain.len(), 1);
    }

    #[test]
    fn test_unknown_choice_is_not_fatal() {
        let (_, out) = run_script("9\nexit\n");

        assert!(out.contains("Invalid choice"));
        assert!(out.contains("Exiting the ledger."));
    }

    #[test]
    fn test_view_prints_tree_and_blocks() {
        let (menu, out) = run_script("2\n3\n");

        assert!(out.contains("Merkle Tree:"));
        assert!(out.contains("Leaf"));
        assert!(out.contains("(Padding)"));
        assert!(out.contains(menu.tree.root_hash().as_str()));
        assert!(out.contains(menu.chain.tip().unwrap().hash.as_str()));
    }
}
