//! Console rendering of blocks and merkle trees.

use colored::Colorize;
use ledgerchain_chain::BlockchainStats;
use ledgerchain_core::{Block, MerkleTree, Transaction};
use std::io::{self, Write};

pub fn write_block<W: Write>(out: &mut W, block: &Block) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  Index:         {}", block.index.to_string().bright_cyan())?;
    writeln!(out, "  Hash:          {}", block.hash.as_str().bright_yellow())?;
    writeln!(
        out,
        "  Previous Hash: {}",
        block.previous_hash.as_str().bright_black()
    )?;
    writeln!(
        out,
        "  Timestamp:     {}",
        block.timestamp.to_string().bright_black()
    )?;
    writeln!(out, "  Transactions:")?;
    write_transactions(out, &block.transactions, "    ")
}

pub fn write_chain<'a, W, I>(out: &mut W, blocks: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Block>,
{
    writeln!(out, "{}", "Blocks:".bold().cyan())?;
    for block in blocks {
        write_block(out, block)?;
    }
    writeln!(out)
}

/// Pre-order dump: inner nodes list their children's linkage hashes,
/// leaves are marked as such, and padding copies are flagged.
pub fn write_tree<W: Write>(out: &mut W, tree: &MerkleTree) -> io::Result<()> {
    writeln!(out, "{}", "Merkle Tree:".bold().cyan())?;
    writeln!(out, "  Root: {}", tree.root_hash().as_str().bright_yellow())?;

    for (depth, node) in tree.walk() {
        let pad = "  ".repeat(depth + 1);
        writeln!(out)?;

        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                writeln!(out, "{pad}Left:  {}", left.linkage_hash().as_str().bright_black())?;
                writeln!(out, "{pad}Right: {}", right.linkage_hash().as_str().bright_black())?;
            }
            _ => writeln!(out, "{pad}{}", "Leaf".green())?,
        }
        if node.is_padding() {
            writeln!(out, "{pad}{}", "(Padding)".magenta())?;
        }

        let block = node.block();
        writeln!(out, "{pad}Index: {:?}", block.indices)?;
        writeln!(out, "{pad}Hash:  {}", block.previous_hash.as_str().bright_yellow())?;
        writeln!(out, "{pad}Transactions:")?;
        write_transactions(out, &block.transactions, &format!("{pad}  "))?;
    }
    writeln!(out)
}

pub fn write_stats<W: Write>(out: &mut W, stats: &BlockchainStats) -> io::Result<()> {
    writeln!(out, "{}", "Ledger:".bold().cyan())?;
    writeln!(out, "  Height:       {}", stats.height.to_string().bright_cyan())?;
    writeln!(out, "  Tip:          {}", stats.latest_block_hash.short(16).bright_yellow())?;
    writeln!(out, "  Transactions: {}", stats.transaction_count)?;
    writeln!(out, "  Addresses:    {}", stats.address_count)?;
    writeln!(out)
}

fn write_transactions<W: Write>(out: &mut W, txs: &[Transaction], indent: &str) -> io::Result<()> {
    if txs.is_empty() {
        return writeln!(out, "{indent}{}", "(none)".bright_black());
    }
    for tx in txs {
        writeln!(
            out,
            "{indent}Sender: {}, Recipient: {}, Amount: {}",
            tx.sender, tx.recipient, tx.amount
        )?;
    }
    Ok(())
}
