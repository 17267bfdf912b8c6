//! ledgerchain CLI entry point.

use clap::Parser;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "ledgerchain")]
#[command(about = "A hash-linked ledger with merkle summaries", long_about = None)]
struct Cli {
    /// Maximum log level written to stderr (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = commands::run(cli.command.unwrap_or_default()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
