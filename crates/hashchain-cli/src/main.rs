mod menu;
mod render;

use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use hashchain_core::Chain;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    menu::Session,
    render::{write_chain, write_status, Report},
};

#[derive(Parser, Debug)]
#[command(name = "hashchain")]
#[command(about = "In-memory hash-linked chain of Merkle-committed blocks")]
struct Cli {
    /// Tracing filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default)
    Menu,
    /// Build a chain from the given blocks and print it
    Build {
        /// Comma-separated transactions for one block; repeat for more blocks
        #[arg(long = "block", value_name = "TXS")]
        blocks: Vec<String>,
        /// Print the chain as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.cmd.unwrap_or(Command::Menu) {
        Command::Menu => {
            let mut session = Session::new(io::stdin().lock(), io::stdout().lock());
            session.run()?;
        }
        Command::Build { blocks, json } => build(&blocks, json)?,
    }
    Ok(())
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    // stderr keeps stdout clean for chain output
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn build(blocks: &[String], json: bool) -> Result<()> {
    let mut chain: Chain = Chain::new();
    for raw in blocks {
        chain.append(parse_block(raw));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &Report::new(&chain))?;
        writeln!(out)?;
    } else {
        write_chain(&mut out, &chain)?;
        write_status(&mut out, &chain)?;
    }
    Ok(())
}

/// Splits a `--block` value on commas; blank entries are dropped.
fn parse_block(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tx| !tx.is_empty())
        .map(str::to_string)
        .collect()
}
