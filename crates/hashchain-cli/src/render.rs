use std::io::{self, Write};

use hashchain_core::{Block, Chain, Clock};
use serde::Serialize;

/// Machine-readable dump of a chain and its validation outcome.
#[derive(Serialize)]
pub struct Report<'a> {
    pub blocks: &'a [Block],
    pub valid: bool,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> Report<'a> {
    pub fn new<C: Clock>(chain: &'a Chain<C>) -> Self {
        let error = chain.verify().err().map(|e| e.to_string());
        Self {
            blocks: chain.blocks(),
            valid: chain.validate(),
            verified: error.is_none(),
            error,
        }
    }
}

pub fn format_transaction(sender: &str, receiver: &str, amount: u64) -> String {
    format!("{sender} -> {receiver}: {amount}")
}

pub fn write_block<W: Write>(out: &mut W, index: usize, block: &Block) -> io::Result<()> {
    writeln!(out, "Block #{index}")?;
    writeln!(out, "  Timestamp:     {}", block.timestamp())?;
    writeln!(out, "  Previous hash: {}", block.previous_hash())?;
    writeln!(out, "  Merkle root:   {}", block.merkle_root().unwrap_or("(none)"))?;
    writeln!(out, "  Hash:          {}", block.hash())?;
    if block.transactions().is_empty() {
        writeln!(out, "  Transactions:  (none)")?;
    } else {
        writeln!(out, "  Transactions:")?;
        for tx in block.transactions() {
            writeln!(out, "    - {tx}")?;
        }
    }
    Ok(())
}

pub fn write_chain<W: Write, C: Clock>(out: &mut W, chain: &Chain<C>) -> io::Result<()> {
    for (index, block) in chain.iter().enumerate() {
        write_block(out, index, block)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_status<W: Write, C: Clock>(out: &mut W, chain: &Chain<C>) -> io::Result<()> {
    if chain.validate() {
        writeln!(out, "Chain is valid.")?;
    } else {
        writeln!(out, "Chain is INVALID.")?;
    }
    match chain.verify() {
        Ok(()) => writeln!(out, "Full verification: ok"),
        Err(err) => writeln!(out, "Full verification failed: {err}"),
    }
}
