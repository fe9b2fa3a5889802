use std::io::{BufRead, Write};

use anyhow::Result;
use hashchain_core::Chain;
use tracing::info;

use crate::render::{format_transaction, write_chain, write_status};

const MENU: &str = "\
== Blockchain menu ==
1. Add block
2. Display chain
3. Validate chain
4. Exit";

/// Interactive loop over a line-oriented input, owning one chain for its lifetime.
pub struct Session<R, W> {
    input: R,
    output: W,
    chain: Chain,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            chain: Chain::new(),
        }
    }

    /// Runs until the user picks "Exit" or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => self.add_block()?,
                "2" => write_chain(&mut self.output, &self.chain)?,
                "3" => write_status(&mut self.output, &self.chain)?,
                "4" => break,
                other => writeln!(self.output, "Unknown option {other:?}, choose 1-4.")?,
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(())
    }

    /// Collects transactions until the user declines to add another, then
    /// appends them as one block. Input ending inside a transaction's fields
    /// discards the block; ending at the "add another" prompt appends the
    /// transactions entered so far.
    fn add_block(&mut self) -> Result<()> {
        let mut transactions = Vec::new();
        loop {
            let Some(sender) = self.prompt("Sender: ")? else {
                return Ok(());
            };
            let Some(receiver) = self.prompt("Receiver: ")? else {
                return Ok(());
            };
            let amount = loop {
                let Some(raw) = self.prompt("Amount: ")? else {
                    return Ok(());
                };
                match raw.parse::<u64>() {
                    Ok(amount) => break amount,
                    Err(err) => writeln!(self.output, "Invalid amount {raw:?}: {err}")?,
                }
            };
            transactions.push(format_transaction(&sender, &receiver, amount));

            let Some(more) = self.prompt("Add another transaction? (y/n): ")? else {
                break;
            };
            if !more.eq_ignore_ascii_case("y") {
                break;
            }
        }

        let hash = self.chain.append(transactions).hash().to_owned();
        let index = self.chain.height();
        info!(index, %hash, "block added");
        writeln!(self.output, "Block #{index} added with hash {hash}")?;
        Ok(())
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
