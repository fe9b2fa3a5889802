use tracing::{debug, warn};

use crate::{
    block::Block,
    clock::{Clock, SystemClock},
    constants::{GENESIS_PREVIOUS_HASH, GENESIS_TRANSACTION},
    error::ChainError,
};

/// Append-only, in-memory sequence of blocks seeded with a genesis block.
///
/// `append` is the only mutation; blocks can be read but never replaced or
/// removed.
#[derive(Clone, Debug)]
pub struct Chain<C: Clock = SystemClock> {
    blocks: Vec<Block>,
    clock: C,
}

impl Chain<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Chain<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Chain<C> {
    /// Start a chain whose block timestamps come from `clock`.
    pub fn with_clock(clock: C) -> Self {
        let genesis = genesis_block(&clock);
        debug!(hash = %genesis.hash(), "created genesis block");
        Self {
            blocks: vec![genesis],
            clock,
        }
    }

    /// Link a new block holding `transactions` to the current tip.
    pub fn append(&mut self, transactions: Vec<String>) -> &Block {
        let previous_hash = self.tip().hash().to_owned();
        let block = Block::new(previous_hash, transactions, &self.clock);
        debug!(
            index = self.blocks.len(),
            hash = %block.hash(),
            txs = block.transactions().len(),
            "appended block"
        );
        self.blocks.push(block);
        self.tip()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn tip(&self) -> &Block {
        // never empty: genesis is pushed on construction
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks after genesis.
    pub fn height(&self) -> usize {
        self.blocks.len() - 1
    }

    /// Link consistency: every block's `previous_hash` equals the stored hash
    /// of the block before it.
    ///
    /// Hashes are compared as stored, not recomputed, so a block whose header
    /// or transactions were altered after construction still passes. Use
    /// [`Chain::verify`] to catch that.
    pub fn validate(&self) -> bool {
        match self.check_links() {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "chain failed link validation");
                false
            }
        }
    }

    /// Full verification: the genesis sentinel, every block's merkle root and
    /// hash recomputed from its contents, and every link.
    pub fn verify(&self) -> Result<(), ChainError> {
        let result = self.check_all();
        if let Err(err) = &result {
            warn!(%err, "chain failed verification");
        }
        result
    }

    fn check_links(&self) -> Result<(), ChainError> {
        for (offset, pair) in self.blocks.windows(2).enumerate() {
            check_link(offset + 1, &pair[0], &pair[1])?;
        }
        Ok(())
    }

    fn check_all(&self) -> Result<(), ChainError> {
        let genesis = self.genesis();
        if genesis.previous_hash() != GENESIS_PREVIOUS_HASH {
            return Err(ChainError::InvalidGenesis {
                found: genesis.previous_hash().to_owned(),
            });
        }
        for (index, block) in self.blocks.iter().enumerate() {
            if block.compute_merkle_root().as_deref() != block.merkle_root() {
                return Err(ChainError::MerkleRootMismatch { index });
            }
            if block.compute_hash() != block.hash() {
                return Err(ChainError::HashMismatch { index });
            }
            if index > 0 {
                check_link(index, &self.blocks[index - 1], block)?;
            }
        }
        Ok(())
    }
}

impl<'a, C: Clock> IntoIterator for &'a Chain<C> {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn check_link(index: usize, previous: &Block, block: &Block) -> Result<(), ChainError> {
    if block.previous_hash() == previous.hash() {
        Ok(())
    } else {
        Err(ChainError::BrokenLink {
            index,
            expected: previous.hash().to_owned(),
            found: block.previous_hash().to_owned(),
        })
    }
}

/// The fixed first block: previous hash `"0"` and a single genesis transaction.
pub fn genesis_block<C: Clock>(clock: &C) -> Block {
    Block::new(
        GENESIS_PREVIOUS_HASH,
        vec![GENESIS_TRANSACTION.to_string()],
        clock,
    )
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::clock::FixedClock;

    /// Ticks forward one second per reading.
    struct StepClock(Cell<f64>);

    impl Clock for StepClock {
        fn now(&self) -> f64 {
            let t = self.0.get();
            self.0.set(t + 1.0);
            t
        }
    }

    fn txs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn chain_with(n: usize) -> Chain<StepClock> {
        let mut chain = Chain::with_clock(StepClock(Cell::new(1_700_000_000.0)));
        for i in 0..n {
            chain.append(vec![format!("A -> B: {i}"), format!("B -> C: {i}")]);
        }
        chain
    }

    #[test]
    fn genesis_block_example() {
        let chain: Chain = Chain::new();
        assert_eq!(chain.blocks().len(), 1);
        assert_eq!(chain.height(), 0);
        let genesis = chain.genesis();
        assert_eq!(genesis.previous_hash(), "0");
        assert_eq!(genesis.transactions(), txs(&["Genesis Transaction"]).as_slice());
        assert!(std::ptr::eq(chain.genesis(), chain.tip()));
    }

    #[test]
    fn genesis_only_chain_is_valid() {
        let chain: Chain = Chain::default();
        assert!(chain.validate());
        assert_eq!(chain.verify(), Ok(()));
    }

    #[test]
    fn append_links_to_previous_tip() {
        let mut chain = Chain::with_clock(FixedClock(5.0));
        let prior = chain.tip().hash().to_owned();
        let appended = chain.append(txs(&["Alice -> Bob: 10"])).clone();
        assert_eq!(appended.previous_hash(), prior);
        assert_eq!(chain.tip(), &appended);
        assert_eq!(chain.blocks().len(), 2);
        assert_ne!(chain.tip().hash(), prior);
    }

    #[test]
    fn append_accepts_empty_transactions() {
        let mut chain = Chain::with_clock(FixedClock(5.0));
        let block = chain.append(vec![]);
        assert_eq!(block.merkle_root(), None);
        assert!(chain.validate());
        assert_eq!(chain.verify(), Ok(()));
    }

    #[test]
    fn chain_round_trip_validates() {
        for n in [1, 2, 10, 50] {
            let chain = chain_with(n);
            assert_eq!(chain.blocks().len(), n + 1);
            assert!(chain.validate());
            assert_eq!(chain.verify(), Ok(()));
        }
    }

    #[test]
    fn fixed_clock_chain_still_links() {
        let mut chain = Chain::with_clock(FixedClock(1.0));
        chain.append(txs(&["same"]));
        chain.append(txs(&["same"]));
        assert_ne!(chain.blocks()[1].hash(), chain.blocks()[2].hash());
        assert!(chain.validate());
    }

    #[test]
    fn timestamps_come_from_the_clock() {
        let chain = chain_with(3);
        let stamps: Vec<f64> = chain.iter().map(Block::timestamp).collect();
        assert_eq!(
            stamps,
            vec![1_700_000_000.0, 1_700_000_001.0, 1_700_000_002.0, 1_700_000_003.0]
        );
    }

    #[test]
    fn tampered_link_fails_validation() {
        for k in 1..=5 {
            let mut chain = chain_with(5);
            chain.blocks[k].previous_hash = "forged".into();
            assert!(!chain.validate(), "k={k}");
            // previous_hash is a hashed header field, so the block's own hash
            // no longer matches before its link is checked
            assert_eq!(chain.verify(), Err(ChainError::HashMismatch { index: k }));
        }
    }

    #[test]
    fn tampered_transactions_pass_validate_but_fail_verify() {
        let mut chain = chain_with(3);
        chain.blocks[2].transactions[0] = "A -> Mallory: 1000".into();
        assert!(chain.validate());
        assert_eq!(
            chain.verify(),
            Err(ChainError::MerkleRootMismatch { index: 2 })
        );
    }

    #[test]
    fn tampered_header_fails_verify() {
        let mut chain = chain_with(3);
        chain.blocks[1].timestamp += 1.0;
        assert!(chain.validate());
        assert_eq!(chain.verify(), Err(ChainError::HashMismatch { index: 1 }));
    }

    #[test]
    fn rehashed_block_breaks_next_link() {
        let mut chain = chain_with(3);
        let block = &mut chain.blocks[1];
        block.transactions = txs(&["rewritten"]);
        block.merkle_root = block.compute_merkle_root();
        block.hash = block.compute_hash();
        let rewritten = block.hash().to_owned();
        assert!(!chain.validate());
        assert_eq!(
            chain.verify(),
            Err(ChainError::BrokenLink {
                index: 2,
                expected: rewritten,
                found: chain.blocks[2].previous_hash().to_owned(),
            })
        );
        assert_ne!(chain.blocks[2].previous_hash(), chain.blocks[1].hash());
    }

    #[test]
    fn tampered_genesis_sentinel_fails_verify() {
        let mut chain = chain_with(1);
        chain.blocks[0].previous_hash = "1".into();
        assert!(chain.validate());
        assert_eq!(
            chain.verify(),
            Err(ChainError::InvalidGenesis { found: "1".into() })
        );
    }

    #[test]
    fn get_and_iterate() {
        let chain = chain_with(2);
        assert_eq!(chain.get(2), Some(chain.tip()));
        assert!(chain.get(3).is_none());
        assert_eq!((&chain).into_iter().count(), 3);
        let mut seen = 0;
        for block in &chain {
            assert!(!block.hash().is_empty());
            seen += 1;
        }
        assert_eq!(seen, 3);
    }
}
