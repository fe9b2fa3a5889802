use thiserror::Error;

/// Reasons [`Chain::verify`](crate::Chain::verify) rejects a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("genesis block has previous hash {found:?}, expected \"0\"")]
    InvalidGenesis { found: String },

    #[error("block {index}: merkle root does not match its transactions")]
    MerkleRootMismatch { index: usize },

    #[error("block {index}: stored hash does not match its header")]
    HashMismatch { index: usize },

    #[error("block {index}: previous hash {found} does not match {expected}")]
    BrokenLink {
        index: usize,
        expected: String,
        found: String,
    },
}
