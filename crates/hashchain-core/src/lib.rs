pub mod block;
pub mod canonical;
pub mod chain;
pub mod clock;
pub mod constants;
pub mod error;
pub mod merkle;

use sha2::{Digest, Sha256};

pub use block::Block;
pub use chain::Chain;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ChainError;
pub use merkle::{merkle_root, MerkleProof, MerkleTree, ProofStep};

/// SHA-256 of `data` as a lowercase hex string.
pub fn digest(data: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    hex::encode(hasher.finalize())
}
