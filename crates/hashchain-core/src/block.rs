use serde::Serialize;

use crate::{canonical::encode_header, clock::Clock, digest, merkle::merkle_root};

/// An immutable block. The hash covers `previous_hash`, `timestamp` and
/// `merkle_root`; transactions only reach it through the root.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Block {
    pub(crate) timestamp: f64,
    pub(crate) previous_hash: String,
    pub(crate) transactions: Vec<String>,
    pub(crate) merkle_root: Option<String>,
    pub(crate) hash: String,
}

impl Block {
    pub fn new<C: Clock>(
        previous_hash: impl Into<String>,
        transactions: Vec<String>,
        clock: &C,
    ) -> Self {
        let previous_hash = previous_hash.into();
        let timestamp = clock.now();
        let merkle_root = merkle_root(&transactions);
        let hash = header_hash(&previous_hash, timestamp, merkle_root.as_deref());
        Self {
            timestamp,
            previous_hash,
            transactions,
            merkle_root,
            hash,
        }
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn transactions(&self) -> &[String] {
        &self.transactions
    }

    pub fn merkle_root(&self) -> Option<&str> {
        self.merkle_root.as_deref()
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Hash re-derived from the stored header fields.
    pub fn compute_hash(&self) -> String {
        header_hash(&self.previous_hash, self.timestamp, self.merkle_root.as_deref())
    }

    /// Merkle root re-derived from the stored transactions.
    pub fn compute_merkle_root(&self) -> Option<String> {
        merkle_root(&self.transactions)
    }
}

fn header_hash(previous_hash: &str, timestamp: f64, merkle_root: Option<&str>) -> String {
    digest(encode_header(previous_hash, timestamp, merkle_root))
}
