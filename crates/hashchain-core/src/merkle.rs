use serde::{Deserialize, Serialize};

use crate::digest;

/// Merkle commitment over an ordered list of transactions.
///
/// Leaves are `digest(tx)`. Each parent is the digest of its children's hex
/// strings concatenated left then right; an odd node at the end of a level is
/// paired with itself. Only the root is kept; [`MerkleTree::proof`] rebuilds
/// the levels on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MerkleTree {
    transactions: Vec<String>,
    root: Option<String>,
}

impl MerkleTree {
    pub fn new(transactions: Vec<String>) -> Self {
        let root = merkle_root(&transactions);
        Self { transactions, root }
    }

    /// `None` when the tree was built from no transactions.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn transactions(&self) -> &[String] {
        &self.transactions
    }

    /// Inclusion proof for the transaction at `index`.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.transactions.len() {
            return None;
        }
        let mut level = leaves(&self.transactions);
        let mut position = index;
        let mut path = Vec::new();
        while level.len() > 1 {
            let is_right = position % 2 == 0;
            let sibling = if is_right {
                level.get(position + 1).unwrap_or(&level[position])
            } else {
                &level[position - 1]
            };
            path.push(ProofStep {
                hash: sibling.clone(),
                is_right,
            });
            level = next_level(&level);
            position /= 2;
        }
        Some(MerkleProof { index, path })
    }
}

/// One sibling on the way from a leaf to the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub hash: String,
    /// The sibling is the right-hand input of the parent.
    pub is_right: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub index: usize,
    pub path: Vec<ProofStep>,
}

impl MerkleProof {
    /// Fold `transaction` up through the path and compare with `root`.
    pub fn verify(&self, transaction: &str, root: &str) -> bool {
        let computed = self
            .path
            .iter()
            .fold(digest(transaction), |node, step| {
                if step.is_right {
                    hash_pair(&node, &step.hash)
                } else {
                    hash_pair(&step.hash, &node)
                }
            });
        computed == root
    }
}

/// Merkle root of `transactions`, or `None` if there are none.
pub fn merkle_root<T: AsRef<str>>(transactions: &[T]) -> Option<String> {
    let mut level = leaves(transactions);
    while level.len() > 1 {
        level = next_level(&level);
    }
    level.pop()
}

fn leaves<T: AsRef<str>>(transactions: &[T]) -> Vec<String> {
    transactions.iter().map(|tx| digest(tx.as_ref())).collect()
}

fn next_level(level: &[String]) -> Vec<String> {
    level
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            hash_pair(left, right)
        })
        .collect()
}

fn hash_pair(left: &str, right: &str) -> String {
    let mut combined = String::with_capacity(left.len() + right.len());
    combined.push_str(left);
    combined.push_str(right);
    digest(combined)
}
