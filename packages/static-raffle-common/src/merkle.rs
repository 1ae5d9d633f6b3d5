use sha2::{Digest, Sha256};
use thiserror::Error;

/// A 32-byte node of the commitment tree.
pub type Hash = [u8; 32];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MerkleError {
    #[error("cannot build a commitment over an empty identifier set")]
    EmptySet,

    #[error("leaf {leaf} is not part of the committed set")]
    NotFound { leaf: String },
}

/// Compute the leaf hash for a committed identifier.
///
/// `leaf_hash = sha256(identifier_bytes)`
pub fn hash_identifier(identifier: &[u8]) -> Hash {
    Sha256::digest(identifier).into()
}

/// Hash two sibling nodes with sorted-pair ordering: the bytewise smaller
/// value always goes first, so a proof never has to carry left/right flags.
pub fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    if a.as_slice() <= b.as_slice() {
        hasher.update(a);
        hasher.update(b);
    } else {
        hasher.update(b);
        hasher.update(a);
    }
    hasher.finalize().into()
}

/// Decode a hex string into a 32-byte hash. Returns `None` on bad hex or
/// wrong length.
pub fn decode_hash(value: &str) -> Option<Hash> {
    let bytes = hex::decode(value).ok()?;
    bytes.try_into().ok()
}

/// Merkle tree over a fixed, ordered identifier set.
///
/// Levels are stored bottom-up; `layers[0]` are the leaves. An unpaired node
/// at the end of a level is carried up unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Hash>>,
    root: Hash,
}

impl MerkleTree {
    /// Hash every identifier into a leaf and fold the tree up to its root.
    pub fn build<I>(identifiers: I) -> Result<Self, MerkleError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let leaves = identifiers
            .into_iter()
            .map(|id| hash_identifier(id.as_ref()))
            .collect();
        Self::from_leaves(leaves)
    }

    /// Build from already-hashed leaves.
    pub fn from_leaves(leaves: Vec<Hash>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptySet);
        }

        let mut layers = vec![leaves];
        let mut current = &layers[0];
        while current.len() > 1 {
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_sorted_pair(left, right),
                    _ => pair[0],
                })
                .collect();
            layers.push(next);
            current = &layers[layers.len() - 1];
        }
        let root = current[0];

        Ok(Self { layers, root })
    }

    pub fn root(&self) -> Hash {
        self.root
    }

    pub fn root_hex(&self) -> String {
        hex::encode(self.root)
    }

    pub fn leaves(&self) -> &[Hash] {
        &self.layers[0]
    }

    /// Sibling path from the identifier's leaf up to the root.
    ///
    /// If the identifier was committed more than once, the proof is for its
    /// first occurrence.
    pub fn proof(&self, identifier: &[u8]) -> Result<Vec<Hash>, MerkleError> {
        let leaf = hash_identifier(identifier);
        let mut index = self
            .leaves()
            .iter()
            .position(|candidate| *candidate == leaf)
            .ok_or_else(|| MerkleError::NotFound {
                leaf: hex::encode(leaf),
            })?;

        let mut proof = Vec::with_capacity(self.layers.len() - 1);
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = index ^ 1;
            // A carried-up odd node has no sibling on this level.
            if sibling < layer.len() {
                proof.push(layer[sibling]);
            }
            index /= 2;
        }
        Ok(proof)
    }

    /// Same as [`MerkleTree::proof`], hex-encoded for message payloads.
    pub fn proof_hex(&self, identifier: &[u8]) -> Result<Vec<String>, MerkleError> {
        Ok(self.proof(identifier)?.iter().map(hex::encode).collect())
    }
}

/// Recompute a root from `identifier` and `proof` and compare it with `root`.
///
/// Needs no tree instance: this is what external verifiers call.
pub fn verify_membership(identifier: &[u8], proof: &[Hash], root: &Hash) -> bool {
    let computed = proof
        .iter()
        .fold(hash_identifier(identifier), |current, sibling| {
            hash_sorted_pair(&current, sibling)
        });
    computed == *root
}

/// Verify a Merkle proof against a known root.
///
/// All values are 32-byte hashes represented as hex strings. Any malformed
/// hex or wrong-length value makes the proof invalid.
///
/// Returns true if the computed root matches the expected root.
pub fn verify_merkle_proof(root_hex: &str, proof_hex: &[String], leaf_hash: &Hash) -> bool {
    let Some(expected_root) = decode_hash(root_hex) else {
        return false;
    };

    let mut current = *leaf_hash;
    for sibling_hex in proof_hex {
        let Some(sibling) = decode_hash(sibling_hex) else {
            return false;
        };
        current = hash_sorted_pair(&current, &sibling);
    }

    current == expected_root
}
