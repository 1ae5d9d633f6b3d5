pub mod merkle;
pub mod selection;
pub mod types;

pub use merkle::{
    decode_hash, hash_identifier, hash_sorted_pair, verify_membership, verify_merkle_proof, Hash,
    MerkleError, MerkleTree,
};
pub use selection::{reduce_word, select_winner_indices, SelectionError};
pub use types::RaffleStatus;
