use cosmwasm_std::Uint256;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("cannot select from an empty pool")]
    EmptyPool,

    #[error("{requested} random words would exhaust a pool of {pool_size}")]
    PoolExhausted { pool_size: u32, requested: usize },
}

/// Reduce a wide random word into `[0, bound)`.
///
/// `bound` must be non-zero.
pub fn reduce_word(word: Uint256, bound: u32) -> u32 {
    let rem = word % Uint256::from(u128::from(bound));
    let bytes = rem.to_be_bytes();
    // rem < bound <= u32::MAX, so only the low four bytes are set.
    u32::from_be_bytes([bytes[28], bytes[29], bytes[30], bytes[31]])
}

/// Derive distinct indices in `0..pool_size`, one per random word, in the
/// order the words were supplied.
///
/// Sampling without replacement by swap-removal: each word picks a live slot
/// of the shrinking pool, the picked slot is replaced by the last live one.
/// Every word is consumed exactly once and no index can come out twice.
pub fn select_winner_indices(
    pool_size: u32,
    random_words: &[Uint256],
) -> Result<Vec<u32>, SelectionError> {
    if pool_size == 0 {
        return Err(SelectionError::EmptyPool);
    }
    if random_words.len() > pool_size as usize {
        return Err(SelectionError::PoolExhausted {
            pool_size,
            requested: random_words.len(),
        });
    }

    let mut pool: Vec<u32> = (0..pool_size).collect();
    let winners = random_words
        .iter()
        .map(|word| {
            let pick = reduce_word(*word, pool.len() as u32);
            pool.swap_remove(pick as usize)
        })
        .collect();

    Ok(winners)
}
