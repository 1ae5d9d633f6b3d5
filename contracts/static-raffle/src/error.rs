use cosmwasm_std::StdError;
use static_raffle_common::selection::SelectionError;
use static_raffle_common::types::RaffleStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid winner count {winner_count} for {participant_count} participants")]
    InvalidWinnerCount {
        winner_count: u32,
        participant_count: usize,
    },

    #[error("participant {identifier} is listed more than once")]
    DuplicateParticipant { identifier: String },

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },

    #[error("invalid length for {field}: expected 32 bytes, got {got}")]
    InvalidIdentifierLength { field: String, got: usize },

    #[error("cannot {action} while raffle is {status}")]
    InvalidState {
        action: String,
        status: RaffleStatus,
    },

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: String },

    #[error("expected {expected} random words, got {got}")]
    WordCount { expected: u32, got: usize },

    #[error("{0}")]
    Selection(#[from] SelectionError),
}
