use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint256};
use cw_storage_plus::{Item, Map};
use static_raffle_common::types::RaffleStatus;

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const RAFFLE: Item<RaffleState> = Item::new("raffle");

/// Committed participant identifiers (lowercase hex), keyed by index.
pub const PARTICIPANTS: Map<u32, String> = Map::new("participants");

/// Ticket registry roots, one entry per commitment. Never overwritten.
pub const TICKET_COMMITMENTS: Map<u64, TicketCommitment> = Map::new("ticket_commitments");
pub const NEXT_COMMITMENT_ID: Item<u64> = Item::new("next_commitment_id");

#[cw_serde]
pub struct RaffleConfig {
    pub admin: Addr,
    /// Number of committed participants (P)
    pub participant_count: u32,
    /// Number of winners to draw (W), 0 < W <= P
    pub winner_count: u32,
    pub oracle: OracleConfig,
}

#[cw_serde]
pub struct OracleConfig {
    /// Contract that serves randomness requests and calls back
    pub address: Addr,
    /// Hex-encoded key hash selecting the oracle's proving key / gas lane
    pub key_hash: String,
    pub subscription_id: u64,
    /// Gas the oracle should budget for the delivery callback
    pub callback_gas_limit: u64,
    /// Blocks the oracle waits before answering
    pub request_confirmations: u16,
}

#[cw_serde]
pub struct RaffleState {
    pub status: RaffleStatus,
    /// Correlation token of the pending (or fulfilled) request
    pub request_id: Option<String>,
    pub requested_at: Option<Timestamp>,
    pub requested_height: Option<u64>,
    pub random_words: Vec<Uint256>,
    pub winner_indices: Vec<u32>,
    pub winners: Vec<String>,
    pub fulfilled_at: Option<Timestamp>,
}

impl RaffleState {
    pub fn idle() -> Self {
        RaffleState {
            status: RaffleStatus::Idle,
            request_id: None,
            requested_at: None,
            requested_height: None,
            random_words: vec![],
            winner_indices: vec![],
            winners: vec![],
            fulfilled_at: None,
        }
    }
}

#[cw_serde]
pub struct TicketCommitment {
    pub id: u64,
    /// Sorted-pair sha256 Merkle root, hex-encoded
    pub merkle_root: String,
    pub num_tickets: u32,
    pub committed_at: Timestamp,
}
