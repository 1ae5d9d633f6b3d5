use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Timestamp, Uint256};
use static_raffle_common::types::RaffleStatus;

use crate::state::{RaffleConfig, TicketCommitment};

#[cw_serde]
pub struct InstantiateMsg {
    /// Defaults to the instantiating sender
    pub admin: Option<String>,
    /// Hex-encoded 32-byte participant identifiers, in committed order
    pub participants: Vec<String>,
    pub winner_count: u32,
    pub oracle: String,
    pub key_hash: String,
    pub subscription_id: u64,
    pub callback_gas_limit: u64,
    pub request_confirmations: u16,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Ask the oracle for `winner_count` random words. Admin only, Idle only.
    RequestSelection {},
    /// Oracle callback carrying the requested random words.
    RandomnessDelivered {
        request_id: String,
        random_words: Vec<Uint256>,
    },
    /// Store the root of an off-chain ticket registry. Admin only.
    CommitTicketRoot {
        /// Hex-encoded 32-byte Merkle root
        merkle_root: String,
        num_tickets: u32,
    },
    /// Update admin or oracle settings. Admin only, Idle only.
    UpdateConfig {
        admin: Option<String>,
        oracle: Option<String>,
        key_hash: Option<String>,
        subscription_id: Option<u64>,
        callback_gas_limit: Option<u64>,
        request_confirmations: Option<u16>,
    },
}

/// Grouped form of `ExecuteMsg::UpdateConfig`.
pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub oracle: Option<String>,
    pub key_hash: Option<String>,
    pub subscription_id: Option<u64>,
    pub callback_gas_limit: Option<u64>,
    pub request_confirmations: Option<u16>,
}

/// Execute message understood by the randomness oracle.
#[cw_serde]
pub enum OracleExecuteMsg {
    RequestRandomWords {
        /// Echoed back in `RandomnessDelivered`
        request_id: String,
        key_hash: String,
        subscription_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u64,
        num_words: u32,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(RaffleStateResponse)]
    State {},
    #[returns(WinnersResponse)]
    Winners {},
    #[returns(ParticipantsResponse)]
    Participants {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    /// A given commitment, or the latest one when `commitment_id` is None.
    #[returns(Option<TicketCommitment>)]
    TicketCommitment { commitment_id: Option<u64> },
    /// Verify a ticket against a stored commitment.
    #[returns(bool)]
    VerifyTicket {
        identifier: String,
        proof: Vec<String>,
        commitment_id: Option<u64>,
    },
    /// Verify a ticket against any root.
    #[returns(bool)]
    VerifyInclusion {
        merkle_root: String,
        proof: Vec<String>,
        identifier: String,
    },
}

#[cw_serde]
pub struct RaffleStateResponse {
    pub status: RaffleStatus,
    pub request_id: Option<String>,
    pub requested_at: Option<Timestamp>,
    pub requested_height: Option<u64>,
    pub random_words: Vec<Uint256>,
    pub winner_indices: Vec<u32>,
    pub fulfilled_at: Option<Timestamp>,
}

#[cw_serde]
pub struct WinnersResponse {
    pub winners: Vec<String>,
}

#[cw_serde]
pub struct ParticipantEntry {
    pub index: u32,
    pub identifier: String,
}

#[cw_serde]
pub struct ParticipantsResponse {
    pub total: u32,
    pub participants: Vec<ParticipantEntry>,
}
