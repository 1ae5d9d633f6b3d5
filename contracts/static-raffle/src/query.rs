use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;
use static_raffle_common::merkle::{hash_identifier, verify_merkle_proof};

use crate::msg::{ParticipantEntry, ParticipantsResponse, RaffleStateResponse, WinnersResponse};
use crate::state::{TicketCommitment, CONFIG, PARTICIPANTS, RAFFLE, TICKET_COMMITMENTS};

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_state(deps: Deps) -> StdResult<Binary> {
    let raffle = RAFFLE.load(deps.storage)?;
    to_json_binary(&RaffleStateResponse {
        status: raffle.status,
        request_id: raffle.request_id,
        requested_at: raffle.requested_at,
        requested_height: raffle.requested_height,
        random_words: raffle.random_words,
        winner_indices: raffle.winner_indices,
        fulfilled_at: raffle.fulfilled_at,
    })
}

/// Empty until the raffle is fulfilled.
pub fn query_winners(deps: Deps) -> StdResult<Binary> {
    let raffle = RAFFLE.load(deps.storage)?;
    to_json_binary(&WinnersResponse {
        winners: raffle.winners,
    })
}

pub fn query_participants(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let participants = PARTICIPANTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(index, identifier)| ParticipantEntry { index, identifier }))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&ParticipantsResponse {
        total: config.participant_count,
        participants,
    })
}

fn load_commitment(deps: Deps, commitment_id: Option<u64>) -> StdResult<Option<TicketCommitment>> {
    match commitment_id {
        Some(id) => TICKET_COMMITMENTS.may_load(deps.storage, id),
        None => TICKET_COMMITMENTS
            .range(deps.storage, None, None, Order::Descending)
            .next()
            .transpose()
            .map(|latest| latest.map(|(_, commitment)| commitment)),
    }
}

pub fn query_ticket_commitment(deps: Deps, commitment_id: Option<u64>) -> StdResult<Binary> {
    let commitment = load_commitment(deps, commitment_id)?;
    to_json_binary(&commitment)
}

pub fn query_verify_ticket(
    deps: Deps,
    identifier: String,
    proof: Vec<String>,
    commitment_id: Option<u64>,
) -> StdResult<Binary> {
    let valid = match load_commitment(deps, commitment_id)? {
        Some(commitment) => verify_merkle_proof(
            &commitment.merkle_root,
            &proof,
            &hash_identifier(identifier.as_bytes()),
        ),
        None => false,
    };
    to_json_binary(&valid)
}

pub fn query_verify_inclusion(
    _deps: Deps,
    merkle_root: String,
    proof: Vec<String>,
    identifier: String,
) -> StdResult<Binary> {
    let leaf_hash = hash_identifier(identifier.as_bytes());
    let valid = verify_merkle_proof(&merkle_root, &proof, &leaf_hash);
    to_json_binary(&valid)
}
