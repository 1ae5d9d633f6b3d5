use cosmwasm_std::{
    to_json_binary, DepsMut, Env, Event, MessageInfo, Response, Uint256, WasmMsg,
};
use sha2::{Digest, Sha256};
use static_raffle_common::selection::select_winner_indices;
use static_raffle_common::types::RaffleStatus;

use crate::error::ContractError;
use crate::msg::{OracleExecuteMsg, UpdateConfigParams};
use crate::state::{
    TicketCommitment, CONFIG, NEXT_COMMITMENT_ID, PARTICIPANTS, RAFFLE, TICKET_COMMITMENTS,
};

/// Decode and normalise a hex-encoded 32-byte value.
pub fn validate_hash_hex(field: &str, value: &str) -> Result<String, ContractError> {
    let bytes = hex::decode(value).map_err(|_| ContractError::InvalidHex {
        field: field.to_string(),
    })?;
    if bytes.len() != 32 {
        return Err(ContractError::InvalidIdentifierLength {
            field: field.to_string(),
            got: bytes.len(),
        });
    }
    Ok(hex::encode(bytes))
}

/// Correlation token for a randomness request.
///
/// `request_id = sha256(chain_id || contract_addr || height_be || time_nanos_be)`
fn derive_request_id(env: &Env) -> String {
    let mut hasher = Sha256::new();
    hasher.update(env.block.chain_id.as_bytes());
    hasher.update(env.contract.address.as_str().as_bytes());
    hasher.update(env.block.height.to_be_bytes());
    hasher.update(env.block.time.nanos().to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Ask the oracle for one random word per winner. Admin only.
///
/// Only valid while Idle: a pending or finished raffle can never be
/// requested again.
pub fn request_selection(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can request winner selection".to_string(),
        });
    }

    let mut raffle = RAFFLE.load(deps.storage)?;
    if raffle.status != RaffleStatus::Idle {
        return Err(ContractError::InvalidState {
            action: "request selection".to_string(),
            status: raffle.status,
        });
    }

    let request_id = derive_request_id(&env);
    let oracle = &config.oracle;
    let request_msg = WasmMsg::Execute {
        contract_addr: oracle.address.to_string(),
        msg: to_json_binary(&OracleExecuteMsg::RequestRandomWords {
            request_id: request_id.clone(),
            key_hash: oracle.key_hash.clone(),
            subscription_id: oracle.subscription_id,
            request_confirmations: oracle.request_confirmations,
            callback_gas_limit: oracle.callback_gas_limit,
            num_words: config.winner_count,
        })?,
        funds: vec![],
    };

    raffle.status = RaffleStatus::Requested;
    raffle.request_id = Some(request_id.clone());
    raffle.requested_at = Some(env.block.time);
    raffle.requested_height = Some(env.block.height);
    RAFFLE.save(deps.storage, &raffle)?;

    Ok(Response::new()
        .add_message(request_msg)
        .add_attribute("action", "request_selection")
        .add_attribute("request_id", request_id.clone())
        .add_event(
            Event::new("raffle_selection_requested")
                .add_attribute("request_id", request_id)
                .add_attribute("num_words", config.winner_count.to_string())
                .add_attribute("oracle", oracle.address.to_string())
                .add_attribute("block_height", env.block.height.to_string()),
        ))
}

/// Oracle callback. Maps the delivered words to distinct winners and
/// freezes the result.
///
/// Rejected without touching state when the sender is not the oracle, the
/// request id is not the pending one, the raffle is already fulfilled, or
/// the word count differs from `winner_count`.
pub fn randomness_delivered(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: String,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.oracle.address {
        return Err(ContractError::Unauthorized {
            reason: "only the oracle can deliver randomness".to_string(),
        });
    }

    let mut raffle = RAFFLE.load(deps.storage)?;
    match raffle.status {
        RaffleStatus::Requested => {
            if raffle.request_id.as_deref() != Some(request_id.as_str()) {
                return Err(ContractError::UnknownRequest { request_id });
            }
        }
        RaffleStatus::Idle => return Err(ContractError::UnknownRequest { request_id }),
        RaffleStatus::Fulfilled => {
            return Err(ContractError::InvalidState {
                action: "deliver randomness".to_string(),
                status: RaffleStatus::Fulfilled,
            })
        }
    }

    if random_words.len() != config.winner_count as usize {
        return Err(ContractError::WordCount {
            expected: config.winner_count,
            got: random_words.len(),
        });
    }

    let winner_indices = select_winner_indices(config.participant_count, &random_words)?;
    let winners = winner_indices
        .iter()
        .map(|index| PARTICIPANTS.load(deps.storage, *index))
        .collect::<Result<Vec<_>, _>>()?;

    raffle.status = RaffleStatus::Fulfilled;
    raffle.random_words = random_words;
    raffle.winner_indices = winner_indices;
    raffle.winners = winners;
    raffle.fulfilled_at = Some(env.block.time);
    RAFFLE.save(deps.storage, &raffle)?;

    let indices_str = raffle
        .winner_indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(Response::new()
        .add_attribute("action", "randomness_delivered")
        .add_attribute("request_id", request_id.clone())
        .add_attribute("winner_count", raffle.winners.len().to_string())
        .add_event(
            Event::new("raffle_winners_selected")
                .add_attribute("request_id", request_id)
                .add_attribute("winners", raffle.winners.join(","))
                .add_attribute("winner_indices", indices_str)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Store a new ticket registry root. Admin only.
///
/// Each call creates a new commitment; earlier roots stay queryable.
pub fn commit_ticket_root(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    merkle_root: String,
    num_tickets: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can commit ticket roots".to_string(),
        });
    }

    let merkle_root = validate_hash_hex("merkle_root", &merkle_root)?;

    let id = NEXT_COMMITMENT_ID.may_load(deps.storage)?.unwrap_or(0);
    let commitment = TicketCommitment {
        id,
        merkle_root: merkle_root.clone(),
        num_tickets,
        committed_at: env.block.time,
    };
    TICKET_COMMITMENTS.save(deps.storage, id, &commitment)?;
    NEXT_COMMITMENT_ID.save(deps.storage, &(id + 1))?;

    Ok(Response::new()
        .add_attribute("action", "commit_ticket_root")
        .add_attribute("commitment_id", id.to_string())
        .add_attribute("merkle_root", merkle_root.clone())
        .add_event(
            Event::new("raffle_ticket_root_committed")
                .add_attribute("commitment_id", id.to_string())
                .add_attribute("merkle_root", merkle_root)
                .add_attribute("num_tickets", num_tickets.to_string()),
        ))
}

/// Update admin and oracle settings. Admin only, and only before any
/// randomness has been requested.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        oracle,
        key_hash,
        subscription_id,
        callback_gas_limit,
        request_confirmations,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    let raffle = RAFFLE.load(deps.storage)?;
    if raffle.status != RaffleStatus::Idle {
        return Err(ContractError::InvalidState {
            action: "update config".to_string(),
            status: raffle.status,
        });
    }

    if let Some(addr) = admin {
        config.admin = deps.api.addr_validate(&addr)?;
    }
    if let Some(addr) = oracle {
        config.oracle.address = deps.api.addr_validate(&addr)?;
    }
    if let Some(hash) = key_hash {
        config.oracle.key_hash = validate_hash_hex("key_hash", &hash)?;
    }
    if let Some(id) = subscription_id {
        config.oracle.subscription_id = id;
    }
    if let Some(limit) = callback_gas_limit {
        config.oracle.callback_gas_limit = limit;
    }
    if let Some(confirmations) = request_confirmations {
        config.oracle.request_confirmations = confirmations;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("raffle_config_updated")
                .add_attribute("admin", config.admin.to_string())
                .add_attribute("oracle", config.oracle.address.to_string()),
        ))
}
