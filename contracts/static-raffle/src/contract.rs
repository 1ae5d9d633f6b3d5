use std::collections::HashSet;

use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{self, validate_hash_hex};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{
    OracleConfig, RaffleConfig, RaffleState, CONFIG, NEXT_COMMITMENT_ID, PARTICIPANTS, RAFFLE,
};

const CONTRACT_NAME: &str = "crates.io:static-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // 0 < W <= P
    let invalid_count = || ContractError::InvalidWinnerCount {
        winner_count: msg.winner_count,
        participant_count: msg.participants.len(),
    };
    if msg.winner_count == 0 || msg.winner_count as usize > msg.participants.len() {
        return Err(invalid_count());
    }
    let participant_count = u32::try_from(msg.participants.len()).map_err(|_| invalid_count())?;

    let mut seen = HashSet::with_capacity(msg.participants.len());
    for (index, raw) in msg.participants.iter().enumerate() {
        let identifier = validate_hash_hex(&format!("participants[{index}]"), raw)?;
        if !seen.insert(identifier.clone()) {
            return Err(ContractError::DuplicateParticipant { identifier });
        }
        PARTICIPANTS.save(deps.storage, index as u32, &identifier)?;
    }

    let admin = match &msg.admin {
        Some(addr) => deps.api.addr_validate(addr)?,
        None => info.sender.clone(),
    };

    let config = RaffleConfig {
        admin: admin.clone(),
        participant_count,
        winner_count: msg.winner_count,
        oracle: OracleConfig {
            address: deps.api.addr_validate(&msg.oracle)?,
            key_hash: validate_hash_hex("key_hash", &msg.key_hash)?,
            subscription_id: msg.subscription_id,
            callback_gas_limit: msg.callback_gas_limit,
            request_confirmations: msg.request_confirmations,
        },
    };
    CONFIG.save(deps.storage, &config)?;
    RAFFLE.save(deps.storage, &RaffleState::idle())?;
    NEXT_COMMITMENT_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "static-raffle")
        .add_attribute("admin", admin.to_string())
        .add_attribute("participants", participant_count.to_string())
        .add_attribute("winner_count", msg.winner_count.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RequestSelection {} => execute::request_selection(deps, env, info),
        ExecuteMsg::RandomnessDelivered {
            request_id,
            random_words,
        } => execute::randomness_delivered(deps, env, info, request_id, random_words),
        ExecuteMsg::CommitTicketRoot {
            merkle_root,
            num_tickets,
        } => execute::commit_ticket_root(deps, env, info, merkle_root, num_tickets),
        ExecuteMsg::UpdateConfig {
            admin,
            oracle,
            key_hash,
            subscription_id,
            callback_gas_limit,
            request_confirmations,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                oracle,
                key_hash,
                subscription_id,
                callback_gas_limit,
                request_confirmations,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::State {} => query::query_state(deps),
        QueryMsg::Winners {} => query::query_winners(deps),
        QueryMsg::Participants { start_after, limit } => {
            query::query_participants(deps, start_after, limit)
        }
        QueryMsg::TicketCommitment { commitment_id } => {
            query::query_ticket_commitment(deps, commitment_id)
        }
        QueryMsg::VerifyTicket {
            identifier,
            proof,
            commitment_id,
        } => query::query_verify_ticket(deps, identifier, proof, commitment_id),
        QueryMsg::VerifyInclusion {
            merkle_root,
            proof,
            identifier,
        } => query::query_verify_inclusion(deps, merkle_root, proof, identifier),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
