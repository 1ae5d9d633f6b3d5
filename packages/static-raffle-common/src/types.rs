use std::fmt;

use cosmwasm_schema::cw_serde;

/// Lifecycle of a raffle round. Transitions only move forward:
/// `Idle -> Requested -> Fulfilled`.
#[cw_serde]
pub enum RaffleStatus {
    /// Participants committed, no randomness requested yet.
    Idle,
    /// Waiting for the oracle to deliver random words.
    Requested,
    /// Winners selected. Terminal.
    Fulfilled,
}

impl RaffleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleStatus::Idle => "idle",
            RaffleStatus::Requested => "requested",
            RaffleStatus::Fulfilled => "fulfilled",
        }
    }
}

impl fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
