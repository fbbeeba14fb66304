use std::fmt;

use primitive_types::U256;
use serde::Deserialize;

use crate::abi::Address;

/// A log entry as returned by `eth_getLogs`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
    pub block_number: u64,
    pub tx_hash: Option<[u8; 32]>,
    pub log_index: Option<u64>,
}

impl RawLog {
    /// Identity of the source log, when the node reported one.
    pub fn origin(&self) -> Option<LogOrigin> {
        match (self.tx_hash, self.log_index) {
            (Some(tx_hash), Some(log_index)) => Some(LogOrigin {
                block_number: self.block_number,
                tx_hash,
                log_index,
            }),
            _ => None,
        }
    }
}

/// Position of an event's source log on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogOrigin {
    pub block_number: u64,
    pub tx_hash: [u8; 32],
    pub log_index: u64,
}

/// JSON shape of a log in `eth_getLogs` responses.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    pub block_number: Option<String>,
    pub transaction_hash: Option<String>,
    pub log_index: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Stake,
    RoundStarted,
    RoundEnded,
}

impl EventKind {
    /// Prefix of the event's feed id.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EventKind::Stake => "stake",
            EventKind::RoundStarted => "round-start",
            EventKind::RoundEnded => "round-end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

/// A value that a richer upstream source may or may not have provided.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Availability<T> {
    Available(T),
    #[default]
    Unavailable,
}

impl<T> Availability<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Availability::Available(value) => Some(value),
            Availability::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }
}

impl<T> From<Option<T>> for Availability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Availability::Available(value),
            None => Availability::Unavailable,
        }
    }
}

/// Payout of a finished round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardBreakdown {
    pub winner_amount: U256,
    pub participant_amount: U256,
    pub treasury_amount: U256,
    pub random_winners: Availability<Vec<Address>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventPayload {
    Stake {
        staker: Address,
        amount: U256,
        new_deadline: U256,
    },
    RoundStarted {
        deadline: U256,
        staking_start_time: U256,
    },
    RoundEnded {
        winner: Address,
        total_amount: U256,
        stakers: Availability<Vec<Address>>,
        rewards: Availability<RewardBreakdown>,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Stake { .. } => EventKind::Stake,
            EventPayload::RoundStarted { .. } => EventKind::RoundStarted,
            EventPayload::RoundEnded { .. } => EventKind::RoundEnded,
        }
    }
}

/// A typed game event ready for the activity feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainEvent {
    pub id: String,
    pub round_id: U256,
    pub timestamp_ms: u64,
    pub origin: Option<LogOrigin>,
    pub payload: EventPayload,
}

impl DomainEvent {
    /// Builds an event whose id is derived from its source log, or synthesized
    /// from round and time when the log identity is unknown.
    pub fn new(
        round_id: U256,
        timestamp_ms: u64,
        origin: Option<LogOrigin>,
        payload: EventPayload,
    ) -> Self {
        let kind = payload.kind();
        let id = match &origin {
            Some(origin) => format!(
                "{}-0x{}-{}",
                kind.id_prefix(),
                hex::encode(origin.tx_hash),
                origin.log_index
            ),
            None => format!("{}-{}-{}", kind.id_prefix(), round_id, timestamp_ms),
        };
        Self {
            id,
            round_id,
            timestamp_ms,
            origin,
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// A `RoundEnded` without a winner carries no activity.
    pub fn is_winnerless_round_end(&self) -> bool {
        matches!(&self.payload, EventPayload::RoundEnded { winner, .. } if winner.is_zero())
    }
}
