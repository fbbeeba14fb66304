//! Event normalizer: raw logs in, typed domain events out.
//!
//! Decoding is schema-first and fails closed. A log is matched on `topics[0]`
//! against the known signatures, then the topic count and data length must match
//! the schema exactly. Anything else is a [`DecodeError`]; callers on the feed
//! path drop such logs without interrupting the rest of the batch.

use primitive_types::U256;

use crate::abi::{self, address_from_word, Address, Words};
use crate::consts::*;
use crate::error::DecodeError;
use crate::event::{Availability, DomainEvent, EventPayload, RawLog, RpcLog};

/// A decoded log of the game or rewarder contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractEvent {
    StakeReceived {
        round_id: U256,
        staker: Address,
        amount: U256,
        new_deadline: U256,
    },
    RoundStarted {
        round_id: U256,
        deadline: U256,
        staking_start_time: U256,
    },
    RoundEnded {
        round_id: U256,
        winner: Address,
        total_amount: U256,
    },
    RewardsDistributed {
        round_id: U256,
        winner: Address,
        winner_amount: U256,
        participant_amount: U256,
        treasury_amount: U256,
    },
    RandomRewards {
        round_id: U256,
        winners: Vec<Address>,
        reward_per_winner: U256,
        treasury_amount: U256,
    },
}

impl ContractEvent {
    pub fn round_id(&self) -> U256 {
        match self {
            ContractEvent::StakeReceived { round_id, .. }
            | ContractEvent::RoundStarted { round_id, .. }
            | ContractEvent::RoundEnded { round_id, .. }
            | ContractEvent::RewardsDistributed { round_id, .. }
            | ContractEvent::RandomRewards { round_id, .. } => *round_id,
        }
    }
}

/// Where an event's timestamp comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timestamp {
    /// Historical path: the source block's timestamp, in unix seconds.
    Block { seconds: u64 },
    /// Live path: wall-clock time at which the log was observed.
    Observed { now_ms: u64 },
}

impl Timestamp {
    pub fn as_millis(&self) -> u64 {
        match self {
            Timestamp::Block { seconds } => seconds.saturating_mul(1000),
            Timestamp::Observed { now_ms } => *now_ms,
        }
    }
}

fn expect_topics(log: &RawLog, expected: usize) -> Result<(), DecodeError> {
    if log.topics.len() != expected {
        return Err(DecodeError::TopicCount {
            expected,
            found: log.topics.len(),
        });
    }
    Ok(())
}

fn topic_uint(log: &RawLog, index: usize) -> U256 {
    U256::from_big_endian(&log.topics[index])
}

fn topic_address(log: &RawLog, index: usize) -> Result<Address, DecodeError> {
    address_from_word(&log.topics[index]).ok_or(DecodeError::InvalidAddress(index))
}

/// Decodes a log against the known schemas.
pub fn decode_log(log: &RawLog) -> Result<ContractEvent, DecodeError> {
    let signature = log.topics.first().ok_or(DecodeError::MissingSignature)?;

    if *signature == abi::event_topic(STAKE_RECEIVED_SIG) {
        expect_topics(log, 3)?;
        let words = Words::exact(&log.data, 2)?;
        Ok(ContractEvent::StakeReceived {
            round_id: topic_uint(log, 1),
            staker: topic_address(log, 2)?,
            amount: words.uint(0)?,
            new_deadline: words.uint(1)?,
        })
    } else if *signature == abi::event_topic(ROUND_STARTED_SIG) {
        expect_topics(log, 4)?;
        Words::exact(&log.data, 0)?;
        Ok(ContractEvent::RoundStarted {
            round_id: topic_uint(log, 1),
            deadline: topic_uint(log, 2),
            staking_start_time: topic_uint(log, 3),
        })
    } else if *signature == abi::event_topic(ROUND_ENDED_SIG) {
        expect_topics(log, 3)?;
        let words = Words::exact(&log.data, 1)?;
        Ok(ContractEvent::RoundEnded {
            round_id: topic_uint(log, 1),
            winner: topic_address(log, 2)?,
            total_amount: words.uint(0)?,
        })
    } else if *signature == abi::event_topic(REWARDS_DISTRIBUTED_SIG) {
        expect_topics(log, 3)?;
        let words = Words::exact(&log.data, 3)?;
        Ok(ContractEvent::RewardsDistributed {
            round_id: topic_uint(log, 1),
            winner: topic_address(log, 2)?,
            winner_amount: words.uint(0)?,
            participant_amount: words.uint(1)?,
            treasury_amount: words.uint(2)?,
        })
    } else if *signature == abi::event_topic(RANDOM_REWARDS_SIG) {
        expect_topics(log, 2)?;
        let words = Words::dynamic(&log.data)?;
        Ok(ContractEvent::RandomRewards {
            round_id: topic_uint(log, 1),
            winners: words.address_array(0)?,
            reward_per_winner: words.uint(1)?,
            treasury_amount: words.uint(2)?,
        })
    } else {
        Err(DecodeError::UnknownSignature(abi::encode_hex(signature)))
    }
}

/// Turns a decoded contract event into a feed event. Reward payouts are not
/// feed activity and yield `None`.
pub fn to_domain_event(
    event: ContractEvent,
    log: &RawLog,
    timestamp: Timestamp,
) -> Option<DomainEvent> {
    let round_id = event.round_id();
    let payload = match event {
        ContractEvent::StakeReceived {
            staker,
            amount,
            new_deadline,
            ..
        } => EventPayload::Stake {
            staker,
            amount,
            new_deadline,
        },
        ContractEvent::RoundStarted {
            deadline,
            staking_start_time,
            ..
        } => EventPayload::RoundStarted {
            deadline,
            staking_start_time,
        },
        ContractEvent::RoundEnded {
            winner,
            total_amount,
            ..
        } => EventPayload::RoundEnded {
            winner,
            total_amount,
            stakers: Availability::Unavailable,
            rewards: Availability::Unavailable,
        },
        ContractEvent::RewardsDistributed { .. } | ContractEvent::RandomRewards { .. } => {
            return None
        }
    };
    Some(DomainEvent::new(
        round_id,
        timestamp.as_millis(),
        log.origin(),
        payload,
    ))
}

/// Decodes a log into a feed event. Decode failures are logged and dropped.
pub fn normalize(log: &RawLog, timestamp: Timestamp) -> Option<DomainEvent> {
    match decode_log(log) {
        Ok(event) => to_domain_event(event, log, timestamp),
        Err(e) => {
            tracing::debug!("dropping log in block {}: {}", log.block_number, e);
            None
        }
    }
}

/// Normalizes a batch, skipping undecodable logs.
pub fn normalize_all(logs: &[RawLog], timestamp: impl Fn(&RawLog) -> Timestamp) -> Vec<DomainEvent> {
    logs.iter()
        .filter_map(|log| normalize(log, timestamp(log)))
        .collect()
}

/// Parses the JSON-RPC form of a log.
pub fn parse_rpc_log(log: &RpcLog) -> Result<RawLog, DecodeError> {
    let topics = log
        .topics
        .iter()
        .map(|topic| {
            let bytes = abi::decode_hex(topic)?;
            bytes
                .try_into()
                .map_err(|_| DecodeError::InvalidHex(topic.clone()))
        })
        .collect::<Result<Vec<[u8; 32]>, _>>()?;
    let tx_hash: Option<[u8; 32]> = match &log.transaction_hash {
        Some(hash) => Some(
            abi::decode_hex(hash)?
                .try_into()
                .map_err(|_| DecodeError::InvalidHex(hash.clone()))?,
        ),
        None => None,
    };
    Ok(RawLog {
        address: log.address.parse()?,
        topics,
        data: abi::decode_hex(&log.data)?,
        block_number: log
            .block_number
            .as_deref()
            .map(abi::parse_quantity_u64)
            .transpose()?
            .unwrap_or_default(),
        tx_hash,
        log_index: log
            .log_index
            .as_deref()
            .map(abi::parse_quantity_u64)
            .transpose()?,
    })
}
