//! One-shot reads of past logs: the activity backfill and the round history.

use std::cmp::Reverse;
use std::collections::HashMap;

use primitive_types::U256;

use crate::abi::Address;
use crate::chain::{read_rewarder, read_round_stakers, ChainAccessor};
use crate::consts::*;
use crate::error::ChainError;
use crate::event::{Availability, DomainEvent, RawLog, RewardBreakdown};
use crate::normalize::{decode_log, to_domain_event, ContractEvent, Timestamp};
use crate::state::RoundRecord;

/// Block timestamps, fetched once per distinct block.
#[derive(Clone, Debug, Default)]
pub struct BlockTimestamps {
    cache: HashMap<u64, u64>,
}

impl BlockTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unix seconds of `block`.
    pub async fn get<C: ChainAccessor>(&mut self, chain: &C, block: u64) -> Result<u64, ChainError> {
        if let Some(seconds) = self.cache.get(&block) {
            return Ok(*seconds);
        }
        let seconds = chain.block_timestamp(block).await?;
        self.cache.insert(block, seconds);
        Ok(seconds)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Logs of `address` in `[from, to]`, split into node-sized queries. Any
/// failed query fails the whole read.
pub async fn logs_between<C: ChainAccessor>(
    chain: &C,
    address: Address,
    from: u64,
    to: u64,
) -> Result<Vec<RawLog>, ChainError> {
    let mut logs = Vec::new();
    let mut start = from;
    while start <= to {
        let end = to.min(start.saturating_add(MAX_LOG_RANGE_BLOCKS - 1));
        logs.extend(chain.get_logs(address, start, end).await?);
        if end == u64::MAX {
            break;
        }
        start = end + 1;
    }
    Ok(logs)
}

fn is_backfill_event(event: &ContractEvent, round_id: U256) -> bool {
    match event {
        ContractEvent::StakeReceived { round_id: id, .. }
        | ContractEvent::RoundStarted { round_id: id, .. } => *id == round_id,
        ContractEvent::RoundEnded { round_id: id, winner, .. } => {
            !winner.is_zero() && !round_id.is_zero() && *id == round_id - 1
        }
        _ => false,
    }
}

/// Feed events of `round_id` (stakes and its start) plus the end of the
/// previous round, from the last [`BACKFILL_WINDOW_BLOCKS`] blocks. Timestamps
/// come from the source blocks. Newest first.
pub async fn load_historical_events<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    round_id: U256,
) -> Result<Vec<DomainEvent>, ChainError> {
    let latest = chain.block_number().await?;
    let from = latest.saturating_sub(BACKFILL_WINDOW_BLOCKS);
    let logs = logs_between(chain, contract, from, latest).await?;

    let mut timestamps = BlockTimestamps::new();
    let mut events = Vec::new();
    for log in &logs {
        let event = match decode_log(log) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!("dropping log in block {}: {}", log.block_number, e);
                continue;
            }
        };
        if !is_backfill_event(&event, round_id) {
            continue;
        }
        let seconds = timestamps.get(chain, log.block_number).await?;
        if let Some(event) = to_domain_event(event, log, Timestamp::Block { seconds }) {
            events.push(event);
        }
    }

    events.sort_by_key(|e| {
        let position = e.origin.map(|o| (o.block_number, o.log_index));
        Reverse((e.timestamp_ms, position))
    });
    tracing::debug!(
        "backfilled {} events for round {} from blocks {}..={}",
        events.len(),
        round_id,
        from,
        latest
    );
    Ok(events)
}

struct EndedRound {
    round_id: U256,
    winner: Address,
    total_amount: U256,
    block_number: u64,
    tx_hash: Option<[u8; 32]>,
}

/// The last `limit` finished rounds within [`HISTORY_WINDOW_BLOCKS`], newest
/// first, joined with their payouts and stakers where those can be read.
pub async fn fetch_recent_rounds<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    limit: usize,
) -> Result<Vec<RoundRecord>, ChainError> {
    let latest = chain.block_number().await?;
    let from = latest.saturating_sub(HISTORY_WINDOW_BLOCKS);
    let logs = logs_between(chain, contract, from, latest).await?;

    let mut ended = Vec::new();
    let mut payouts: HashMap<U256, (U256, U256, U256)> = HashMap::new();
    for log in &logs {
        match decode_log(log) {
            Ok(ContractEvent::RoundEnded {
                round_id,
                winner,
                total_amount,
            }) => ended.push(EndedRound {
                round_id,
                winner,
                total_amount,
                block_number: log.block_number,
                tx_hash: log.tx_hash,
            }),
            Ok(ContractEvent::RewardsDistributed {
                round_id,
                winner_amount,
                participant_amount,
                treasury_amount,
                ..
            }) => {
                payouts.insert(round_id, (winner_amount, participant_amount, treasury_amount));
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("dropping log in block {}: {}", log.block_number, e),
        }
    }

    let winners_by_round = random_winners(chain, contract, from, latest).await;

    let skip = ended.len().saturating_sub(limit);
    let mut timestamps = BlockTimestamps::new();
    let mut records = Vec::new();
    for round in ended.into_iter().skip(skip).rev() {
        let seconds = timestamps.get(chain, round.block_number).await?;
        let stakers = match read_round_stakers(chain, contract, round.round_id).await {
            Ok(stakers) => Availability::Available(stakers),
            Err(e) => {
                tracing::debug!("stakers of round {} unavailable: {}", round.round_id, e);
                Availability::Unavailable
            }
        };
        let rewards: Availability<RewardBreakdown> = payouts
            .get(&round.round_id)
            .map(|(winner_amount, participant_amount, treasury_amount)| RewardBreakdown {
                winner_amount: *winner_amount,
                participant_amount: *participant_amount,
                treasury_amount: *treasury_amount,
                random_winners: winners_by_round
                    .as_ref()
                    .and_then(|winners| winners.get(&round.round_id).cloned())
                    .into(),
            })
            .into();
        records.push(RoundRecord {
            round_id: round.round_id,
            winner: round.winner,
            total_amount: round.total_amount,
            ended_at_ms: seconds.saturating_mul(1000),
            block_number: round.block_number,
            tx_hash: round.tx_hash,
            stakers,
            rewards,
        });
    }
    Ok(records)
}

/// Random winners per round from the rewarder contract, or `None` when no
/// rewarder is configured or its logs cannot be read.
async fn random_winners<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    from: u64,
    to: u64,
) -> Option<HashMap<U256, Vec<Address>>> {
    let rewarder = match read_rewarder(chain, contract).await {
        Ok(Some(rewarder)) => rewarder,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!("rewarder unavailable: {}", e);
            return None;
        }
    };
    let logs = match logs_between(chain, rewarder, from, to).await {
        Ok(logs) => logs,
        Err(e) => {
            tracing::warn!("failed to read rewarder logs: {}", e);
            return None;
        }
    };
    let mut winners = HashMap::new();
    for log in &logs {
        if let Ok(ContractEvent::RandomRewards {
            round_id,
            winners: list,
            ..
        }) = decode_log(log)
        {
            winners.insert(round_id, list);
        }
    }
    Some(winners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{self, uint_word, Token};
    use crate::chain::mock::MockChain;
    use crate::event::EventKind;
    use crate::normalize::tests::{address_topic, round_ended_log, round_started_log, stake_log};

    const GAME: Address = Address([0xdb; 20]);
    const REWARDER: Address = Address([0xee; 20]);

    fn rewards_log(round_id: u64, block: u64) -> RawLog {
        let data = [70u64, 20, 10]
            .iter()
            .flat_map(|v| uint_word(U256::from(*v)))
            .collect();
        RawLog {
            address: GAME,
            topics: vec![
                abi::event_topic(REWARDS_DISTRIBUTED_SIG),
                uint_word(U256::from(round_id)),
                address_topic(Address([2; 20])),
            ],
            data,
            block_number: block,
            tx_hash: Some([block as u8; 32]),
            log_index: Some(5),
        }
    }

    fn random_rewards_log(round_id: u64, winners: &[Address], block: u64) -> RawLog {
        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(U256::from(96)));
        data.extend_from_slice(&uint_word(U256::from(4)));
        data.extend_from_slice(&uint_word(U256::from(1)));
        data.extend_from_slice(&uint_word(U256::from(winners.len())));
        for winner in winners {
            data.extend_from_slice(&address_topic(*winner));
        }
        RawLog {
            address: REWARDER,
            topics: vec![
                abi::event_topic(RANDOM_REWARDS_SIG),
                uint_word(U256::from(round_id)),
            ],
            data,
            block_number: block,
            tx_hash: Some([block as u8; 32]),
            log_index: Some(0),
        }
    }

    fn address_word(address: Address) -> Vec<u8> {
        address_topic(address).to_vec()
    }

    #[tokio::test]
    async fn test_backfill_selects_round_events() {
        let chain = MockChain::at(20_000);
        let alice = Address([1; 20]);
        chain.push_log(round_ended_log(4, Address([9; 20]), 500, 19_000), 1_000);
        chain.push_log(round_started_log(5, 19_001), 1_010);
        chain.push_log(stake_log(5, alice, 10, 19_500, 0), 1_500);
        chain.push_log(stake_log(5, alice, 10, 19_600, 0), 1_600);
        // Other rounds and undecodable logs are skipped.
        chain.push_log(stake_log(4, alice, 10, 18_000, 0), 900);
        chain.push_log(round_ended_log(3, Address([9; 20]), 500, 17_000), 800);
        let mut junk = stake_log(5, alice, 10, 19_700, 1);
        junk.data.clear();
        chain.push_log(junk, 1_700);

        let events = load_historical_events(&chain, GAME, U256::from(5)).await.unwrap();
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Stake, EventKind::Stake, EventKind::RoundStarted, EventKind::RoundEnded]
        );
        assert_eq!(events[0].timestamp_ms, 1_600_000);
        assert_eq!(events[3].round_id, U256::from(4));
    }

    #[tokio::test]
    async fn test_backfill_window_and_chunking() {
        let chain = MockChain::at(20_000);
        chain.push_log(stake_log(5, Address([1; 20]), 10, 9_999, 0), 1);

        let events = load_historical_events(&chain, GAME, U256::from(5)).await.unwrap();
        assert!(events.is_empty());

        let queries = chain.log_queries.borrow();
        assert_eq!(queries.first(), Some(&(GAME, 10_000, 10_999)));
        assert_eq!(queries.last(), Some(&(GAME, 20_000, 20_000)));
        assert_eq!(queries.len(), 11);
    }

    #[tokio::test]
    async fn test_backfill_fetches_each_block_once() {
        let chain = MockChain::at(100);
        for index in 0..3 {
            chain.push_log(stake_log(1, Address([1; 20]), 10, 50, index), 5);
        }
        let events = load_historical_events(&chain, GAME, U256::one()).await.unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(chain.timestamp_requests.get(), 1);
        // Same block and timestamp: later log first.
        assert_eq!(events[0].origin.unwrap().log_index, 2);
    }

    #[tokio::test]
    async fn test_backfill_failure_is_an_error() {
        let chain = MockChain::at(100);
        chain.fail_logs.set(true);
        assert!(load_historical_events(&chain, GAME, U256::one()).await.is_err());
    }

    #[tokio::test]
    async fn test_recent_rounds_join_optional_data() {
        let chain = MockChain::at(5_000);
        chain.answer(REWARDER_CONTRACT_SIG, &[], address_word(REWARDER));
        chain.answer(
            GET_ROUND_STAKERS_SIG,
            &[Token::Uint(U256::from(8))],
            [
                uint_word(U256::from(32)).to_vec(),
                uint_word(U256::from(1)).to_vec(),
                address_word(Address([2; 20])),
            ]
            .concat(),
        );

        chain.push_log(round_ended_log(7, Address([1; 20]), 100, 4_500), 10);
        chain.push_log(round_ended_log(8, Address([2; 20]), 200, 4_800), 20);
        chain.push_log(rewards_log(8, 4_801), 21);
        chain.push_log(random_rewards_log(8, &[Address([3; 20])], 4_802), 22);

        let rounds = fetch_recent_rounds(&chain, GAME, 10).await.unwrap();
        assert_eq!(rounds.len(), 2);

        let newest = &rounds[0];
        assert_eq!(newest.round_id, U256::from(8));
        assert_eq!(newest.ended_at_ms, 20_000);
        assert_eq!(newest.stakers, Availability::Available(vec![Address([2; 20])]));
        let rewards = newest.rewards.as_option().unwrap();
        assert_eq!(rewards.winner_amount, U256::from(70));
        assert_eq!(rewards.treasury_amount, U256::from(10));
        assert_eq!(
            rewards.random_winners,
            Availability::Available(vec![Address([3; 20])])
        );

        // Nothing known about round 7 beyond its end: no guessed payout.
        let oldest = &rounds[1];
        assert_eq!(oldest.round_id, U256::from(7));
        assert_eq!(oldest.stakers, Availability::Unavailable);
        assert_eq!(oldest.rewards, Availability::Unavailable);
    }

    #[tokio::test]
    async fn test_recent_rounds_respects_limit_and_missing_rewarder() {
        let chain = MockChain::at(5_000);
        chain.answer(REWARDER_CONTRACT_SIG, &[], vec![0u8; 32]);
        for round in 1..=5u64 {
            chain.push_log(round_ended_log(round, Address([1; 20]), 1, 4_100 + round), round);
        }
        chain.push_log(rewards_log(5, 4_200), 6);

        let rounds = fetch_recent_rounds(&chain, GAME, 2).await.unwrap();
        let ids: Vec<U256> = rounds.iter().map(|r| r.round_id).collect();
        assert_eq!(ids, vec![U256::from(5), U256::from(4)]);
        let rewards = rounds[0].rewards.as_option().unwrap();
        assert_eq!(rewards.random_winners, Availability::Unavailable);
        assert_eq!(rounds[1].rewards, Availability::Unavailable);
    }
}
