use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use lsw_api::abi::{self, uint_word};
use lsw_api::normalize::parse_rpc_log;
use lsw_api::prelude::*;

const GAME: Address = Address([0xdb; 20]);

#[derive(Default)]
struct Chain {
    latest: Cell<u64>,
    logs: RefCell<Vec<RawLog>>,
    timestamps: RefCell<HashMap<u64, u64>>,
}

impl Chain {
    fn push(&self, log: RawLog, timestamp: u64) {
        self.timestamps.borrow_mut().insert(log.block_number, timestamp);
        self.logs.borrow_mut().push(log);
    }
}

impl ChainAccessor for Chain {
    async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(self.latest.get())
    }

    async fn call(&self, _to: Address, _data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        Err(ChainError::MissingResult("eth_call"))
    }

    async fn get_logs(&self, address: Address, from: u64, to: u64) -> Result<Vec<RawLog>, ChainError> {
        Ok(self
            .logs
            .borrow()
            .iter()
            .filter(|l| l.address == address && l.block_number >= from && l.block_number <= to)
            .cloned()
            .collect())
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, ChainError> {
        self.timestamps
            .borrow()
            .get(&block)
            .copied()
            .ok_or(ChainError::BlockNotFound(block))
    }
}

fn stake(round_id: u64, staker: u8, block: u64) -> RawLog {
    let mut staker_topic = [0u8; 32];
    staker_topic[12..].copy_from_slice(&[staker; 20]);
    let data = [uint_word(U256::from(1_000_000u64)), uint_word(U256::from(1_700_000_000u64))].concat();
    RawLog {
        address: GAME,
        topics: vec![
            abi::event_topic(STAKE_RECEIVED_SIG),
            uint_word(U256::from(round_id)),
            staker_topic,
        ],
        data,
        block_number: block,
        tx_hash: Some(abi::keccak256(&block.to_be_bytes())),
        log_index: Some(0),
    }
}

#[tokio::test]
async fn live_event_racing_the_backfill_is_kept_once() {
    let chain = Chain::default();
    chain.latest.set(1_000);
    chain.push(stake(3, 1, 900), 1_700_000_100);
    chain.push(stake(3, 2, 950), 1_700_000_200);

    let mut feed = ActivityFeed::new();
    let mut poller = LiveLogPoller::new(GAME);
    assert!(poller.poll(&chain, 0).await.unwrap().is_empty());

    // A stake lands and the live poller sees it before the backfill returns.
    chain.push(stake(3, 3, 1_001), 1_700_000_300);
    chain.latest.set(1_001);
    for event in poller.poll(&chain, 1_700_000_301_000).await.unwrap() {
        assert!(feed.append_live(event));
    }

    let historical = load_historical_events(&chain, GAME, U256::from(3)).await.unwrap();
    assert_eq!(historical.len(), 3);
    feed.load_historical(historical);

    assert_eq!(feed.len(), 3);
    let times: Vec<u64> = feed.iter().map(|e| e.timestamp_ms).collect();
    assert_eq!(times, vec![1_700_000_300_000, 1_700_000_200_000, 1_700_000_100_000]);
}

#[tokio::test]
async fn redelivered_live_log_is_ignored() {
    let chain = Chain::default();
    chain.latest.set(10);
    let mut feed = ActivityFeed::new();
    feed.load_historical(vec![]);

    let log = stake(1, 1, 10);
    chain.push(log.clone(), 1_700_000_000);
    let historical = load_historical_events(&chain, GAME, U256::one()).await.unwrap();
    feed.load_historical(historical);

    let live = lsw_api::normalize::normalize(&log, lsw_api::normalize::Timestamp::Observed { now_ms: 5 });
    assert!(!feed.append_live(live.unwrap()));
    assert_eq!(feed.len(), 1);
}

#[test]
fn rpc_log_without_identity_gets_synthesized_id() {
    let json = serde_json::json!({
        "address": GAME.to_string(),
        "topics": [
            abi::encode_hex(&abi::event_topic(ROUND_STARTED_SIG)),
            abi::encode_hex(&uint_word(U256::from(9))),
            abi::encode_hex(&uint_word(U256::from(100))),
            abi::encode_hex(&uint_word(U256::from(50))),
        ],
        "data": "0x",
    });
    let rpc: RpcLog = serde_json::from_value(json).unwrap();
    let raw = parse_rpc_log(&rpc).unwrap();
    let event = lsw_api::normalize::normalize(&raw, lsw_api::normalize::Timestamp::Observed { now_ms: 77 })
        .unwrap();
    assert_eq!(event.id, "round-start-9-77");
}

#[test]
fn countdown_follows_the_clock_between_polls() {
    let mut tracker = RoundTracker::new();
    let seq = tracker.sequencer().issue();
    let poll = RoundPoll {
        snapshot: RoundSnapshot {
            round_id: U256::one(),
            is_active: true,
            ..RoundSnapshot::default()
        },
        time_remaining: 605,
        time_until_staking: 0,
        staking_available: true,
    };
    tracker.apply(seq, poll, 0).unwrap();

    let states: Vec<(u64, Phase)> = [4_000u64, 5_000, 10_000, 605_000]
        .iter()
        .filter_map(|t| tracker.tick(*t))
        .map(|s| (s.seconds_remaining, s.phase))
        .collect();
    assert_eq!(
        states,
        vec![
            (601, Phase::Active),
            (600, Phase::Buffer),
            (595, Phase::Buffer),
            (0, Phase::Expired),
        ]
    );
    assert_eq!(format_mmss(3661), "61:01");
}

#[tokio::test]
async fn anonymous_stakes_in_one_block_survive_backfill() {
    let chain = Chain::default();
    chain.latest.set(7);
    for staker in [1u8, 2] {
        let mut log = stake(1, staker, 7);
        log.tx_hash = None;
        log.log_index = None;
        chain.push(log, 1_700_000_000);
    }

    let historical = load_historical_events(&chain, GAME, U256::one()).await.unwrap();
    assert_eq!(historical.len(), 2);
    assert_eq!(historical[0].id, historical[1].id);

    let mut feed = ActivityFeed::new();
    feed.load_historical(historical);
    assert_eq!(feed.len(), 2);
    let stakers: Vec<Address> = feed
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::Stake { staker, .. } => Some(*staker),
            _ => None,
        })
        .collect();
    assert!(stakers.contains(&Address([1; 20])));
    assert!(stakers.contains(&Address([2; 20])));
}
