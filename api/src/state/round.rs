use primitive_types::U256;
use serde::Serialize;

use crate::abi::{saturating_u64, Address, Words};
use crate::consts::BUFFER_THRESHOLD_SECS;
use crate::countdown::CountdownState;
use crate::error::DecodeError;
use crate::poll::PollSequencer;

/// Result of `getCurrentRoundInfo()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    /// The round number.
    pub round_id: U256,

    /// The most recent staker, zero before the first stake.
    pub last_staker: Address,

    /// The prize pool, in contract units.
    pub total_amount: U256,

    /// Unix seconds at which the round ends unless extended.
    pub deadline: u64,

    pub is_active: bool,

    /// Number of stakes placed in the round.
    pub stakers_count: U256,

    /// Unix seconds at which staking opens.
    pub staking_available_at: u64,
}

impl RoundSnapshot {
    pub const WORDS: usize = 7;

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let words = Words::exact(data, Self::WORDS)?;
        Ok(Self {
            round_id: words.uint(0)?,
            last_staker: words.address(1)?,
            total_amount: words.uint(2)?,
            deadline: saturating_u64(words.uint(3)?),
            is_active: words.boolean(4)?,
            stakers_count: words.uint(5)?,
            staking_available_at: saturating_u64(words.uint(6)?),
        })
    }

    /// `pct` percent of the current pool, rounded down. What the pool would
    /// pay out if the round ended now.
    pub fn projected_share(&self, pct: u64) -> U256 {
        self.total_amount.saturating_mul(U256::from(pct)) / U256::from(100)
    }

    /// The leading staker, if anyone has staked yet.
    pub fn leader(&self) -> Option<Address> {
        (!self.last_staker.is_zero()).then_some(self.last_staker)
    }
}

/// One poll of the round: the snapshot plus the timing reads taken with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoundPoll {
    pub snapshot: RoundSnapshot,

    /// `getTimeRemaining()`, seconds.
    pub time_remaining: u64,

    /// `getTimeUntilStakingAvailable()`, seconds.
    pub time_until_staking: u64,

    /// `isStakingAvailable()`.
    pub staking_available: bool,
}

impl RoundPoll {
    pub fn round_id(&self) -> U256 {
        self.snapshot.round_id
    }

    /// Anchors a countdown on this poll, received at `now_ms`.
    pub fn countdown(&self, now_ms: u64, threshold: u64) -> CountdownState {
        CountdownState::anchor_with_threshold(
            self.snapshot.is_active,
            self.time_remaining,
            self.time_until_staking,
            now_ms,
            threshold,
        )
    }
}

/// Outcome of applying a poll to a [`RoundTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundUpdate {
    /// The round id differs from the previously applied poll, or this is the
    /// first poll. Views reload their round-scoped data on this.
    pub round_changed: bool,
}

/// Latest applied round poll and the countdown anchored on it.
#[derive(Clone, Debug)]
pub struct RoundTracker {
    sequencer: PollSequencer,
    poll: Option<RoundPoll>,
    countdown: Option<CountdownState>,
    threshold: u64,
}

impl Default for RoundTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundTracker {
    pub fn new() -> Self {
        Self::with_threshold(BUFFER_THRESHOLD_SECS)
    }

    pub fn with_threshold(threshold: u64) -> Self {
        Self {
            sequencer: PollSequencer::new(),
            poll: None,
            countdown: None,
            threshold,
        }
    }

    /// Sequencer to tag poll requests with. Clones share state.
    pub fn sequencer(&self) -> PollSequencer {
        self.sequencer.clone()
    }

    pub fn poll(&self) -> Option<&RoundPoll> {
        self.poll.as_ref()
    }

    pub fn countdown(&self) -> Option<&CountdownState> {
        self.countdown.as_ref()
    }

    /// Applies the response to request `seq`, re-anchoring the countdown.
    /// Returns `None` for a stale response, which is discarded.
    pub fn apply(&mut self, seq: u64, poll: RoundPoll, now_ms: u64) -> Option<RoundUpdate> {
        if !self.sequencer.accept(seq) {
            tracing::debug!("discarding stale round poll {}", seq);
            return None;
        }
        let round_changed = self.poll.map_or(true, |prev| prev.round_id() != poll.round_id());
        self.countdown = Some(poll.countdown(now_ms, self.threshold));
        self.poll = Some(poll);
        Some(RoundUpdate { round_changed })
    }

    /// Advances the countdown to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Option<CountdownState> {
        let countdown = self.countdown.as_mut()?;
        countdown.tick(now_ms);
        Some(*countdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::uint_word;
    use crate::countdown::Phase;

    fn round_info_data(round_id: u64, is_active: bool) -> Vec<u8> {
        let mut staker = [0u8; 32];
        staker[12..].copy_from_slice(&[0x11; 20]);
        let words = [
            uint_word(U256::from(round_id)),
            staker,
            uint_word(U256::from(300_000_000u64)),
            uint_word(U256::from(1_700_000_600u64)),
            uint_word(U256::from(is_active as u64)),
            uint_word(U256::from(3)),
            uint_word(U256::from(1_700_000_000u64)),
        ];
        words.concat()
    }

    fn poll(round_id: u64, time_remaining: u64) -> RoundPoll {
        RoundPoll {
            snapshot: RoundSnapshot {
                round_id: U256::from(round_id),
                is_active: true,
                ..RoundSnapshot::default()
            },
            time_remaining,
            time_until_staking: 0,
            staking_available: true,
        }
    }

    #[test]
    fn test_decode_round_info() {
        let snapshot = RoundSnapshot::decode(&round_info_data(5, true)).unwrap();
        assert_eq!(snapshot.round_id, U256::from(5));
        assert_eq!(snapshot.last_staker, Address([0x11; 20]));
        assert_eq!(snapshot.leader(), Some(Address([0x11; 20])));
        assert_eq!(snapshot.total_amount, U256::from(300_000_000u64));
        assert_eq!(snapshot.deadline, 1_700_000_600);
        assert!(snapshot.is_active);
        assert_eq!(snapshot.stakers_count, U256::from(3));
        assert_eq!(snapshot.staking_available_at, 1_700_000_000);
    }

    #[test]
    fn test_projected_share() {
        let snapshot = RoundSnapshot {
            total_amount: U256::from(1_000),
            ..RoundSnapshot::default()
        };
        assert_eq!(snapshot.projected_share(70), U256::from(700));
        assert_eq!(snapshot.projected_share(10), U256::from(100));
    }

    #[test]
    fn test_decode_round_info_rejects_bad_shape() {
        let mut data = round_info_data(5, true);
        data.pop();
        assert!(RoundSnapshot::decode(&data).is_err());

        let mut data = round_info_data(5, true);
        data[4 * 32 + 31] = 2;
        assert_eq!(RoundSnapshot::decode(&data), Err(DecodeError::InvalidBool(4)));
    }

    #[test]
    fn test_tracker_discards_stale_poll() {
        let mut tracker = RoundTracker::new();
        let sequencer = tracker.sequencer();
        let slow = sequencer.issue();
        let fast = sequencer.issue();

        assert!(tracker.apply(fast, poll(2, 900), 0).is_some());
        assert!(tracker.apply(slow, poll(1, 50), 10).is_none());
        assert_eq!(tracker.poll().unwrap().round_id(), U256::from(2));
        assert_eq!(tracker.countdown().unwrap().seconds_remaining, 900);
    }

    #[test]
    fn test_tracker_reports_round_change() {
        let mut tracker = RoundTracker::new();
        let sequencer = tracker.sequencer();
        let update = tracker.apply(sequencer.issue(), poll(1, 900), 0).unwrap();
        assert!(update.round_changed);
        let update = tracker.apply(sequencer.issue(), poll(1, 890), 10_000).unwrap();
        assert!(!update.round_changed);
        let update = tracker.apply(sequencer.issue(), poll(2, 3600), 20_000).unwrap();
        assert!(update.round_changed);
    }

    #[test]
    fn test_tracker_ticks_between_polls() {
        let mut tracker = RoundTracker::new();
        assert!(tracker.tick(0).is_none());
        let seq = tracker.sequencer().issue();
        tracker.apply(seq, poll(1, 605), 0);
        let state = tracker.tick(5_000).unwrap();
        assert_eq!(state.seconds_remaining, 600);
        assert_eq!(state.phase, Phase::Buffer);
    }
}
