//! Countdown derivation.
//!
//! Round state is polled every few seconds but displayed every second. Each
//! snapshot sets an anchor (wall-clock time of receipt and seconds remaining at
//! that time); every tick derives the current remaining seconds from the
//! anchor and elapsed time, and re-derives the phase from scratch. An active
//! countdown therefore moves into the buffer period and then expires on its
//! own, without waiting for the next snapshot.

use std::fmt;

use crate::consts::BUFFER_THRESHOLD_SECS;
use crate::format::format_mmss;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Round not active yet; counting down to staking opening.
    #[default]
    Waiting,
    /// Active with more than the buffer threshold left.
    Active,
    /// Active, at or below the threshold: a stake extends the deadline.
    Buffer,
    /// Active round with no time left.
    Expired,
}

impl Phase {
    /// Pure function of the round's activity flag and the remaining seconds.
    /// `remaining == threshold` is a buffer, not active.
    pub fn classify(is_active: bool, remaining: u64, threshold: u64) -> Phase {
        if !is_active {
            Phase::Waiting
        } else if remaining == 0 {
            Phase::Expired
        } else if remaining <= threshold {
            Phase::Buffer
        } else {
            Phase::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Waiting => "Staking Opens In",
            Phase::Active => "Time Remaining",
            Phase::Buffer => "Buffer Period - Staking Extends Deadline",
            Phase::Expired => "Round Expired",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownState {
    pub phase: Phase,
    pub seconds_remaining: u64,
    pub anchor_wall_clock_ms: u64,
    pub anchor_remaining: u64,
    pub is_active: bool,
    pub threshold: u64,
}

impl CountdownState {
    /// Anchors a new countdown on a fresh snapshot received at `now_ms`.
    /// An active round counts down `time_remaining`; an inactive one counts
    /// down `time_until_staking`.
    pub fn anchor(is_active: bool, time_remaining: u64, time_until_staking: u64, now_ms: u64) -> Self {
        Self::anchor_with_threshold(
            is_active,
            time_remaining,
            time_until_staking,
            now_ms,
            BUFFER_THRESHOLD_SECS,
        )
    }

    pub fn anchor_with_threshold(
        is_active: bool,
        time_remaining: u64,
        time_until_staking: u64,
        now_ms: u64,
        threshold: u64,
    ) -> Self {
        let anchor_remaining = if is_active {
            time_remaining
        } else {
            time_until_staking
        };
        Self {
            phase: Phase::classify(is_active, anchor_remaining, threshold),
            seconds_remaining: anchor_remaining,
            anchor_wall_clock_ms: now_ms,
            anchor_remaining,
            is_active,
            threshold,
        }
    }

    /// Seconds remaining at `now_ms`, never negative. Clock readings earlier
    /// than the anchor count as zero elapsed.
    pub fn remaining_at(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.anchor_wall_clock_ms) / 1000;
        self.anchor_remaining.saturating_sub(elapsed)
    }

    /// Recomputes remaining seconds and phase for `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.seconds_remaining = self.remaining_at(now_ms);
        self.phase = Phase::classify(self.is_active, self.seconds_remaining, self.threshold);
    }

    /// `MM:SS` of the current remaining seconds.
    pub fn display(&self) -> String {
        format_mmss(self.seconds_remaining)
    }
}
