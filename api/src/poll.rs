//! Building blocks shared by the polling loops.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::consts::{LIVE_START_LOOKBACK_BLOCKS, MAX_LOG_RANGE_BLOCKS};

/// High-water-mark of a log subscription emulated by polling `eth_getLogs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogCursor {
    high_water_mark: Option<u64>,
    max_range: u64,
    initial_lookback: u64,
}

impl Default for LogCursor {
    fn default() -> Self {
        Self::new(MAX_LOG_RANGE_BLOCKS, LIVE_START_LOOKBACK_BLOCKS)
    }
}

impl LogCursor {
    pub fn new(max_range: u64, initial_lookback: u64) -> Self {
        Self {
            high_water_mark: None,
            max_range: max_range.max(1),
            initial_lookback,
        }
    }

    pub fn high_water_mark(&self) -> Option<u64> {
        self.high_water_mark
    }

    /// Inclusive block range to query next, or `None` when caught up with
    /// `latest`.
    pub fn next_range(&self, latest: u64) -> Option<(u64, u64)> {
        let from = match self.high_water_mark {
            Some(hwm) => hwm.saturating_add(1),
            None => latest.saturating_sub(self.initial_lookback),
        };
        if from > latest {
            return None;
        }
        let to = latest.min(from.saturating_add(self.max_range - 1));
        Some((from, to))
    }

    /// Records a successfully processed range. Never moves backwards.
    pub fn advance(&mut self, to: u64) {
        self.high_water_mark = Some(self.high_water_mark.map_or(to, |hwm| hwm.max(to)));
    }
}

/// Orders overlapping requests of one poll loop. Responses carrying an older
/// sequence number than the last applied one are stale.
#[derive(Clone, Debug, Default)]
pub struct PollSequencer {
    issued: Arc<AtomicU64>,
    applied: Arc<AtomicU64>,
}

impl PollSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number for a new request. Starts at 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the response for `seq` may be applied. Marks it applied if so.
    pub fn accept(&self, seq: u64) -> bool {
        let previous = self.applied.fetch_max(seq, Ordering::SeqCst);
        seq > previous
    }
}

/// Cancellation flag shared between a view and its timers.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Stops every loop holding a clone. Calling it again is a no-op.
    pub fn stop(&self) {
        if self.0.swap(false, Ordering::SeqCst) {
            tracing::debug!("liveness stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_first_range_starts_at_latest() {
        let cursor = LogCursor::default();
        assert_eq!(cursor.next_range(500), Some((500, 500)));

        let cursor = LogCursor::new(1_000, 20);
        assert_eq!(cursor.next_range(500), Some((480, 500)));
        assert_eq!(cursor.next_range(5), Some((0, 5)));
    }

    #[test]
    fn test_cursor_advances_and_catches_up() {
        let mut cursor = LogCursor::new(1_000, 0);
        let (_, to) = cursor.next_range(100).unwrap();
        cursor.advance(to);
        assert_eq!(cursor.next_range(100), None);
        assert_eq!(cursor.next_range(103), Some((101, 103)));
    }

    #[test]
    fn test_failed_query_repeats_range() {
        let mut cursor = LogCursor::new(1_000, 0);
        cursor.advance(100);
        let range = cursor.next_range(110);
        // Query failed: nothing advanced, the same range is retried.
        assert_eq!(cursor.next_range(110), range);
    }

    #[test]
    fn test_cursor_caps_range() {
        let mut cursor = LogCursor::new(10, 0);
        cursor.advance(100);
        assert_eq!(cursor.next_range(1_000), Some((101, 110)));
        cursor.advance(110);
        assert_eq!(cursor.next_range(1_000), Some((111, 120)));
    }

    #[test]
    fn test_cursor_never_moves_backwards() {
        let mut cursor = LogCursor::default();
        cursor.advance(50);
        cursor.advance(40);
        assert_eq!(cursor.high_water_mark(), Some(50));
    }

    #[test]
    fn test_sequencer_discards_stale_responses() {
        let sequencer = PollSequencer::new();
        let first = sequencer.issue();
        let second = sequencer.issue();
        assert!(second > first);

        assert!(sequencer.accept(second));
        assert!(!sequencer.accept(first));
        assert!(!sequencer.accept(second));

        let third = sequencer.issue();
        assert!(sequencer.accept(third));
    }

    #[test]
    fn test_sequencer_clones_share_state() {
        let sequencer = PollSequencer::new();
        let clone = sequencer.clone();
        let seq = clone.issue();
        assert_eq!(sequencer.issue(), seq + 1);
    }

    #[test]
    fn test_liveness_stop_is_idempotent() {
        let liveness = Liveness::new();
        let handle = liveness.clone();
        assert!(handle.is_alive());
        liveness.stop();
        liveness.stop();
        assert!(!handle.is_alive());
    }
}
