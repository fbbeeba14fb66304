use crate::abi::Address;
use crate::chain::ChainAccessor;
use crate::error::ChainError;
use crate::event::DomainEvent;
use crate::normalize::{normalize_all, Timestamp};
use crate::poll::LogCursor;

/// Live event source: polls the game contract's new logs since the last
/// successful poll and normalizes them with wall-clock timestamps.
#[derive(Clone, Debug)]
pub struct LiveLogPoller {
    contract: Address,
    cursor: LogCursor,
}

impl LiveLogPoller {
    pub fn new(contract: Address) -> Self {
        Self::with_cursor(contract, LogCursor::default())
    }

    pub fn with_cursor(contract: Address, cursor: LogCursor) -> Self {
        Self { contract, cursor }
    }

    pub fn cursor(&self) -> &LogCursor {
        &self.cursor
    }

    /// Fetches the next block range. On failure the cursor stays put and the
    /// same range is retried on the next call.
    pub async fn poll<C: ChainAccessor>(
        &mut self,
        chain: &C,
        now_ms: u64,
    ) -> Result<Vec<DomainEvent>, ChainError> {
        let latest = chain.block_number().await?;
        let Some((from, to)) = self.cursor.next_range(latest) else {
            return Ok(Vec::new());
        };
        let logs = chain.get_logs(self.contract, from, to).await?;
        self.cursor.advance(to);
        if !logs.is_empty() {
            tracing::debug!("{} new logs in blocks {}..={}", logs.len(), from, to);
        }
        Ok(normalize_all(&logs, |_| Timestamp::Observed { now_ms }))
    }
}

#[cfg(test)]
mod tests {
    use primitive_types::U256;

    use super::*;
    use crate::abi::Address;
    use crate::chain::mock::MockChain;
    use crate::feed::ActivityFeed;
    use crate::normalize::tests::{round_ended_log, stake_log};

    const GAME: Address = Address([0xdb; 20]);

    #[tokio::test]
    async fn test_poll_picks_up_new_blocks_only() {
        let chain = MockChain::at(100);
        chain.push_log(stake_log(1, Address([1; 20]), 10, 90, 0), 0);
        let mut poller = LiveLogPoller::new(GAME);

        assert!(poller.poll(&chain, 1_000).await.unwrap().is_empty());
        assert_eq!(poller.cursor().high_water_mark(), Some(100));

        chain.push_log(stake_log(1, Address([2; 20]), 10, 101, 0), 0);
        chain.latest.set(102);
        let events = poller.poll(&chain, 2_000).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ms, 2_000);

        // Caught up: nothing queried.
        let queries = chain.log_queries.borrow().len();
        assert!(poller.poll(&chain, 3_000).await.unwrap().is_empty());
        assert_eq!(chain.log_queries.borrow().len(), queries);
    }

    #[tokio::test]
    async fn test_failed_poll_retries_same_range() {
        let chain = MockChain::at(10);
        let mut poller = LiveLogPoller::new(GAME);
        poller.poll(&chain, 0).await.unwrap();

        chain.latest.set(12);
        chain.push_log(stake_log(1, Address([2; 20]), 10, 11, 0), 0);
        chain.fail_logs.set(true);
        assert!(poller.poll(&chain, 1).await.is_err());
        assert_eq!(poller.cursor().high_water_mark(), Some(10));

        chain.fail_logs.set(false);
        let events = poller.poll(&chain, 2).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(chain.log_queries.borrow().last(), Some(&(GAME, 11, 12)));
    }

    #[tokio::test]
    async fn test_live_batch_lands_newest_first() {
        let chain = MockChain::at(1);
        let mut poller = LiveLogPoller::new(GAME);
        poller.poll(&chain, 0).await.unwrap();

        chain.push_log(stake_log(2, Address([1; 20]), 10, 2, 0), 0);
        chain.push_log(stake_log(2, Address([2; 20]), 10, 3, 0), 0);
        chain.push_log(round_ended_log(2, Address::ZERO, 0, 3), 0);
        chain.latest.set(3);

        let mut feed = ActivityFeed::new();
        for event in poller.poll(&chain, 5_000).await.unwrap() {
            feed.append_live(event);
        }
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.entries()[0].round_id, U256::from(2));
        assert_eq!(feed.entries()[0].origin.unwrap().block_number, 3);
    }
}
