/// Maximum number of entries kept in the activity feed.
pub const FEED_CAPACITY: usize = 10;

/// Remaining seconds at or below which an active round is in its buffer period.
pub const BUFFER_THRESHOLD_SECS: u64 = 600;

/// Interval between round snapshot polls.
pub const SNAPSHOT_POLL_MS: u32 = 10_000;

/// Interval between countdown ticks.
pub const COUNTDOWN_TICK_MS: u32 = 1_000;

/// Interval between live log polls.
pub const LIVE_POLL_MS: u32 = 5_000;

/// Blocks scanned backwards when backfilling the current round's activity.
pub const BACKFILL_WINDOW_BLOCKS: u64 = 10_000;

/// Blocks scanned backwards when building the round history.
pub const HISTORY_WINDOW_BLOCKS: u64 = 1_000;

/// Number of finished rounds shown in the round history.
pub const HISTORY_LIMIT: usize = 10;

/// Blocks replayed by the live poller on its first query.
pub const LIVE_START_LOOKBACK_BLOCKS: u64 = 0;

/// Upper bound on the block span of a single `eth_getLogs` query.
pub const MAX_LOG_RANGE_BLOCKS: u64 = 1_000;

/// Time a transient toast stays on screen.
pub const TOAST_DISMISS_MS: u32 = 5_000;

/// Seconds a stake in the buffer period adds to the deadline (shown in the UI only).
pub const STAKE_EXTENSION_SECS: u64 = 300;

/// Payout shares of the prize pool, in percent.
pub const WINNER_SHARE_PCT: u64 = 70;
pub const PARTICIPANT_SHARE_PCT: u64 = 20;
pub const TREASURY_SHARE_PCT: u64 = 10;

// Event signatures of the game contract.
pub const STAKE_RECEIVED_SIG: &str = "StakeReceived(uint256,address,uint256,uint256)";
pub const ROUND_STARTED_SIG: &str = "RoundStarted(uint256,uint256,uint256)";
pub const ROUND_ENDED_SIG: &str = "RoundEnded(uint256,address,uint256)";
pub const REWARDS_DISTRIBUTED_SIG: &str =
    "RewardsDistributed(uint256,address,uint256,uint256,uint256)";

/// Event signature of the rewarder contract's payout.
pub const RANDOM_REWARDS_SIG: &str = "RewardsDistributed(uint256,address[],uint256,uint256)";

// Function signatures of the game contract.
pub const GET_CURRENT_ROUND_INFO_SIG: &str = "getCurrentRoundInfo()";
pub const GET_TIME_REMAINING_SIG: &str = "getTimeRemaining()";
pub const GET_TIME_UNTIL_STAKING_SIG: &str = "getTimeUntilStakingAvailable()";
pub const IS_STAKING_AVAILABLE_SIG: &str = "isStakingAvailable()";
pub const STAKE_AMOUNT_SIG: &str = "stakeAmount()";
pub const OWNER_SIG: &str = "owner()";
pub const REWARDER_CONTRACT_SIG: &str = "rewarderContract()";
pub const GET_ROUND_STAKERS_SIG: &str = "getRoundStakers(uint256)";
pub const STAKE_SIG: &str = "stake()";
pub const START_NEW_ROUND_SIG: &str = "startNewRound()";
pub const EMERGENCY_WITHDRAW_SIG: &str = "emergencyWithdraw()";
pub const UPDATE_STAKE_AMOUNT_SIG: &str = "updateStakeAmount(uint256)";
pub const UPDATE_BUFFER_SETTINGS_SIG: &str = "updateBufferSettings(uint256,uint256)";
pub const UPDATE_STAKING_WAIT_PERIOD_SIG: &str = "updateStakingWaitPeriod(uint256)";
