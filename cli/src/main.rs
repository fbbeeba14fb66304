use std::str::FromStr;

use anyhow::{anyhow, Context};
use lsw_api::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ChainConfig::from_env();
    let rpc = RpcClient::from_config(&config);
    let command = std::env::var("COMMAND").context("Missing COMMAND env var")?;
    match command.as_str() {
        "round" => {
            log_round(&rpc, &config).await?;
        }
        "stake_amount" => {
            log_stake_amount(&rpc, &config).await?;
        }
        "owner" => {
            log_owner(&rpc, &config).await?;
        }
        "balance" => {
            log_balance(&rpc, &config).await?;
        }
        "history" => {
            log_history(&rpc, &config).await?;
        }
        "feed" => {
            log_feed(&rpc, &config).await?;
        }
        "watch" => {
            watch(&rpc, &config).await?;
        }
        "stake" => {
            stake(&rpc, &config).await?;
        }
        "start_round" => {
            let tx = sdk::start_new_round(&config, sender()?)?;
            submit_transaction(&rpc, &config, &tx).await?;
        }
        "emergency_withdraw" => {
            let tx = sdk::emergency_withdraw(&config, sender()?)?;
            submit_transaction(&rpc, &config, &tx).await?;
        }
        "set_stake_amount" => {
            let amount = whole_var("AMOUNT")?;
            let tx = sdk::update_stake_amount(&config, sender()?, amount)?;
            submit_transaction(&rpc, &config, &tx).await?;
        }
        "set_buffer" => {
            let stake_buffer = whole_var("STAKE_BUFFER")?;
            let buffer_delay = whole_var("BUFFER_DELAY")?;
            let tx = sdk::update_buffer_settings(&config, sender()?, stake_buffer, buffer_delay)?;
            submit_transaction(&rpc, &config, &tx).await?;
        }
        "set_wait_period" => {
            let seconds = whole_var("WAIT_PERIOD")?;
            let tx = sdk::update_staking_wait_period(&config, sender()?, seconds)?;
            submit_transaction(&rpc, &config, &tx).await?;
        }
        other => return Err(anyhow!("Invalid command: {}", other)),
    };
    Ok(())
}

/// The `SENDER` account, unlocked on the node.
fn sender() -> Result<Option<Address>, anyhow::Error> {
    match std::env::var("SENDER") {
        Ok(s) => Ok(Some(Address::from_str(&s).context("Invalid SENDER")?)),
        Err(_) => Ok(None),
    }
}

fn whole_var(key: &'static str) -> Result<U256, anyhow::Error> {
    let value = std::env::var(key).with_context(|| format!("Missing {} env var", key))?;
    Ok(parse_whole(&value, key)?)
}

fn amount(config: &ChainConfig, value: U256) -> String {
    format!("{} {}", format_units(value, config.native_decimals), config.native_symbol)
}

async fn log_round(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    let poll = read_round_poll(rpc, config.contract).await?;
    let countdown = poll.countdown(0, BUFFER_THRESHOLD_SECS);
    let snapshot = poll.snapshot;
    println!("Round");
    println!("  Id: {}", snapshot.round_id);
    println!("  Active: {}", snapshot.is_active);
    println!("  Total amount: {}", amount(config, snapshot.total_amount));
    println!("  Stakers: {}", snapshot.stakers_count);
    match snapshot.leader() {
        Some(leader) => println!("  Last staker: {}", leader),
        None => println!("  Last staker: None"),
    }
    println!("  Deadline: {}", snapshot.deadline);
    println!("  Staking available at: {}", snapshot.staking_available_at);
    println!("  Staking available: {}", poll.staking_available);
    println!("  Phase: {}", countdown.phase.label());
    println!("  Countdown: {}", countdown.display());
    println!(
        "  Projected payout: winner {}, participants {}, treasury {}",
        amount(config, snapshot.projected_share(WINNER_SHARE_PCT)),
        amount(config, snapshot.projected_share(PARTICIPANT_SHARE_PCT)),
        amount(config, snapshot.projected_share(TREASURY_SHARE_PCT)),
    );
    Ok(())
}

async fn log_stake_amount(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    let minimum = read_stake_amount(rpc, config.contract).await?;
    println!("Minimum stake: {} ({} units)", amount(config, minimum), minimum);
    Ok(())
}

async fn log_owner(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    let owner = read_owner(rpc, config.contract).await?;
    let rewarder = read_rewarder(rpc, config.contract).await?;
    println!("Contract: {}", config.contract);
    println!("  Owner: {}", owner);
    match rewarder {
        Some(rewarder) => println!("  Rewarder: {}", rewarder),
        None => println!("  Rewarder: unset"),
    }
    if let Some(sender) = sender()? {
        println!("  {} is owner: {}", sender, is_owner(rpc, config.contract, sender).await?);
    }
    Ok(())
}

async fn log_balance(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    let address = std::env::var("ADDRESS").context("Missing ADDRESS env var")?;
    let address = Address::from_str(&address).context("Invalid ADDRESS")?;
    let chain_id = rpc.chain_id().await?;
    if chain_id != config.chain_id {
        tracing::warn!(
            "RPC reports chain {}, expected {} ({})",
            chain_id,
            config.chain_id,
            config.chain_name
        );
    }
    let balance = rpc.get_balance(address).await?;
    println!(
        "{}: {} {}",
        address,
        format_units(balance, config.balance_decimals),
        config.native_symbol
    );
    Ok(())
}

async fn log_history(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    let limit = match std::env::var("LIMIT") {
        Ok(s) => usize::from_str(&s).context("Invalid LIMIT")?,
        Err(_) => HISTORY_LIMIT,
    };
    let rounds = fetch_recent_rounds(rpc, config.contract, limit).await?;
    if rounds.is_empty() {
        println!("No completed rounds yet");
    }
    for record in rounds {
        println!("Round #{}", record.round_id);
        println!("  Winner: {}", record.winner);
        println!("  Prize: {}", amount(config, record.total_amount));
        println!("  Block: {}", record.block_number);
        if let Some(hash) = record.tx_hash_hex() {
            println!("  Tx: {}", config.tx_url(&hash));
        }
        match record.stakers.as_option() {
            Some(stakers) => println!("  Stakers: {}", stakers.len()),
            None => println!("  Stakers: unavailable"),
        }
        match record.rewards.as_option() {
            Some(rewards) => {
                println!("  Winner reward: {}", amount(config, rewards.winner_amount));
                println!("  Random participants: {}", amount(config, rewards.participant_amount));
                println!("  Treasury: {}", amount(config, rewards.treasury_amount));
                if let Some(winners) = rewards.random_winners.as_option() {
                    let winners: Vec<String> = winners.iter().map(|w| w.to_string()).collect();
                    println!("  Random winners: {}", winners.join(", "));
                }
            }
            None => println!("  Rewards: unavailable"),
        }
    }
    Ok(())
}

async fn log_feed(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    let snapshot = read_round_snapshot(rpc, config.contract).await?;
    let mut feed = ActivityFeed::new();
    feed.load_historical(load_historical_events(rpc, config.contract, snapshot.round_id).await?);
    print_feed(&feed, config, now_ms());
    Ok(())
}

fn print_feed(feed: &ActivityFeed, config: &ChainConfig, now_ms: u64) {
    println!("Live Activity");
    if feed.is_empty() {
        println!("  Waiting for activity...");
    }
    for event in feed.iter() {
        println!("  {} ({})", describe(event, config), time_ago(event.timestamp_ms, now_ms));
    }
}

fn describe(event: &DomainEvent, config: &ChainConfig) -> String {
    match &event.payload {
        EventPayload::Stake { staker, amount: staked, .. } => {
            format!("{} staked {}", staker.short(), amount(config, *staked))
        }
        EventPayload::RoundEnded { winner, total_amount, .. } => format!(
            "{} won the round, prize {}",
            winner.short(),
            amount(config, *total_amount)
        ),
        EventPayload::RoundStarted { .. } => format!("Round started, round #{}", event.round_id),
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Runs the dashboard engines headless until Ctrl-C: the snapshot poll, the
/// countdown tick and the live log poll, with a backfill on every new round.
async fn watch(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    use tokio::time::{interval, Duration, MissedTickBehavior};

    let liveness = Liveness::new();
    let mut tracker = RoundTracker::new();
    let mut feed = ActivityFeed::new();
    let mut poller = LiveLogPoller::new(config.contract);
    let mut last_phase = None;

    let mut snapshot_timer = interval(Duration::from_millis(SNAPSHOT_POLL_MS as u64));
    let mut tick_timer = interval(Duration::from_millis(COUNTDOWN_TICK_MS as u64));
    let mut live_timer = interval(Duration::from_millis(LIVE_POLL_MS as u64));
    for timer in [&mut snapshot_timer, &mut tick_timer, &mut live_timer] {
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    }

    let stop = liveness.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    tracing::info!("Watching {} on {}", config.contract, config.chain_name);
    while liveness.is_alive() {
        tokio::select! {
            _ = snapshot_timer.tick() => {
                let seq = tracker.sequencer().issue();
                match read_round_poll(rpc, config.contract).await {
                    Ok(poll) => {
                        let update = tracker.apply(seq, poll, now_ms());
                        if update.is_some_and(|u| u.round_changed) {
                            tracing::info!("Round {} is current", poll.round_id());
                            match load_historical_events(rpc, config.contract, poll.round_id()).await {
                                Ok(events) => {
                                    feed.load_historical(events);
                                    print_feed(&feed, config, now_ms());
                                }
                                Err(e) => tracing::warn!("Backfill failed: {}", e),
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Round poll failed: {}", e),
                }
            }
            _ = tick_timer.tick() => {
                if let Some(state) = tracker.tick(now_ms()) {
                    if last_phase != Some(state.phase) {
                        tracing::info!("{}", state.phase.label());
                        last_phase = Some(state.phase);
                    }
                    println!("{}  {}", state.display(), state.phase);
                }
            }
            _ = live_timer.tick() => {
                match poller.poll(rpc, now_ms()).await {
                    Ok(events) => {
                        for event in events {
                            let line = describe(&event, config);
                            if feed.append_live(event) {
                                println!("+ {}", line);
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Live log poll failed: {}", e),
                }
            }
        }
    }
    tracing::info!("Stopped");
    Ok(())
}

async fn stake(rpc: &RpcClient, config: &ChainConfig) -> Result<(), anyhow::Error> {
    let minimum = read_stake_amount(rpc, config.contract).await?;
    let value = match std::env::var("AMOUNT") {
        Ok(s) => parse_units(&s, config.native_decimals)?,
        Err(_) => minimum,
    };
    let tx = sdk::stake(config, sender()?, value, minimum)?;
    submit_transaction(rpc, config, &tx).await
}

async fn submit_transaction(
    rpc: &RpcClient,
    config: &ChainConfig,
    tx: &TransactionRequest,
) -> Result<(), anyhow::Error> {
    let hash = rpc.send_transaction(tx).await?;
    println!("Transaction: {}", hash);
    println!("  {}", config.tx_url(&hash));
    Ok(())
}
