//! Read access to the chain.
//!
//! [`ChainAccessor`] is the seam between the engine and the network: the
//! production implementation is [`crate::rpc::RpcClient`], tests use an
//! in-memory chain.

use primitive_types::U256;

use crate::abi::{encode_call, saturating_u64, Address, Token, Words};
use crate::consts::*;
use crate::error::ChainError;
use crate::event::RawLog;
use crate::state::{RoundPoll, RoundSnapshot};

#[allow(async_fn_in_trait)]
pub trait ChainAccessor {
    /// Latest block number.
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError>;

    /// Logs emitted by `address` in the inclusive block range.
    async fn get_logs(&self, address: Address, from: u64, to: u64) -> Result<Vec<RawLog>, ChainError>;

    /// Unix seconds of a block.
    async fn block_timestamp(&self, block: u64) -> Result<u64, ChainError>;
}

async fn read_word<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    signature: &str,
    args: &[Token],
) -> Result<U256, ChainError> {
    let data = chain.call(contract, encode_call(signature, args)).await?;
    Ok(Words::exact(&data, 1)?.uint(0)?)
}

async fn read_bool<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    signature: &str,
) -> Result<bool, ChainError> {
    let data = chain.call(contract, encode_call(signature, &[])).await?;
    Ok(Words::exact(&data, 1)?.boolean(0)?)
}

async fn read_address<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    signature: &str,
) -> Result<Address, ChainError> {
    let data = chain.call(contract, encode_call(signature, &[])).await?;
    Ok(Words::exact(&data, 1)?.address(0)?)
}

/// `getCurrentRoundInfo()`.
pub async fn read_round_snapshot<C: ChainAccessor>(
    chain: &C,
    contract: Address,
) -> Result<RoundSnapshot, ChainError> {
    let data = chain
        .call(contract, encode_call(GET_CURRENT_ROUND_INFO_SIG, &[]))
        .await?;
    Ok(RoundSnapshot::decode(&data)?)
}

/// The snapshot and the three timing reads that go with it.
pub async fn read_round_poll<C: ChainAccessor>(
    chain: &C,
    contract: Address,
) -> Result<RoundPoll, ChainError> {
    let snapshot = read_round_snapshot(chain, contract).await?;
    let time_remaining = read_word(chain, contract, GET_TIME_REMAINING_SIG, &[]).await?;
    let time_until_staking = read_word(chain, contract, GET_TIME_UNTIL_STAKING_SIG, &[]).await?;
    let staking_available = read_bool(chain, contract, IS_STAKING_AVAILABLE_SIG).await?;
    Ok(RoundPoll {
        snapshot,
        time_remaining: saturating_u64(time_remaining),
        time_until_staking: saturating_u64(time_until_staking),
        staking_available,
    })
}

/// `stakeAmount()`: the minimum stake, in contract units.
pub async fn read_stake_amount<C: ChainAccessor>(
    chain: &C,
    contract: Address,
) -> Result<U256, ChainError> {
    read_word(chain, contract, STAKE_AMOUNT_SIG, &[]).await
}

pub async fn read_owner<C: ChainAccessor>(
    chain: &C,
    contract: Address,
) -> Result<Address, ChainError> {
    read_address(chain, contract, OWNER_SIG).await
}

/// `rewarderContract()`, `None` when unset.
pub async fn read_rewarder<C: ChainAccessor>(
    chain: &C,
    contract: Address,
) -> Result<Option<Address>, ChainError> {
    let rewarder = read_address(chain, contract, REWARDER_CONTRACT_SIG).await?;
    Ok((!rewarder.is_zero()).then_some(rewarder))
}

/// `getRoundStakers(uint256)`.
pub async fn read_round_stakers<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    round_id: U256,
) -> Result<Vec<Address>, ChainError> {
    let data = chain
        .call(contract, encode_call(GET_ROUND_STAKERS_SIG, &[Token::Uint(round_id)]))
        .await?;
    Ok(Words::dynamic(&data)?.address_array(0)?)
}

/// Whether `account` owns the game contract.
pub async fn is_owner<C: ChainAccessor>(
    chain: &C,
    contract: Address,
    account: Address,
) -> Result<bool, ChainError> {
    let owner = read_owner(chain, contract).await?;
    Ok(!account.is_zero() && owner == account)
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use super::*;

    /// In-memory chain. Calls are answered by exact calldata.
    #[derive(Default)]
    pub struct MockChain {
        pub latest: Cell<u64>,
        pub logs: RefCell<Vec<RawLog>>,
        pub timestamps: RefCell<HashMap<u64, u64>>,
        pub calls: RefCell<HashMap<Vec<u8>, Vec<u8>>>,
        pub fail_logs: Cell<bool>,
        pub log_queries: RefCell<Vec<(Address, u64, u64)>>,
        pub timestamp_requests: Cell<usize>,
    }

    impl MockChain {
        pub fn at(latest: u64) -> Self {
            let chain = Self::default();
            chain.latest.set(latest);
            chain
        }

        pub fn push_log(&self, log: RawLog, timestamp: u64) {
            self.timestamps.borrow_mut().insert(log.block_number, timestamp);
            self.logs.borrow_mut().push(log);
        }

        pub fn answer(&self, signature: &str, args: &[Token], result: Vec<u8>) {
            self.calls.borrow_mut().insert(encode_call(signature, args), result);
        }
    }

    impl ChainAccessor for MockChain {
        async fn block_number(&self) -> Result<u64, ChainError> {
            Ok(self.latest.get())
        }

        async fn call(&self, _to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
            self.calls
                .borrow()
                .get(&data)
                .cloned()
                .ok_or(ChainError::Rpc {
                    code: 3,
                    message: "execution reverted".to_string(),
                })
        }

        async fn get_logs(&self, address: Address, from: u64, to: u64) -> Result<Vec<RawLog>, ChainError> {
            self.log_queries.borrow_mut().push((address, from, to));
            if self.fail_logs.get() {
                return Err(ChainError::Transport("connection reset".to_string()));
            }
            Ok(self
                .logs
                .borrow()
                .iter()
                .filter(|log| log.address == address)
                .filter(|log| log.block_number >= from && log.block_number <= to)
                .cloned()
                .collect())
        }

        async fn block_timestamp(&self, block: u64) -> Result<u64, ChainError> {
            self.timestamp_requests.set(self.timestamp_requests.get() + 1);
            self.timestamps
                .borrow()
                .get(&block)
                .copied()
                .ok_or(ChainError::BlockNotFound(block))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockChain;
    use super::*;
    use crate::abi::uint_word;

    const GAME: Address = Address([0xdb; 20]);

    fn address_word(address: Address) -> Vec<u8> {
        let mut word = vec![0u8; 32];
        word[12..].copy_from_slice(&address.0);
        word
    }

    #[tokio::test]
    async fn test_read_round_poll() {
        let chain = MockChain::at(1);
        let mut info = Vec::new();
        for value in [7u64, 0, 500, 1_700_000_600, 1, 2, 1_700_000_000] {
            info.extend_from_slice(&uint_word(U256::from(value)));
        }
        chain.answer(GET_CURRENT_ROUND_INFO_SIG, &[], info);
        chain.answer(GET_TIME_REMAINING_SIG, &[], uint_word(U256::from(605)).to_vec());
        chain.answer(GET_TIME_UNTIL_STAKING_SIG, &[], uint_word(U256::zero()).to_vec());
        chain.answer(IS_STAKING_AVAILABLE_SIG, &[], uint_word(U256::one()).to_vec());

        let poll = read_round_poll(&chain, GAME).await.unwrap();
        assert_eq!(poll.round_id(), U256::from(7));
        assert_eq!(poll.snapshot.leader(), None);
        assert_eq!(poll.time_remaining, 605);
        assert!(poll.staking_available);
    }

    #[tokio::test]
    async fn test_read_round_poll_propagates_failure() {
        let chain = MockChain::at(1);
        assert!(read_round_poll(&chain, GAME).await.is_err());
    }

    #[tokio::test]
    async fn test_owner_and_rewarder() {
        let chain = MockChain::at(1);
        let owner = Address([0x0a; 20]);
        chain.answer(OWNER_SIG, &[], address_word(owner));
        chain.answer(REWARDER_CONTRACT_SIG, &[], vec![0u8; 32]);

        assert!(is_owner(&chain, GAME, owner).await.unwrap());
        assert!(!is_owner(&chain, GAME, Address([0x0b; 20])).await.unwrap());
        assert_eq!(read_rewarder(&chain, GAME).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_round_stakers() {
        let chain = MockChain::at(1);
        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(U256::from(32)));
        data.extend_from_slice(&uint_word(U256::from(2)));
        data.extend_from_slice(&address_word(Address([1; 20])));
        data.extend_from_slice(&address_word(Address([2; 20])));
        chain.answer(GET_ROUND_STAKERS_SIG, &[Token::Uint(U256::from(4))], data);

        let stakers = read_round_stakers(&chain, GAME, U256::from(4)).await.unwrap();
        assert_eq!(stakers, vec![Address([1; 20]), Address([2; 20])]);
    }
}
