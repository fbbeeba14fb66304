use primitive_types::U256;

use crate::abi::Address;
use crate::event::{Availability, RewardBreakdown};

/// A finished round, as shown in the round history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    /// The round number.
    pub round_id: U256,

    /// The last staker of the round.
    pub winner: Address,

    /// The prize pool at the end of the round.
    pub total_amount: U256,

    /// Unix milliseconds of the block that ended the round.
    pub ended_at_ms: u64,

    /// Block in which the round ended.
    pub block_number: u64,

    /// Hash of the transaction that ended the round.
    pub tx_hash: Option<[u8; 32]>,

    /// Everyone who staked in the round, from `getRoundStakers`.
    pub stakers: Availability<Vec<Address>>,

    /// Payout of the round, when the reward events were found.
    pub rewards: Availability<RewardBreakdown>,
}

impl RoundRecord {
    pub fn won_by(&self, address: &Address) -> bool {
        !address.is_zero() && self.winner == *address
    }

    /// Whether `address` staked in the round. Unknown when the staker list
    /// could not be read.
    pub fn staked_by(&self, address: &Address) -> Option<bool> {
        self.stakers.as_option().map(|stakers| stakers.contains(address))
    }

    /// Whether `address` was drawn as a random winner by the rewarder.
    pub fn randomly_rewarded(&self, address: &Address) -> Option<bool> {
        self.rewards
            .as_option()
            .and_then(|rewards| rewards.random_winners.as_option())
            .map(|winners| winners.contains(address))
    }

    pub fn tx_hash_hex(&self) -> Option<String> {
        self.tx_hash.map(|hash| format!("0x{}", hex::encode(hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RoundRecord {
        RoundRecord {
            round_id: U256::from(3),
            winner: Address([1; 20]),
            total_amount: U256::from(100),
            ended_at_ms: 0,
            block_number: 10,
            tx_hash: Some([0xaa; 32]),
            stakers: Availability::Available(vec![Address([1; 20]), Address([2; 20])]),
            rewards: Availability::Unavailable,
        }
    }

    #[test]
    fn test_membership() {
        let record = record();
        assert!(record.won_by(&Address([1; 20])));
        assert!(!record.won_by(&Address([2; 20])));
        assert_eq!(record.staked_by(&Address([2; 20])), Some(true));
        assert_eq!(record.staked_by(&Address([3; 20])), Some(false));
        assert_eq!(record.randomly_rewarded(&Address([2; 20])), None);
    }

    #[test]
    fn test_unknown_stakers() {
        let record = RoundRecord {
            stakers: Availability::Unavailable,
            ..record()
        };
        assert_eq!(record.staked_by(&Address([1; 20])), None);
        assert_eq!(record.tx_hash_hex().unwrap(), format!("0x{}", "aa".repeat(32)));
    }
}
