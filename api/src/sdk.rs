//! Transaction builders for the game contract.
//!
//! Every builder returns an unsigned [`TransactionRequest`]; submitting it is
//! the caller's business (injected wallet in the browser, node-managed account
//! from the CLI).

use primitive_types::U256;
use serde::Serialize;

use crate::abi::{encode_call, encode_hex, quantity, Address, Token};
use crate::config::ChainConfig;
use crate::consts::*;
use crate::error::WalletError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,

    /// Native value in the relay's units (already scaled).
    pub value: U256,
}

/// JSON form accepted by `eth_sendTransaction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RpcTransaction {
    pub from: String,
    pub to: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TransactionRequest {
    pub fn to_rpc(&self) -> RpcTransaction {
        RpcTransaction {
            from: self.from.to_string(),
            to: self.to.to_string(),
            data: encode_hex(&self.data),
            value: (!self.value.is_zero()).then(|| quantity(self.value)),
        }
    }
}

fn sender(from: Option<Address>) -> Result<Address, WalletError> {
    match from {
        Some(address) if !address.is_zero() => Ok(address),
        _ => Err(WalletError::NotConnected),
    }
}

fn call(
    config: &ChainConfig,
    from: Option<Address>,
    signature: &str,
    args: &[Token],
) -> Result<TransactionRequest, WalletError> {
    Ok(TransactionRequest {
        from: sender(from)?,
        to: config.contract,
        data: encode_call(signature, args),
        value: U256::zero(),
    })
}

/// Builds a `stake()` transaction for `amount` contract units.
pub fn stake(
    config: &ChainConfig,
    from: Option<Address>,
    amount: U256,
    minimum: U256,
) -> Result<TransactionRequest, WalletError> {
    let from = sender(from)?;
    if amount < minimum {
        return Err(WalletError::BelowMinimum { minimum, amount });
    }
    let value = amount
        .checked_mul(config.value_scale)
        .ok_or_else(|| WalletError::Rejected("stake amount is too large".to_string()))?;
    Ok(TransactionRequest {
        from,
        to: config.contract,
        data: encode_call(STAKE_SIG, &[]),
        value,
    })
}

/// Builds a `startNewRound()` transaction.
pub fn start_new_round(
    config: &ChainConfig,
    from: Option<Address>,
) -> Result<TransactionRequest, WalletError> {
    call(config, from, START_NEW_ROUND_SIG, &[])
}

/// Builds an `emergencyWithdraw()` transaction. Owner only.
pub fn emergency_withdraw(
    config: &ChainConfig,
    from: Option<Address>,
) -> Result<TransactionRequest, WalletError> {
    call(config, from, EMERGENCY_WITHDRAW_SIG, &[])
}

/// Builds an `updateStakeAmount(uint256)` transaction. Owner only.
pub fn update_stake_amount(
    config: &ChainConfig,
    from: Option<Address>,
    amount: U256,
) -> Result<TransactionRequest, WalletError> {
    call(config, from, UPDATE_STAKE_AMOUNT_SIG, &[Token::Uint(amount)])
}

/// Builds an `updateBufferSettings(uint256,uint256)` transaction. Owner only.
pub fn update_buffer_settings(
    config: &ChainConfig,
    from: Option<Address>,
    stake_buffer: U256,
    buffer_delay: U256,
) -> Result<TransactionRequest, WalletError> {
    call(
        config,
        from,
        UPDATE_BUFFER_SETTINGS_SIG,
        &[Token::Uint(stake_buffer), Token::Uint(buffer_delay)],
    )
}

/// Builds an `updateStakingWaitPeriod(uint256)` transaction. Owner only.
pub fn update_staking_wait_period(
    config: &ChainConfig,
    from: Option<Address>,
    seconds: U256,
) -> Result<TransactionRequest, WalletError> {
    call(
        config,
        from,
        UPDATE_STAKING_WAIT_PERIOD_SIG,
        &[Token::Uint(seconds)],
    )
}
