mod rpc;
mod use_account;
mod use_activity;
mod use_round;
mod use_round_history;
mod use_transaction;

pub use rpc::*;
pub use use_account::{use_is_owner, use_stake_amount, use_wallet_balance};
pub use use_activity::use_activity;
pub use use_round::use_round;
pub use use_round_history::use_round_history;
pub use use_transaction::{push_toast, submit_with_toast, use_toasts};
