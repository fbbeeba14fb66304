pub mod abi;
pub mod chain;
pub mod config;
pub mod consts;
pub mod countdown;
pub mod error;
pub mod event;
pub mod feed;
pub mod format;
pub mod history;
pub mod normalize;
pub mod poll;
pub mod rpc;
pub mod sdk;
pub mod state;
pub mod watcher;

pub mod prelude {
    pub use crate::abi::Address;
    pub use crate::chain::*;
    pub use crate::config::*;
    pub use crate::consts::*;
    pub use crate::countdown::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::feed::*;
    pub use crate::format::*;
    pub use crate::history::*;
    pub use crate::poll::*;
    pub use crate::rpc::RpcClient;
    pub use crate::sdk::{self, TransactionRequest};
    pub use crate::state::*;
    pub use crate::watcher::*;
    pub use primitive_types::U256;
}
