use primitive_types::U256;
use thiserror::Error;

/// A raw log or call result that does not match the expected schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("log has no topics")]
    MissingSignature,

    #[error("unrecognized event signature {0}")]
    UnknownSignature(String),

    #[error("expected {expected} topics, found {found}")]
    TopicCount { expected: usize, found: usize },

    #[error("expected {expected} bytes of data, found {found}")]
    DataLength { expected: usize, found: usize },

    #[error("word {0} is not a valid address")]
    InvalidAddress(usize),

    #[error("word {0} is not a valid bool")]
    InvalidBool(usize),

    #[error("invalid dynamic offset or length at word {0}")]
    InvalidDynamic(usize),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Failures talking to the chain. All of them are transient from the
/// dashboard's point of view: the previous state is kept and the next poll retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("rpc returned no result for {0}")]
    MissingResult(&'static str),

    #[error("block {0} not found")]
    BlockNotFound(u64),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Wallet and session errors, surfaced to the user as transient messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Wallet not connected. Please connect your wallet first.")]
    NotConnected,

    #[error("No injected wallet found. Please install a browser wallet.")]
    NoProvider,

    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Stake of {amount} is below the minimum of {minimum}")]
    BelowMinimum { minimum: U256, amount: U256 },

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Owner panel input rejected before submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Empty(&'static str),

    #[error("{0} must be a non-negative number")]
    Negative(&'static str),

    #[error("{0} must be a whole number")]
    NotNumeric(&'static str),

    #[error("{0} is too large")]
    Overflow(&'static str),

    #[error("amount has more than {0} decimals")]
    TooManyDecimals(u32),
}
