use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShieldError>;

#[derive(Error, Debug)]
pub enum ShieldError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("No pending transactions to mine")]
    NothingToMine,

    #[error("Wallet name already registered: {0}")]
    DuplicateName(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}
