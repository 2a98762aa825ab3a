//! Core ledger components

pub mod block;
pub mod blockchain;
pub mod merkle;
pub mod transaction;

pub use block::{Block, BlockSummary};
pub use blockchain::{Blockchain, ChainInfo, Submission, WalletRecord, SYSTEM_SENDER};
pub use transaction::{Transaction, TransactionView};
