//! Advisory transaction screening.
//!
//! The ledger consults a gate when one is installed, but never enforces
//! its verdict; rejection policy belongs to the embedding application.

pub mod detector;

pub use detector::{DetectionStats, RuleBasedDetector};

use crate::core::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Outcome of screening one pending transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningVerdict {
    pub is_anomaly: bool,
    /// Suspicion score in 0.0..=1.0.
    pub confidence: f64,
    pub reason: String,
}

pub trait ScreeningGate {
    fn evaluate(&mut self, transaction: &Transaction) -> ScreeningVerdict;
}
