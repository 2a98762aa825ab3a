use crate::core::transaction::Transaction;
use crate::screening::{ScreeningGate, ScreeningVerdict};
use chrono::{Datelike, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const HIGH_AMOUNT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
const ROUND_DIVISOR: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
// 0.01, below which a transfer looks like spam
const DUST_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const HIGH_AMOUNT_SCORE: f64 = 0.4;
const ROUND_AMOUNT_SCORE: f64 = 0.1;
const DUST_AMOUNT_SCORE: f64 = 0.3;
const SELF_TRANSFER_SCORE: f64 = 0.5;

/// Numerical features extracted from a transaction for screening.
#[derive(Debug, Clone)]
pub struct TransactionFeatures {
    pub amount: f64,
    pub hour: u32,
    pub day_of_week: u32,
    pub sender_length: usize,
    pub recipient_length: usize,
}

impl TransactionFeatures {
    pub fn extract(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount.to_f64().unwrap_or(0.0),
            hour: transaction.timestamp.hour(),
            day_of_week: transaction.timestamp.weekday().num_days_from_monday(),
            sender_length: transaction.sender.len(),
            recipient_length: transaction.recipient.len(),
        }
    }
}

/// Aggregate screening statistics over the retained history window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionStats {
    pub total_analyzed: usize,
    pub anomalies_detected: usize,
    pub anomaly_rate: f64,
    pub average_confidence: f64,
}

/// Rule-based anomaly scoring: each matching rule adds to a suspicion
/// score, and a transaction is flagged once the score exceeds the
/// configured sensitivity.
#[derive(Debug)]
pub struct RuleBasedDetector {
    sensitivity: f64,
    pattern_window: usize,
    history: Vec<ScreeningVerdict>,
}

impl RuleBasedDetector {
    pub fn new(sensitivity: f64, pattern_window: usize) -> Self {
        Self {
            sensitivity,
            pattern_window,
            history: Vec::new(),
        }
    }

    fn score(&self, transaction: &Transaction) -> f64 {
        let mut score = 0.0;

        if transaction.amount > HIGH_AMOUNT {
            score += HIGH_AMOUNT_SCORE;
        }
        if transaction.amount % ROUND_DIVISOR == Decimal::ZERO {
            score += ROUND_AMOUNT_SCORE;
        }
        if transaction.amount < DUST_AMOUNT {
            score += DUST_AMOUNT_SCORE;
        }
        if transaction.sender == transaction.recipient {
            score += SELF_TRANSFER_SCORE;
        }

        score
    }

    fn reason(&self, transaction: &Transaction, features: &TransactionFeatures) -> String {
        let mut reasons = Vec::new();

        if transaction.amount > HIGH_AMOUNT {
            reasons.push("Unusually high transaction amount");
        } else if transaction.amount < DUST_AMOUNT {
            reasons.push("Suspiciously low amount");
        }
        if features.hour < 6 || features.hour > 22 {
            reasons.push("Transaction at unusual hour");
        }
        if transaction.amount % ROUND_DIVISOR == Decimal::ZERO {
            reasons.push("Round number amount (common in fraud)");
        }
        if transaction.sender == transaction.recipient {
            reasons.push("Self-transfer detected");
        }

        if reasons.is_empty() {
            reasons.push("Pattern differs from normal behavior");
        }

        reasons.join(" | ")
    }

    pub fn statistics(&self) -> DetectionStats {
        let total = self.history.len();
        if total == 0 {
            return DetectionStats {
                total_analyzed: 0,
                anomalies_detected: 0,
                anomaly_rate: 0.0,
                average_confidence: 0.0,
            };
        }

        let anomalies = self.history.iter().filter(|v| v.is_anomaly).count();
        let confidence_sum: f64 = self.history.iter().map(|v| v.confidence).sum();

        DetectionStats {
            total_analyzed: total,
            anomalies_detected: anomalies,
            anomaly_rate: anomalies as f64 / total as f64,
            average_confidence: confidence_sum / total as f64,
        }
    }
}

impl ScreeningGate for RuleBasedDetector {
    fn evaluate(&mut self, transaction: &Transaction) -> ScreeningVerdict {
        let features = TransactionFeatures::extract(transaction);
        let score = self.score(transaction);

        let verdict = ScreeningVerdict {
            is_anomaly: score > self.sensitivity,
            confidence: score.min(1.0),
            reason: self.reason(transaction, &features),
        };

        self.history.push(verdict.clone());
        if self.history.len() > self.pattern_window {
            self.history.remove(0);
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(sender: &str, recipient: &str, amount: Decimal) -> Transaction {
        Transaction::new(sender, recipient, amount, None, None).unwrap()
    }

    #[test]
    fn test_ordinary_transfer_is_clean() {
        let mut detector = RuleBasedDetector::new(0.75, 100);
        let tx = transaction("alice", "bob", Decimal::new(5025, 2)); // 50.25

        let verdict = detector.evaluate(&tx);
        assert!(!verdict.is_anomaly);
    }

    #[test]
    fn test_self_transfer_scores_highest() {
        let mut detector = RuleBasedDetector::new(0.5, 100);
        let tx = transaction("bob", "bob", Decimal::new(5025, 2));

        let verdict = detector.evaluate(&tx);
        assert!(verdict.confidence >= SELF_TRANSFER_SCORE);
        assert!(verdict.reason.contains("Self-transfer"));
    }

    #[test]
    fn test_high_round_self_transfer_is_anomalous() {
        let mut detector = RuleBasedDetector::new(0.75, 100);
        let tx = transaction("bob", "bob", Decimal::from(50_000));

        let verdict = detector.evaluate(&tx);
        assert!(verdict.is_anomaly);
        assert_eq!(verdict.confidence, 1.0);
        assert!(verdict.reason.contains("Unusually high transaction amount"));
    }

    #[test]
    fn test_dust_transfer_is_suspicious() {
        let mut detector = RuleBasedDetector::new(0.2, 100);
        let tx = transaction("alice", "bob", Decimal::new(1, 3)); // 0.001

        let verdict = detector.evaluate(&tx);
        assert!(verdict.is_anomaly);
        assert!(verdict.reason.contains("Suspiciously low amount"));
    }

    #[test]
    fn test_confidence_is_capped() {
        let mut detector = RuleBasedDetector::new(0.75, 100);
        let tx = transaction("bob", "bob", Decimal::from(1_000_000));

        let verdict = detector.evaluate(&tx);
        assert!(verdict.confidence <= 1.0);
    }

    #[test]
    fn test_statistics_track_history() {
        let mut detector = RuleBasedDetector::new(0.75, 100);
        detector.evaluate(&transaction("alice", "bob", Decimal::new(375, 1)));
        detector.evaluate(&transaction("bob", "bob", Decimal::from(50_000)));

        let stats = detector.statistics();
        assert_eq!(stats.total_analyzed, 2);
        assert_eq!(stats.anomalies_detected, 1);
        assert!((stats.anomaly_rate - 0.5).abs() < f64::EPSILON);
        assert!(stats.average_confidence > 0.0);
    }

    #[test]
    fn test_history_is_bounded_by_pattern_window() {
        let mut detector = RuleBasedDetector::new(0.75, 3);
        for _ in 0..10 {
            detector.evaluate(&transaction("alice", "bob", Decimal::new(375, 1)));
        }

        assert_eq!(detector.statistics().total_analyzed, 3);
    }
}
