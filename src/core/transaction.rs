use crate::crypto::hash::{Hash256, Hashable};
use crate::{Result, ShieldError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A single value transfer. Immutable once created; referenced by exactly
/// one block after mining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub nonce: String,
    pub signature: Option<Vec<u8>>,
}

/// Per-transaction view for front ends (signature hex-encoded or null).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub sender: String,
    pub recipient: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub nonce: String,
    pub signature: Option<String>,
}

impl Transaction {
    /// Creates a transaction. A missing nonce is derived deterministically
    /// from the other fields; negative amounts are rejected.
    pub fn new(
        sender: &str,
        recipient: &str,
        amount: Decimal,
        signature: Option<Vec<u8>>,
        nonce: Option<String>,
    ) -> Result<Self> {
        if amount < Decimal::ZERO {
            return Err(ShieldError::InvalidAmount(amount));
        }

        let timestamp = Utc::now();
        let nonce = nonce.unwrap_or_else(|| Self::derive_nonce(sender, recipient, amount, timestamp));

        Ok(Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
            timestamp,
            nonce,
            signature,
        })
    }

    fn derive_nonce(
        sender: &str,
        recipient: &str,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> String {
        let seed = format!("{}{}{}{}", sender, recipient, amount, timestamp.to_rfc3339());
        Hash256::hash(seed.as_bytes()).to_hex()
    }

    /// Canonical JSON form: keys sorted, amount as its decimal string,
    /// signature hex-encoded when present and absent otherwise. Two
    /// structurally identical transactions produce identical forms.
    pub(crate) fn canonical_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("sender".to_string(), json!(self.sender));
        object.insert("recipient".to_string(), json!(self.recipient));
        object.insert("amount".to_string(), json!(self.amount));
        object.insert("timestamp".to_string(), json!(self.timestamp));
        object.insert("nonce".to_string(), json!(self.nonce));
        if let Some(signature) = &self.signature {
            object.insert("signature".to_string(), json!(hex::encode(signature)));
        }
        Value::Object(object)
    }

    pub fn view(&self) -> TransactionView {
        TransactionView {
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            amount: self.amount,
            timestamp: self.timestamp,
            nonce: self.nonce.clone(),
            signature: self.signature.as_ref().map(hex::encode),
        }
    }
}

impl Hashable for Transaction {
    fn hash(&self) -> Hash256 {
        Hash256::hash(self.canonical_value().to_string().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = Transaction::new("alice", "bob", decimal(-5), None, None);
        assert!(matches!(result, Err(ShieldError::InvalidAmount(_))));
    }

    #[test]
    fn test_zero_amount_allowed() {
        let tx = Transaction::new("System", "Genesis", Decimal::ZERO, None, None).unwrap();
        assert_eq!(tx.amount, Decimal::ZERO);
    }

    #[test]
    fn test_nonce_derived_when_omitted() {
        let tx = Transaction::new("alice", "bob", decimal(10), None, None).unwrap();
        assert_eq!(tx.nonce.len(), 64);

        let explicit = Transaction::new("alice", "bob", decimal(10), None, Some("n1".to_string()))
            .unwrap();
        assert_eq!(explicit.nonce, "n1");
    }

    #[test]
    fn test_hash_stable_across_calls() {
        let tx = Transaction::new("alice", "bob", decimal(42), None, None).unwrap();
        assert_eq!(tx.hash(), tx.hash());
    }

    #[test]
    fn test_hash_covers_signature() {
        let unsigned = Transaction::new("alice", "bob", decimal(7), None, Some("n".to_string()))
            .unwrap();
        let mut signed = unsigned.clone();
        signed.signature = Some(vec![1, 2, 3]);

        assert_ne!(unsigned.hash(), signed.hash());
    }

    #[test]
    fn test_canonical_form_omits_missing_signature() {
        let tx = Transaction::new("alice", "bob", decimal(7), None, None).unwrap();
        let canonical = tx.canonical_value();

        assert!(canonical.get("signature").is_none());
        assert_eq!(canonical["sender"], "alice");
    }

    #[test]
    fn test_structurally_identical_transactions_hash_alike() {
        let tx = Transaction::new("alice", "bob", decimal(9), None, Some("n".to_string())).unwrap();
        let copy = Transaction {
            sender: tx.sender.clone(),
            recipient: tx.recipient.clone(),
            amount: tx.amount,
            timestamp: tx.timestamp,
            nonce: tx.nonce.clone(),
            signature: None,
        };

        assert_eq!(tx.hash(), copy.hash());
    }

    #[test]
    fn test_view_hex_encodes_signature() {
        let mut tx = Transaction::new("alice", "bob", decimal(3), None, None).unwrap();
        tx.signature = Some(vec![0xAB, 0xCD]);

        let view = tx.view();
        assert_eq!(view.signature.as_deref(), Some("abcd"));
    }
}
