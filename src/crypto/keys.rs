use crate::crypto::hash::Hash256;
use crate::Result;
use chrono::{DateTime, Utc};

/// Number of hex characters of the hashed public key used as an address.
pub const ADDRESS_LENGTH: usize = 40;

/// Key material for one wallet. The key bytes are opaque to the ledger;
/// only the signer that produced them can interpret them.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub algorithm: String,
    pub public_key: Vec<u8>,
    pub secret_key: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl KeyPair {
    pub fn new(algorithm: &str, public_key: Vec<u8>, secret_key: Vec<u8>) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            public_key,
            secret_key,
            created_at: Utc::now(),
        }
    }

    /// Blockchain address: truncated SHA3-256 of the public key.
    pub fn address(&self) -> String {
        let digest = Hash256::hash(&self.public_key);
        digest.to_hex()[..ADDRESS_LENGTH].to_string()
    }
}

/// Pluggable signing capability. Signatures are opaque byte strings; the
/// ledger core stores and forwards them without calling `verify`.
pub trait Signer {
    fn algorithm(&self) -> &str;

    fn generate_keypair(&self) -> Result<KeyPair>;

    fn sign(&self, message: &[u8], keypair: &KeyPair) -> Result<Vec<u8>>;

    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool;
}
