//! Post-quantum signature backends.

use crate::crypto::hash::Hash256;
use crate::crypto::keys::{KeyPair, Signer};
use crate::{Result, ShieldError};
use pqcrypto_dilithium::dilithium2::{
    detached_sign, keypair, verify_detached_signature, DetachedSignature, PublicKey, SecretKey,
};
use pqcrypto_traits::sign::{
    DetachedSignature as DetachedSignatureBytes, PublicKey as PublicKeyBytes,
    SecretKey as SecretKeyBytes,
};
use rand::RngCore;

pub const DILITHIUM_ALGORITHM: &str = "Dilithium2";
pub const SIMULATED_ALGORITHM: &str = "Simulated";

/// CRYSTALS-Dilithium2 signer (NIST standard lattice signatures).
#[derive(Debug, Default)]
pub struct DilithiumSigner;

impl DilithiumSigner {
    pub fn new() -> Self {
        Self
    }
}

impl Signer for DilithiumSigner {
    fn algorithm(&self) -> &str {
        DILITHIUM_ALGORITHM
    }

    fn generate_keypair(&self) -> Result<KeyPair> {
        let (public_key, secret_key) = keypair();

        Ok(KeyPair::new(
            DILITHIUM_ALGORITHM,
            public_key.as_bytes().to_vec(),
            secret_key.as_bytes().to_vec(),
        ))
    }

    fn sign(&self, message: &[u8], keypair: &KeyPair) -> Result<Vec<u8>> {
        let secret_key = SecretKey::from_bytes(&keypair.secret_key)
            .map_err(|e| ShieldError::Crypto(format!("Invalid Dilithium2 secret key: {:?}", e)))?;

        let signature = detached_sign(message, &secret_key);
        Ok(signature.as_bytes().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        let public_key = match PublicKey::from_bytes(public_key) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match DetachedSignature::from_bytes(signature) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        verify_detached_signature(&signature, message, &public_key).is_ok()
    }
}

/// Development fallback: random key material and a SHA3 tag keyed by the
/// public half. The tag round-trips through `verify` but anyone holding
/// the public key can forge it; this is a stand-in, not authentication.
#[derive(Debug, Default)]
pub struct SimulatedSigner;

impl SimulatedSigner {
    pub fn new() -> Self {
        Self
    }

    fn tag(message: &[u8], public_key: &[u8]) -> Vec<u8> {
        let mut data = Vec::with_capacity(public_key.len() + message.len());
        data.extend_from_slice(public_key);
        data.extend_from_slice(message);
        Hash256::hash(&data).as_bytes().to_vec()
    }
}

impl Signer for SimulatedSigner {
    fn algorithm(&self) -> &str {
        SIMULATED_ALGORITHM
    }

    fn generate_keypair(&self) -> Result<KeyPair> {
        let mut public_key = vec![0u8; 32];
        let mut secret_key = vec![0u8; 64];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut public_key);
        rng.fill_bytes(&mut secret_key);

        Ok(KeyPair::new(SIMULATED_ALGORITHM, public_key, secret_key))
    }

    fn sign(&self, message: &[u8], keypair: &KeyPair) -> Result<Vec<u8>> {
        Ok(Self::tag(message, &keypair.public_key))
    }

    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        Self::tag(message, public_key) == signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dilithium_sign_and_verify() {
        let signer = DilithiumSigner::new();
        let keypair = signer.generate_keypair().unwrap();
        let message = b"Transfer 100 QSH to Alice";

        let signature = signer.sign(message, &keypair).unwrap();
        assert!(signer.verify(message, &signature, &keypair.public_key));
    }

    #[test]
    fn test_dilithium_rejects_tampered_message() {
        let signer = DilithiumSigner::new();
        let keypair = signer.generate_keypair().unwrap();

        let signature = signer.sign(b"Transfer 100 QSH to Alice", &keypair).unwrap();
        assert!(!signer.verify(b"Transfer 1000 QSH to Alice", &signature, &keypair.public_key));
    }

    #[test]
    fn test_dilithium_rejects_wrong_key() {
        let signer = DilithiumSigner::new();
        let keypair = signer.generate_keypair().unwrap();
        let other = signer.generate_keypair().unwrap();
        let message = b"message";

        let signature = signer.sign(message, &keypair).unwrap();
        assert!(!signer.verify(message, &signature, &other.public_key));
    }

    #[test]
    fn test_simulated_sign_and_verify() {
        let signer = SimulatedSigner::new();
        let keypair = signer.generate_keypair().unwrap();
        let message = b"simulated message";

        let signature = signer.sign(message, &keypair).unwrap();
        assert!(signer.verify(message, &signature, &keypair.public_key));
        assert!(!signer.verify(b"other message", &signature, &keypair.public_key));
    }

    #[test]
    fn test_simulated_keypairs_are_distinct() {
        let signer = SimulatedSigner::new();
        let first = signer.generate_keypair().unwrap();
        let second = signer.generate_keypair().unwrap();

        assert_ne!(first.public_key, second.public_key);
        assert_ne!(first.address(), second.address());
    }
}
