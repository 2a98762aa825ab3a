//! Cryptographic primitives for QuantumShield

pub mod hash;
pub mod keys;
pub mod pqc;

pub use hash::{Hash256, Hashable};
pub use keys::{KeyPair, Signer};
pub use pqc::{DilithiumSigner, SimulatedSigner};
