use crate::config::Config;
use crate::core::block::{Block, BlockSummary};
use crate::core::transaction::{Transaction, TransactionView};
use crate::crypto::hash::Hash256;
use crate::crypto::keys::{KeyPair, Signer};
use crate::crypto::pqc::{DilithiumSigner, SimulatedSigner, DILITHIUM_ALGORITHM};
use crate::screening::{RuleBasedDetector, ScreeningGate, ScreeningVerdict};
use crate::{Result, ShieldError};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sender identity for genesis and reward issuance, exempt from balance
/// checks.
pub const SYSTEM_SENDER: &str = "System";

const GENESIS_RECIPIENT: &str = "Genesis";
const GENESIS_NONCE: &str = "genesis";
const REWARD_NONCE: &str = "reward";

/// Wallet metadata owned by the ledger.
#[derive(Debug, Clone)]
pub struct WalletRecord {
    pub name: String,
    pub keypair: KeyPair,
}

/// Result of submitting a transaction: the pooled transaction plus the
/// advisory screening verdict when a gate is installed.
#[derive(Debug, Clone)]
pub struct Submission {
    pub transaction: Transaction,
    pub screening: Option<ScreeningVerdict>,
}

/// Chain statistics for front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInfo {
    pub blocks: usize,
    pub total_transactions: usize,
    pub pending_transactions: usize,
    pub difficulty: usize,
    pub latest_hash: Hash256,
    pub is_valid: bool,
}

/// The append-only ledger: chain of mined blocks, pending-transaction
/// pool, wallet registry, and the pluggable signer and screening gate.
///
/// A single instance assumes one mutator at a time; embedders running
/// concurrently must serialize access themselves.
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: usize,
    mining_reward: Decimal,
    wallets: HashMap<String, WalletRecord>,
    signer: Box<dyn Signer>,
    gate: Option<Box<dyn ScreeningGate>>,
}

impl Blockchain {
    /// Builds a ledger with the signer and screening gate selected by the
    /// configuration, and mines the genesis block at the configured
    /// difficulty.
    pub fn new(config: &Config) -> Self {
        let signer: Box<dyn Signer> =
            if config.crypto.signature_algorithm == DILITHIUM_ALGORITHM {
                Box::new(DilithiumSigner::new())
            } else {
                Box::new(SimulatedSigner::new())
            };

        Self::with_signer(config, signer)
    }

    pub fn with_signer(config: &Config, signer: Box<dyn Signer>) -> Self {
        let gate: Option<Box<dyn ScreeningGate>> = if config.screening.enabled {
            Some(Box::new(RuleBasedDetector::new(
                config.screening.sensitivity,
                config.screening.pattern_window,
            )))
        } else {
            None
        };

        let difficulty = config.chain.difficulty;
        let genesis = Self::create_genesis_block(difficulty);
        log::info!("Blockchain initialized with difficulty {}", difficulty);

        Self {
            chain: vec![genesis],
            pending: Vec::new(),
            difficulty,
            mining_reward: config.chain.mining_reward,
            wallets: HashMap::new(),
            signer,
            gate,
        }
    }

    pub fn set_screening_gate(&mut self, gate: Box<dyn ScreeningGate>) {
        self.gate = Some(gate);
    }

    fn genesis_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn create_genesis_block(difficulty: usize) -> Block {
        let genesis_tx = Transaction {
            sender: SYSTEM_SENDER.to_string(),
            recipient: GENESIS_RECIPIENT.to_string(),
            amount: Decimal::ZERO,
            timestamp: Self::genesis_timestamp(),
            nonce: GENESIS_NONCE.to_string(),
            signature: None,
        };

        let mut genesis =
            Block::with_timestamp(0, vec![genesis_tx], Hash256::zero(), Self::genesis_timestamp());
        genesis.mine(difficulty);
        genesis
    }

    pub fn latest_block(&self) -> &Block {
        // The chain is never empty; genesis is created at construction.
        &self.chain[self.chain.len() - 1]
    }

    fn tail_hash(&self) -> Hash256 {
        self.latest_block().hash.expect("chained blocks are mined")
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn wallet(&self, address: &str) -> Option<&WalletRecord> {
        self.wallets.get(address)
    }

    /// Generates key material through the signer and registers the wallet
    /// under an address derived from its public key.
    pub fn create_wallet(&mut self, name: &str) -> Result<String> {
        if self.wallets.values().any(|wallet| wallet.name == name) {
            return Err(ShieldError::DuplicateName(name.to_string()));
        }

        let keypair = self.signer.generate_keypair()?;
        let address = keypair.address();
        log::info!("Wallet created for {}: {}", name, address);

        self.wallets.insert(
            address.clone(),
            WalletRecord {
                name: name.to_string(),
                keypair,
            },
        );

        Ok(address)
    }

    /// Admits a transaction to the pending pool.
    ///
    /// Non-system senders must cover the amount with their replayed
    /// balance. Registered senders get a signature attached. The
    /// screening verdict is advisory: it is returned to the caller, never
    /// enforced here.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Decimal,
    ) -> Result<Submission> {
        if sender != SYSTEM_SENDER {
            let available = self.get_balance(sender);
            if available < amount {
                return Err(ShieldError::InsufficientFunds {
                    required: amount,
                    available,
                });
            }
        }

        let mut transaction = Transaction::new(sender, recipient, amount, None, None)?;

        if let Some(wallet) = self.wallets.get(sender) {
            let message = format!("{}{}{}", sender, recipient, amount);
            transaction.signature = Some(self.signer.sign(message.as_bytes(), &wallet.keypair)?);
        }

        let screening = self.gate.as_mut().map(|gate| gate.evaluate(&transaction));
        if let Some(verdict) = screening.as_ref().filter(|v| v.is_anomaly) {
            log::warn!(
                "Screening flagged {} -> {} ({}): {}",
                sender,
                recipient,
                amount,
                verdict.reason
            );
        }

        log::info!("Transaction added: {} -> {} ({})", sender, recipient, amount);
        self.pending.push(transaction.clone());

        Ok(Submission {
            transaction,
            screening,
        })
    }

    /// Packages the full pending pool into a new block, mines it, appends
    /// it, and restarts the pool with the miner's reward transaction.
    pub fn mine_pending(&mut self, miner_address: &str) -> Result<Block> {
        if self.pending.is_empty() {
            return Err(ShieldError::NothingToMine);
        }

        log::info!("Mining {} pending transaction(s)", self.pending.len());

        let transactions = std::mem::take(&mut self.pending);
        let mut block = Block::new(self.chain.len() as u64, transactions, self.tail_hash());
        block.mine(self.difficulty);

        let mined = block.clone();
        self.chain.push(block);
        log::info!("Block {} appended to chain", mined.index);

        let reward = Transaction {
            sender: SYSTEM_SENDER.to_string(),
            recipient: miner_address.to_string(),
            amount: self.mining_reward,
            timestamp: Utc::now(),
            nonce: REWARD_NONCE.to_string(),
            signature: None,
        };
        log::info!("Mining reward ({}) queued for {}", self.mining_reward, miner_address);
        self.pending = vec![reward];

        Ok(mined)
    }

    /// Balance by full replay: every chained transaction plus the pending
    /// pool, credited to recipients and debited from senders. O(total
    /// transaction count) per call.
    pub fn get_balance(&self, address: &str) -> Decimal {
        let chained = self.chain.iter().flat_map(|block| block.transactions.iter());
        let mut balance = Decimal::ZERO;

        for tx in chained.chain(self.pending.iter()) {
            if tx.recipient == address {
                balance += tx.amount;
            }
            if tx.sender == address {
                balance -= tx.amount;
            }
        }

        balance
    }

    /// Integrity check over every adjacent block pair: stored hash matches
    /// a fresh recomputation, linkage matches the predecessor, and the
    /// hash satisfies the difficulty target.
    pub fn is_valid(&self) -> bool {
        for i in 1..self.chain.len() {
            let current = &self.chain[i];
            let previous = &self.chain[i - 1];

            let stored = match current.hash {
                Some(hash) => hash,
                None => return false,
            };

            if stored != current.compute_hash() {
                return false;
            }
            if previous.hash != Some(current.previous_hash) {
                return false;
            }
            if !stored.meets_difficulty(self.difficulty) {
                return false;
            }
        }

        true
    }

    pub fn chain_info(&self) -> ChainInfo {
        ChainInfo {
            blocks: self.chain.len(),
            total_transactions: self.chain.iter().map(Block::transaction_count).sum(),
            pending_transactions: self.pending.len(),
            difficulty: self.difficulty,
            latest_hash: self.tail_hash(),
            is_valid: self.is_valid(),
        }
    }

    pub fn block_summaries(&self) -> Vec<BlockSummary> {
        self.chain.iter().map(Block::summary).collect()
    }

    pub fn pending_views(&self) -> Vec<TransactionView> {
        self.pending.iter().map(Transaction::view).collect()
    }
}
