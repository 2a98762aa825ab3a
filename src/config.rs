use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chain: ChainConfig,
    pub screening: ScreeningConfig,
    pub crypto: CryptoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Leading zero hex characters required of a block hash.
    pub difficulty: usize,
    pub mining_reward: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub enabled: bool,
    /// Suspicion score above which a transaction is flagged.
    pub sensitivity: f64,
    /// Number of recent transactions retained for statistics.
    pub pattern_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// "Dilithium2" for real post-quantum signatures; anything else falls
    /// back to the simulated development signer.
    pub signature_algorithm: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain: ChainConfig {
                difficulty: 4,
                mining_reward: Decimal::from(10),
            },
            screening: ScreeningConfig {
                enabled: true,
                sensitivity: 0.75,
                pattern_window: 100,
            },
            crypto: CryptoConfig {
                signature_algorithm: "Dilithium2".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    fn config_path() -> PathBuf {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home_dir).join(".quantumshield").join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.chain.difficulty, 4);
        assert_eq!(config.chain.mining_reward, Decimal::from(10));
        assert!(config.screening.enabled);
        assert_eq!(config.crypto.signature_algorithm, "Dilithium2");
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(back.chain.difficulty, config.chain.difficulty);
        assert_eq!(back.chain.mining_reward, config.chain.mining_reward);
    }
}
