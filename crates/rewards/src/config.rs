// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Indexer configuration.
//!
//! The lottery contract is configured by a transaction whose calldata carries a JSON document
//! with short keys. [ConfigParams] is that document; [IndexerConfig] is the validated, immutable
//! form used by the computations.

use alloy::primitives::{utils::parse_ether, B256, U256};
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed configuration document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Configuration document is not valid UTF-8")]
    InvalidUtf8,

    #[error("At least one multiplier is required")]
    NoMultipliers,

    #[error("Jackpot pool size must be greater than zero")]
    ZeroJackpotPool,

    #[error("Reward percent {0} out of range [0, 100]")]
    RewardPercentOutOfRange(u64),

    #[error("Invalid price per mint {price:?}: {reason}")]
    InvalidPrice { price: String, reason: String },

    #[error("Mint chunks are empty: {blocks_to_end} blocks split across {multipliers} multipliers")]
    EmptyMintChunk { blocks_to_end: usize, multipliers: usize },

    #[error("No multiplier for mint chunk {chunk} ({multipliers} multipliers configured)")]
    MissingMultiplier { chunk: usize, multipliers: usize },

    #[error("Mint amount overflow")]
    MintAmountOverflow,
}

/// Raw configuration document, as stored in the configuration transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigParams {
    /// Base mint unit
    #[serde(rename = "lim")]
    pub limit_per_mint: u64,
    /// Number of leading blocks considered
    #[serde(rename = "blk")]
    pub blocks_to_end: usize,
    /// Number of top-ranked representatives per mint chunk receiving the multiplier
    #[serde(rename = "ext")]
    pub extra_mint_count: usize,
    /// One multiplier per mint chunk
    #[serde(rename = "mul")]
    pub multipliers: Vec<u64>,
    /// Number of blocks per jackpot draw
    #[serde(rename = "jpp")]
    pub jackpot_pool_size: usize,
    /// Decimal price per mint, in ether
    #[serde(rename = "prc", deserialize_with = "decimal_string")]
    pub price_per_mint: String,
    /// Share of the pool paid out as a jackpot (0-100)
    #[serde(rename = "rwd")]
    pub reward_percent: u64,
    /// Payload identifying a mint among `Data` events
    #[serde(rename = "mint")]
    pub mint_data: String,
}

impl ConfigParams {
    /// Decode the JSON document carried in transaction calldata.
    pub fn from_calldata(input: &[u8]) -> Result<Self, ConfigError> {
        let text = std::str::from_utf8(input).map_err(|_| ConfigError::InvalidUtf8)?;
        Ok(serde_json::from_str(text.trim_end_matches('\0'))?)
    }
}

fn decimal_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected a decimal price, got {other}"))),
    }
}

/// Validated indexer configuration. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    limit_per_mint: u64,
    blocks_to_end: usize,
    extra_mint_count: usize,
    multipliers: Vec<u64>,
    jackpot_pool_size: usize,
    price_per_mint: U256,
    reward_percent: u64,
    mint_signature: B256,
    mint_data_marker: String,
    start_block: u64,
}

impl IndexerConfig {
    pub fn new(
        params: ConfigParams,
        mint_signature: B256,
        start_block: u64,
    ) -> Result<Self, ConfigError> {
        if params.multipliers.is_empty() {
            return Err(ConfigError::NoMultipliers);
        }
        if params.jackpot_pool_size == 0 {
            return Err(ConfigError::ZeroJackpotPool);
        }
        if params.reward_percent > 100 {
            return Err(ConfigError::RewardPercentOutOfRange(params.reward_percent));
        }
        if params.blocks_to_end / params.multipliers.len() == 0 {
            return Err(ConfigError::EmptyMintChunk {
                blocks_to_end: params.blocks_to_end,
                multipliers: params.multipliers.len(),
            });
        }
        let price_per_mint =
            parse_ether(&params.price_per_mint).map_err(|e| ConfigError::InvalidPrice {
                price: params.price_per_mint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            limit_per_mint: params.limit_per_mint,
            blocks_to_end: params.blocks_to_end,
            extra_mint_count: params.extra_mint_count,
            multipliers: params.multipliers,
            jackpot_pool_size: params.jackpot_pool_size,
            price_per_mint,
            reward_percent: params.reward_percent,
            mint_signature,
            mint_data_marker: params.mint_data,
            start_block,
        })
    }

    pub fn limit_per_mint(&self) -> u64 {
        self.limit_per_mint
    }

    pub fn blocks_to_end(&self) -> usize {
        self.blocks_to_end
    }

    pub fn extra_mint_count(&self) -> usize {
        self.extra_mint_count
    }

    pub fn multipliers(&self) -> &[u64] {
        &self.multipliers
    }

    pub fn jackpot_pool_size(&self) -> usize {
        self.jackpot_pool_size
    }

    /// Price per mint in wei.
    pub fn price_per_mint(&self) -> U256 {
        self.price_per_mint
    }

    pub fn reward_percent(&self) -> u64 {
        self.reward_percent
    }

    pub fn mint_signature(&self) -> B256 {
        self.mint_signature
    }

    pub fn mint_data_marker(&self) -> &str {
        &self.mint_data_marker
    }

    /// First block considered, inclusive.
    pub fn start_block(&self) -> u64 {
        self.start_block
    }

    /// Number of blocks per mint chunk.
    pub fn mint_chunk_size(&self) -> usize {
        self.blocks_to_end / self.multipliers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{"lim":10,"blk":4,"ext":2,"mul":[3,2],"jpp":2,"prc":"0.01","rwd":50,"mint":"mint"}"#;

    fn params() -> ConfigParams {
        serde_json::from_str(DOCUMENT).unwrap()
    }

    #[test]
    fn test_decode_short_keys() {
        let params = ConfigParams::from_calldata(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(params.limit_per_mint, 10);
        assert_eq!(params.blocks_to_end, 4);
        assert_eq!(params.extra_mint_count, 2);
        assert_eq!(params.multipliers, vec![3, 2]);
        assert_eq!(params.jackpot_pool_size, 2);
        assert_eq!(params.price_per_mint, "0.01");
        assert_eq!(params.reward_percent, 50);
        assert_eq!(params.mint_data, "mint");
    }

    #[test]
    fn test_decode_numeric_price() {
        let doc = DOCUMENT.replace(r#""prc":"0.01""#, r#""prc":0.5"#);
        let params = ConfigParams::from_calldata(doc.as_bytes()).unwrap();
        assert_eq!(params.price_per_mint, "0.5");
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(
            ConfigParams::from_calldata(&[0xff, 0xfe]),
            Err(ConfigError::InvalidUtf8)
        ));
        assert!(matches!(ConfigParams::from_calldata(b"{\"lim\":1}"), Err(ConfigError::Malformed(_))));
        let doc = DOCUMENT.replace(r#""prc":"0.01""#, r#""prc":[1]"#);
        assert!(matches!(ConfigParams::from_calldata(doc.as_bytes()), Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_new_converts_price_to_wei() {
        let config = IndexerConfig::new(params(), B256::ZERO, 42).unwrap();
        assert_eq!(config.price_per_mint(), U256::from(10_000_000_000_000_000u64));
        assert_eq!(config.start_block(), 42);
        assert_eq!(config.mint_chunk_size(), 2);
        assert_eq!(config.mint_data_marker(), "mint");
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let mut p = params();
        p.multipliers.clear();
        assert!(matches!(IndexerConfig::new(p, B256::ZERO, 0), Err(ConfigError::NoMultipliers)));

        let mut p = params();
        p.jackpot_pool_size = 0;
        assert!(matches!(IndexerConfig::new(p, B256::ZERO, 0), Err(ConfigError::ZeroJackpotPool)));

        let mut p = params();
        p.reward_percent = 101;
        assert!(matches!(
            IndexerConfig::new(p, B256::ZERO, 0),
            Err(ConfigError::RewardPercentOutOfRange(101))
        ));

        let mut p = params();
        p.blocks_to_end = 1;
        assert!(matches!(
            IndexerConfig::new(p, B256::ZERO, 0),
            Err(ConfigError::EmptyMintChunk { blocks_to_end: 1, multipliers: 2 })
        ));

        let mut p = params();
        p.price_per_mint = "lots".to_string();
        assert!(matches!(
            IndexerConfig::new(p, B256::ZERO, 0),
            Err(ConfigError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_non_divisible_blocks_accepted() {
        let mut p = params();
        p.blocks_to_end = 5;
        let config = IndexerConfig::new(p, B256::ZERO, 0).unwrap();
        assert_eq!(config.mint_chunk_size(), 2);
    }
}
