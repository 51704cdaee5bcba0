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

//! Jackpot winner selection.
//!
//! Blocks are split into pools of `jackpot_pool_size` consecutive blocks. Each pool pays one
//! winner: the event with the largest transaction hash, earliest event on ties. The reward is
//! a percentage of the mint price collected over every event in the pool.

use alloy::primitives::{utils::format_ether, Address, U256};
use serde::Serialize;

use crate::{config::ConfigError, events::RawEvent};

/// Jackpot winner of one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JackpotPayout {
    pub address: Address,
    /// Reward in wei
    pub reward: U256,
    /// Number of events that competed in the pool
    pub pool_events: usize,
}

impl JackpotPayout {
    /// Reward rendered in ether.
    pub fn reward_ether(&self) -> String {
        format_ether(self.reward)
    }
}

/// Reward for a pool of `event_count` events: `price * count * percent / 100`.
pub fn pool_reward(price_per_mint: U256, event_count: usize, reward_percent: u64) -> U256 {
    price_per_mint * U256::from(event_count) * U256::from(reward_percent) / U256::from(100)
}

/// Event with the strictly largest transaction hash, first seen on ties.
pub fn largest_transaction<'a>(
    pool: impl IntoIterator<Item = &'a RawEvent>,
) -> Option<&'a RawEvent> {
    pool.into_iter().reduce(|largest, current| {
        if current.transaction_hash > largest.transaction_hash {
            current
        } else {
            largest
        }
    })
}

/// Select one winner per pool of `pool_size` consecutive blocks.
pub fn select_jackpots(
    blocks: &[Vec<RawEvent>],
    pool_size: usize,
    price_per_mint: U256,
    reward_percent: u64,
) -> Result<Vec<JackpotPayout>, ConfigError> {
    if pool_size == 0 {
        return Err(ConfigError::ZeroJackpotPool);
    }

    let mut payouts = Vec::new();
    for (index, chunk) in blocks.chunks(pool_size).enumerate() {
        let pool: Vec<&RawEvent> = chunk.iter().flatten().collect();
        let Some(winner) = largest_transaction(pool.iter().copied()) else {
            tracing::warn!("Skipping jackpot pool {} with no events", index);
            continue;
        };
        let reward = pool_reward(price_per_mint, pool.len(), reward_percent);
        tracing::debug!(
            "Jackpot pool {}: {} events over {} blocks, winner {} receives {} wei",
            index,
            pool.len(),
            chunk.len(),
            winner.address,
            reward
        );
        payouts.push(JackpotPayout { address: winner.address, reward, pool_events: pool.len() });
    }

    Ok(payouts)
}
