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

//! Token mint allocation.
//!
//! Each block contributes one representative mint event: the one whose transaction hash is
//! closest to the block hash. Representatives are split into chunks of
//! `blocks_to_end / multipliers.len()` blocks. Inside chunk `i` they are ranked by descending
//! block hash and the first `extra_mint_count` receive `multipliers[i] * limit_per_mint`; the
//! rest receive `limit_per_mint`. Amounts are then summed per address.

use std::collections::HashMap;

use alloy::primitives::Address;
use serde::Serialize;

use crate::{config::ConfigError, events::RawEvent};

/// Total mint units allocated to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintAllocation {
    pub address: Address,
    pub amount: u64,
}

/// Parameters of the tiered distribution.
#[derive(Debug, Clone, Copy)]
pub struct MintTiers<'a> {
    pub blocks_to_end: usize,
    pub multipliers: &'a [u64],
    pub extra_mint_count: usize,
    pub limit_per_mint: u64,
}

/// Event whose transaction hash is closest to its block hash, first seen on ties.
pub fn closest_event(events: &[RawEvent]) -> Option<&RawEvent> {
    events.iter().reduce(|closest, current| {
        if current.hash_distance() < closest.hash_distance() {
            current
        } else {
            closest
        }
    })
}

/// Order representatives by descending block hash.
///
/// Binary insertion sort where the element being inserted is compared as the first operand and
/// ranks before any element whose block hash is not greater than its own. Equal block hashes
/// therefore end up in reverse input order.
pub fn rank_by_block_hash(chunk: &mut [&RawEvent]) {
    for i in 1..chunk.len() {
        let pivot = chunk[i];
        let (mut left, mut right) = (0, i);
        while left < right {
            let mid = left + (right - left) / 2;
            if pivot.block_hash >= chunk[mid].block_hash {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        chunk[left..=i].rotate_right(1);
    }
}

/// Running per-address totals, kept in first-seen order.
#[derive(Debug, Default)]
struct MintTotals {
    allocations: Vec<MintAllocation>,
    index: HashMap<Address, usize>,
}

impl MintTotals {
    fn add(&mut self, address: Address, amount: u64) -> Result<(), ConfigError> {
        match self.index.get(&address) {
            Some(&i) => {
                let entry = &mut self.allocations[i];
                entry.amount =
                    entry.amount.checked_add(amount).ok_or(ConfigError::MintAmountOverflow)?;
            }
            None => {
                self.index.insert(address, self.allocations.len());
                self.allocations.push(MintAllocation { address, amount });
            }
        }
        Ok(())
    }
}

/// Allocate mint units over per-block event lists, already filtered to mint events.
pub fn allocate_mints(
    blocks: &[Vec<RawEvent>],
    tiers: MintTiers<'_>,
) -> Result<Vec<MintAllocation>, ConfigError> {
    if tiers.multipliers.is_empty() {
        return Err(ConfigError::NoMultipliers);
    }
    let chunk_size = tiers.blocks_to_end / tiers.multipliers.len();
    if chunk_size == 0 {
        return Err(ConfigError::EmptyMintChunk {
            blocks_to_end: tiers.blocks_to_end,
            multipliers: tiers.multipliers.len(),
        });
    }

    let representatives: Vec<&RawEvent> =
        blocks.iter().filter_map(|events| closest_event(events)).collect();

    let mut totals = MintTotals::default();
    for (i, chunk) in representatives.chunks(chunk_size).enumerate() {
        let multiplier = *tiers.multipliers.get(i).ok_or(ConfigError::MissingMultiplier {
            chunk: i,
            multipliers: tiers.multipliers.len(),
        })?;

        let mut ranked = chunk.to_vec();
        rank_by_block_hash(&mut ranked);

        for (j, mint) in ranked.into_iter().enumerate() {
            let factor = if j < tiers.extra_mint_count { multiplier } else { 1 };
            let amount =
                factor.checked_mul(tiers.limit_per_mint).ok_or(ConfigError::MintAmountOverflow)?;
            totals.add(mint.address, amount)?;
        }
    }

    tracing::debug!(
        "Allocated mints for {} representatives to {} addresses",
        representatives.len(),
        totals.allocations.len()
    );

    Ok(totals.allocations)
}
