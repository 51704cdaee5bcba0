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

//! Jackpot payouts and token mint allocations computed from lottery contract `Data` events.
//!
//! Both computations page through `[start_block, to_block]` in fixed windows, fetch the events
//! of every window concurrently, group them by block and keep the first `blocks_to_end` blocks.
//! The jackpot flow then draws one winner per pool of blocks; the mint flow keeps only mint
//! events and distributes tiered mint amounts per chunk of blocks.

pub mod allocation;
pub mod config;
pub mod events;
pub mod fetch;
pub mod jackpot;
pub mod ranges;

pub use allocation::{allocate_mints, MintAllocation, MintTiers};
pub use config::{ConfigError, ConfigParams, IndexerConfig};
pub use events::{group_by_block, BlockEventGroup, RawEvent};
pub use fetch::{fetch_all, ContractEventFetcher, EventFetcher, ILottery};
pub use jackpot::{select_jackpots, JackpotPayout};
pub use ranges::{block_ranges, BlockRange, RangeError, MAXIMUM_BLOCK_RANGE};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("{0}")]
    Range(#[from] RangeError),

    #[error("Event fetch error: {0:#}")]
    Fetch(#[source] anyhow::Error),
}

/// Runs the jackpot and mint computations for one lottery contract.
pub struct LotteryIndexer<F> {
    config: IndexerConfig,
    fetcher: F,
}

impl<F: EventFetcher> LotteryIndexer<F> {
    pub fn new(config: IndexerConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// One jackpot payout per pool of blocks in `[start_block, to_block]`.
    pub async fn compute_jackpot_payouts(
        &self,
        to_block: u64,
    ) -> Result<Vec<JackpotPayout>, IndexerError> {
        let events = self.fetch_events(to_block).await?;
        let blocks = group_by_block(events).into_leading_blocks(self.config.blocks_to_end());

        let payouts = select_jackpots(
            &blocks,
            self.config.jackpot_pool_size(),
            self.config.price_per_mint(),
            self.config.reward_percent(),
        )?;
        tracing::info!(
            "Computed {} jackpot payouts over {} blocks up to block {}",
            payouts.len(),
            blocks.len(),
            to_block
        );
        Ok(payouts)
    }

    /// Mint units per address for the mint events in `[start_block, to_block]`.
    pub async fn compute_mint_allocations(
        &self,
        to_block: u64,
    ) -> Result<Vec<MintAllocation>, IndexerError> {
        let signature = self.config.mint_signature();
        let marker = self.config.mint_data_marker();

        let events = self.fetch_events(to_block).await?;
        let blocks = group_by_block(events.into_iter().filter(|e| e.is_mint(signature, marker)))
            .into_leading_blocks(self.config.blocks_to_end());

        let allocations = allocate_mints(
            &blocks,
            MintTiers {
                blocks_to_end: self.config.blocks_to_end(),
                multipliers: self.config.multipliers(),
                extra_mint_count: self.config.extra_mint_count(),
                limit_per_mint: self.config.limit_per_mint(),
            },
        )?;
        tracing::info!(
            "Computed mint allocations for {} addresses over {} blocks up to block {}",
            allocations.len(),
            blocks.len(),
            to_block
        );
        Ok(allocations)
    }

    async fn fetch_events(&self, to_block: u64) -> Result<Vec<RawEvent>, IndexerError> {
        let ranges = block_ranges(self.config.start_block(), to_block)?;
        tracing::info!(
            "Fetching Data events from block {} to {} in {} windows",
            self.config.start_block(),
            to_block,
            ranges.len()
        );

        let events = fetch_all(&self.fetcher, &ranges).await.map_err(IndexerError::Fetch)?;
        tracing::debug!("Fetched {} Data events", events.len());
        Ok(events)
    }
}
