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

//! Event fetching.
//!
//! [EventFetcher] is the seam between the computations and the chain. [ContractEventFetcher]
//! implements it over an alloy [Provider]; tests substitute an in-memory mock.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::{Filter, Log},
    sol_types::SolEvent,
};
use anyhow::Context;
use async_trait::async_trait;
use futures_util::future::try_join_all;

use crate::{events::RawEvent, ranges::BlockRange};

alloy::sol! {
    #[sol(all_derives)]
    interface ILottery {
        event Data(address indexed account, string data);
    }
}

/// Source of `Data` events for a block range.
#[async_trait]
pub trait EventFetcher: Send + Sync {
    /// Returns the events in `range`, ordered by ascending block.
    async fn fetch(&self, range: BlockRange) -> anyhow::Result<Vec<RawEvent>>;
}

/// Fetch every range concurrently and concatenate the batches in range order.
pub async fn fetch_all<F>(fetcher: &F, ranges: &[BlockRange]) -> anyhow::Result<Vec<RawEvent>>
where
    F: EventFetcher + ?Sized,
{
    let batches = try_join_all(ranges.iter().map(|range| fetcher.fetch(*range))).await?;
    Ok(batches.into_iter().flatten().collect())
}

/// Fetches `Data` events emitted by a single contract.
#[derive(Clone)]
pub struct ContractEventFetcher<P> {
    provider: P,
    contract_address: Address,
}

impl<P> ContractEventFetcher<P> {
    pub fn new(provider: P, contract_address: Address) -> Self {
        Self { provider, contract_address }
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }
}

#[async_trait]
impl<P> EventFetcher for ContractEventFetcher<P>
where
    P: Provider + Clone + 'static,
{
    async fn fetch(&self, range: BlockRange) -> anyhow::Result<Vec<RawEvent>> {
        let filter = Filter::new()
            .address(self.contract_address)
            .event_signature(ILottery::Data::SIGNATURE_HASH)
            .from_block(range.from_block)
            .to_block(range.to_block);

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .with_context(|| format!("Failed to get Data logs for blocks {range}"))?;
        tracing::debug!("Fetched {} Data logs for blocks {}", logs.len(), range);

        logs.iter().map(decode_data_log).collect()
    }
}

/// Convert a mined `Data` log into a [RawEvent].
pub fn decode_data_log(log: &Log) -> anyhow::Result<RawEvent> {
    let decoded = log.log_decode::<ILottery::Data>().context("Failed to decode Data log")?;
    let block_number = log.block_number.context("Log is missing its block number")?;
    let block_hash = log.block_hash.context("Log is missing its block hash")?;
    let transaction_hash = log.transaction_hash.context("Log is missing its transaction hash")?;
    let signature = log.topics().first().copied().context("Log has no topics")?;

    let data = decoded.inner.data;
    Ok(RawEvent {
        address: data.account,
        transaction_hash: U256::from_be_bytes(transaction_hash.0),
        block_number,
        block_hash: U256::from_be_bytes(block_hash.0),
        signature,
        payload: data.data,
    })
}
