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

use alloy::{
    consensus::Transaction,
    primitives::{Address, B256, U256},
    providers::{
        fillers::{ChainIdFiller, FillProvider, JoinFill},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::client::RpcClient,
    sol_types::SolEvent,
    transports::layers::RetryBackoffLayer,
};
use anyhow::{anyhow, Context, Result};
use lottery_rewards::{
    ConfigParams, ContractEventFetcher, ILottery, IndexerConfig, JackpotPayout, LotteryIndexer,
    MintAllocation,
};
use serde::Serialize;
use url::Url;

type ProviderType = FillProvider<JoinFill<Identity, ChainIdFiller>, RootProvider>;

/// Which computations to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Jackpot,
    Mint,
    Both,
}

impl Mode {
    pub fn jackpots(self) -> bool {
        matches!(self, Mode::Jackpot | Mode::Both)
    }

    pub fn mints(self) -> bool {
        matches!(self, Mode::Mint | Mode::Both)
    }
}

#[derive(Clone, Debug)]
pub struct LotteryIndexerServiceConfig {
    /// Retries on rate limited RPC responses
    pub retries: u32,
    pub retry_backoff_ms: u64,
    pub compute_units_per_second: u64,
}

/// Jackpot payout as reported on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JackpotEntry {
    pub address: Address,
    /// Reward in ether
    pub reward: String,
    pub reward_wei: U256,
    pub pool_events: usize,
}

impl From<&JackpotPayout> for JackpotEntry {
    fn from(payout: &JackpotPayout) -> Self {
        Self {
            address: payout.address,
            reward: payout.reward_ether(),
            reward_wei: payout.reward,
            pool_events: payout.pool_events,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexerReport {
    pub chain_id: u64,
    pub contract_address: Address,
    pub from_block: u64,
    pub to_block: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jackpots: Option<Vec<JackpotEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mints: Option<Vec<MintAllocation>>,
}

pub struct LotteryIndexerService {
    provider: ProviderType,
    indexer: LotteryIndexer<ContractEventFetcher<ProviderType>>,
    contract_address: Address,
    chain_id: u64,
}

impl LotteryIndexerService {
    pub async fn new(
        rpc_url: Url,
        contract_address: Address,
        config_tx: B256,
        config: LotteryIndexerServiceConfig,
    ) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .filler(ChainIdFiller::default())
            .connect_client(
                RpcClient::builder()
                    .layer(RetryBackoffLayer::new(
                        config.retries,
                        config.retry_backoff_ms,
                        config.compute_units_per_second,
                    ))
                    .http(rpc_url),
            );
        let chain_id = provider.get_chain_id().await.context("Failed to get chain ID")?;

        let indexer_config = load_config(&provider, config_tx).await?;
        tracing::info!(
            "Loaded configuration from tx {} on chain {}: start block {}, {} blocks, pool size {}",
            config_tx,
            chain_id,
            indexer_config.start_block(),
            indexer_config.blocks_to_end(),
            indexer_config.jackpot_pool_size()
        );

        let fetcher = ContractEventFetcher::new(provider.clone(), contract_address);
        Ok(Self {
            provider,
            indexer: LotteryIndexer::new(indexer_config, fetcher),
            contract_address,
            chain_id,
        })
    }

    pub fn config(&self) -> &IndexerConfig {
        self.indexer.config()
    }

    /// Run the requested computations up to `to_block`, or the latest block if unset.
    pub async fn run(&self, mode: Mode, to_block: Option<u64>) -> Result<IndexerReport> {
        let to_block = match to_block {
            Some(block) => block,
            None => self.provider.get_block_number().await.context("Failed to get block number")?,
        };
        let start = std::time::Instant::now();

        let jackpots = if mode.jackpots() {
            let payouts = self.indexer.compute_jackpot_payouts(to_block).await?;
            Some(payouts.iter().map(JackpotEntry::from).collect())
        } else {
            None
        };

        let mints = if mode.mints() {
            Some(self.indexer.compute_mint_allocations(to_block).await?)
        } else {
            None
        };

        tracing::info!("Indexing up to block {} completed in {:?}", to_block, start.elapsed());

        Ok(IndexerReport {
            chain_id: self.chain_id,
            contract_address: self.contract_address,
            from_block: self.config().start_block(),
            to_block,
            jackpots,
            mints,
        })
    }
}

/// Load the configuration stored in the input of transaction `tx_hash`.
pub async fn load_config<P: Provider>(provider: &P, tx_hash: B256) -> Result<IndexerConfig> {
    let tx = provider
        .get_transaction_by_hash(tx_hash)
        .await?
        .context(anyhow!("Configuration transaction not found for hash: {}", tx_hash))?;
    let block_number = tx.block_number.context("Configuration transaction is not mined")?;
    config_from_transaction(tx.input(), block_number)
}

/// Build the configuration from transaction calldata. Indexing starts the block after the
/// configuration transaction.
pub fn config_from_transaction(input: &[u8], block_number: u64) -> Result<IndexerConfig> {
    let params = ConfigParams::from_calldata(input)
        .context("Failed to decode configuration transaction input")?;
    let config = IndexerConfig::new(params, ILottery::Data::SIGNATURE_HASH, block_number + 1)?;
    Ok(config)
}
