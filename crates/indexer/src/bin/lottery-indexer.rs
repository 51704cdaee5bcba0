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

use alloy::primitives::{Address, B256};
use anyhow::{bail, Result};
use clap::Parser;
use lottery_indexer::{LotteryIndexerService, LotteryIndexerServiceConfig, Mode};
use url::Url;

/// Arguments of the lottery indexer.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct MainArgs {
    /// URL of the Ethereum RPC endpoint.
    #[clap(short, long, env)]
    rpc_url: Url,
    /// Address of the lottery contract emitting Data events.
    #[clap(short, long, env)]
    contract_address: Address,
    /// Hash of the transaction whose input carries the JSON configuration.
    #[clap(long, env)]
    config_tx: B256,
    /// Last block to index. Defaults to the latest block.
    #[clap(long)]
    to_block: Option<u64>,
    /// Computations to run.
    #[clap(long, value_enum, default_value = "both")]
    mode: Mode,
    /// Number of retries on rate limited RPC responses.
    #[clap(long, default_value = "3")]
    retries: u32,
    /// Initial backoff in milliseconds between retries.
    #[clap(long, default_value = "1000")]
    retry_backoff_ms: u64,
    /// Compute units per second budget of the RPC endpoint.
    #[clap(long, default_value = "200")]
    compute_units_per_second: u64,
    /// Whether to log in JSON format.
    #[clap(long, env, default_value_t = false)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => bail!("failed to load .env file: {}", e),
    }

    let args = MainArgs::parse();

    if args.log_json {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    if let Err(err) = run(&args).await {
        bail!("FATAL: Error running the lottery indexer: {err:#}");
    }

    Ok(())
}

async fn run(args: &MainArgs) -> Result<()> {
    let config = LotteryIndexerServiceConfig {
        retries: args.retries,
        retry_backoff_ms: args.retry_backoff_ms,
        compute_units_per_second: args.compute_units_per_second,
    };

    let service = LotteryIndexerService::new(
        args.rpc_url.clone(),
        args.contract_address,
        args.config_tx,
        config,
    )
    .await?;

    let report = service.run(args.mode, args.to_block).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
