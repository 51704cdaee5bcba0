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

//! Raw contract events and their grouping by block.

use std::collections::HashMap;

use alloy::primitives::{Address, B256, U256};

/// A `Data` event as observed on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Account emitted in the event body
    pub address: Address,
    /// Hash of the emitting transaction, as an integer
    pub transaction_hash: U256,
    pub block_number: u64,
    /// Hash of the containing block, as an integer
    pub block_hash: U256,
    /// Topic 0 of the log
    pub signature: B256,
    /// The `data` field of the event
    pub payload: String,
}

impl RawEvent {
    /// Distance between the transaction hash and the block hash.
    pub fn hash_distance(&self) -> U256 {
        if self.transaction_hash >= self.block_hash {
            self.transaction_hash - self.block_hash
        } else {
            self.block_hash - self.transaction_hash
        }
    }

    /// Whether this event is a mint: matching signature and marker payload.
    pub fn is_mint(&self, signature: B256, marker: &str) -> bool {
        self.signature == signature && self.payload == marker
    }
}

/// Events keyed by block number, iterated in the order each block was first seen.
#[derive(Debug, Clone, Default)]
pub struct BlockEventGroup {
    order: Vec<u64>,
    events: HashMap<u64, Vec<RawEvent>>,
}

impl BlockEventGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to its block, registering the block if it is new.
    pub fn push(&mut self, event: RawEvent) {
        match self.events.get_mut(&event.block_number) {
            Some(events) => events.push(event),
            None => {
                self.order.push(event.block_number);
                self.events.insert(event.block_number, vec![event]);
            }
        }
    }

    /// Number of distinct blocks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn block_numbers(&self) -> &[u64] {
        &self.order
    }

    pub fn get(&self, block_number: u64) -> Option<&[RawEvent]> {
        self.events.get(&block_number).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &[RawEvent])> + '_ {
        self.order.iter().filter_map(|block| self.get(*block).map(|events| (*block, events)))
    }

    /// Keep the first `limit` blocks, in first-seen order.
    pub fn into_leading_blocks(self, limit: usize) -> Vec<Vec<RawEvent>> {
        let Self { order, mut events } = self;
        order.iter().take(limit).filter_map(|block| events.remove(block)).collect()
    }
}

impl FromIterator<RawEvent> for BlockEventGroup {
    fn from_iter<I: IntoIterator<Item = RawEvent>>(iter: I) -> Self {
        let mut group = Self::new();
        for event in iter {
            group.push(event);
        }
        group
    }
}

/// Group events by block number, preserving arrival order within each block.
pub fn group_by_block(events: impl IntoIterator<Item = RawEvent>) -> BlockEventGroup {
    events.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(block_number: u64, tx: u64) -> RawEvent {
        RawEvent {
            address: Address::with_last_byte(tx as u8),
            transaction_hash: U256::from(tx),
            block_number,
            block_hash: U256::from(block_number * 1000),
            signature: B256::ZERO,
            payload: "mint".to_string(),
        }
    }

    #[test]
    fn test_groups_preserve_block_order() {
        let group = group_by_block(vec![event(10, 1), event(10, 2), event(12, 3), event(15, 4)]);

        assert_eq!(group.len(), 3);
        assert_eq!(group.block_numbers(), &[10, 12, 15]);
        let txs: Vec<_> = group.get(10).unwrap().iter().map(|e| e.transaction_hash).collect();
        assert_eq!(txs, vec![U256::from(1), U256::from(2)]);
    }

    #[test]
    fn test_boundary_block_from_two_batches_is_merged() {
        // Adjacent windows share a block, so it can show up at the end of one batch and
        // the start of the next.
        let group = group_by_block(vec![event(1, 1), event(3000, 2), event(3000, 2), event(3001, 3)]);

        assert_eq!(group.block_numbers(), &[1, 3000, 3001]);
        assert_eq!(group.get(3000).unwrap().len(), 2);
    }

    #[test]
    fn test_leading_blocks_truncates() {
        let group = group_by_block((1..=5).map(|n| event(n, n)));
        let blocks = group.into_leading_blocks(3);

        let numbers: Vec<_> = blocks.iter().map(|b| b[0].block_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_leading_blocks_with_fewer_blocks() {
        let group = group_by_block(vec![event(7, 1), event(8, 2)]);
        assert_eq!(group.into_leading_blocks(10).len(), 2);
    }

    #[test]
    fn test_iter_matches_insertion_order() {
        let group = group_by_block(vec![event(4, 1), event(6, 2), event(4, 3)]);
        let sizes: Vec<_> = group.iter().map(|(block, events)| (block, events.len())).collect();
        assert_eq!(sizes, vec![(4, 2), (6, 1)]);
    }

    #[test]
    fn test_hash_distance_is_absolute() {
        let mut e = event(1, 100);
        e.block_hash = U256::from(90);
        assert_eq!(e.hash_distance(), U256::from(10));
        e.block_hash = U256::from(130);
        assert_eq!(e.hash_distance(), U256::from(30));
        e.transaction_hash = U256::MAX;
        e.block_hash = U256::ZERO;
        assert_eq!(e.hash_distance(), U256::MAX);
    }

    #[test]
    fn test_is_mint() {
        let sig = B256::with_last_byte(1);
        let mut e = event(1, 1);
        e.signature = sig;
        assert!(e.is_mint(sig, "mint"));
        assert!(!e.is_mint(sig, "burn"));
        assert!(!e.is_mint(B256::ZERO, "mint"));
    }
}
