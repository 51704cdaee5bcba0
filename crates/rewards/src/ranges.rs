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

//! Block range partitioning for `eth_getLogs` queries.
//!
//! RPC providers cap the number of blocks a single log query may span, so an
//! interval is paged through in fixed windows of [MAXIMUM_BLOCK_RANGE] blocks.
//! Windows share their boundary block and the last window may run past the
//! requested end block by up to one full window.

use std::fmt;

use thiserror::Error;

/// Width of every window produced by [block_ranges].
pub const MAXIMUM_BLOCK_RANGE: u64 = 3000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid block range: to block {to_block} is before from block {from_block}")]
pub struct RangeError {
    pub from_block: u64,
    pub to_block: u64,
}

/// An inclusive span of blocks queried in one fetch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRange {
    pub from_block: u64,
    pub to_block: u64,
}

impl BlockRange {
    pub fn new(from_block: u64, to_block: u64) -> Self {
        Self { from_block, to_block }
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from_block, self.to_block)
    }
}

/// Split `[from_block, to_block]` into consecutive windows.
///
/// Boundaries are generated at `from_block + k * MAXIMUM_BLOCK_RANGE` for every `k` whose
/// boundary does not pass `to_block`, followed by one more boundary a window further on.
/// Consecutive boundaries form the emitted ranges.
///
/// An empty interval (`to_block == from_block - 1`) yields no windows. Any other
/// `to_block < from_block` is rejected.
pub fn block_ranges(from_block: u64, to_block: u64) -> Result<Vec<BlockRange>, RangeError> {
    if to_block < from_block {
        if to_block + 1 == from_block {
            return Ok(Vec::new());
        }
        return Err(RangeError { from_block, to_block });
    }

    let steps = (to_block - from_block) / MAXIMUM_BLOCK_RANGE;
    let last_boundary = from_block + steps * MAXIMUM_BLOCK_RANGE;
    if last_boundary.checked_add(MAXIMUM_BLOCK_RANGE).is_none() {
        return Err(RangeError { from_block, to_block });
    }

    Ok((0..=steps)
        .map(|step| {
            let start = from_block + step * MAXIMUM_BLOCK_RANGE;
            BlockRange::new(start, start + MAXIMUM_BLOCK_RANGE)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_block_interval() {
        let ranges = block_ranges(100, 100).unwrap();
        assert_eq!(ranges, vec![BlockRange::new(100, 3100)]);
    }

    #[test]
    fn test_interval_ending_on_boundary() {
        // The boundary equal to the end block is kept and one more window is appended
        let ranges = block_ranges(0, 3000).unwrap();
        assert_eq!(ranges, vec![BlockRange::new(0, 3000), BlockRange::new(3000, 6000)]);
    }

    #[test]
    fn test_interval_between_boundaries() {
        let ranges = block_ranges(10, 4010).unwrap();
        assert_eq!(ranges, vec![BlockRange::new(10, 3010), BlockRange::new(3010, 6010)]);
        assert!(ranges.last().unwrap().to_block > 4010);
    }

    #[test]
    fn test_empty_interval() {
        assert!(block_ranges(500, 499).unwrap().is_empty());
    }

    #[test]
    fn test_inverted_interval_rejected() {
        assert_eq!(
            block_ranges(500, 100),
            Err(RangeError { from_block: 500, to_block: 100 })
        );
    }

    #[test]
    fn test_overflowing_tail_rejected() {
        let from = u64::MAX - 10;
        assert!(block_ranges(from, u64::MAX).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(BlockRange::new(1, 3001).to_string(), "[1, 3001]");
    }

    proptest! {
        #[test]
        fn ranges_cover_interval(from in 0u64..10_000_000, len in 0u64..50_000) {
            let to = from + len;
            let ranges = block_ranges(from, to).unwrap();

            prop_assert!(!ranges.is_empty());
            prop_assert_eq!(ranges[0].from_block, from);

            let last = ranges.last().unwrap();
            prop_assert!(last.to_block >= to);
            prop_assert!(last.to_block - to <= MAXIMUM_BLOCK_RANGE);

            for range in &ranges {
                prop_assert!(range.to_block - range.from_block <= MAXIMUM_BLOCK_RANGE);
            }
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].to_block, pair[1].from_block);
            }
        }
    }
}
