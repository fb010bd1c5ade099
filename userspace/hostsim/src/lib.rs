// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! CONTEXT: Host time-series simulator and the generator contract consumed by workload tools
//!
//! OWNERS: @runtime
//!
//! STATUS: Experimental
//!
//! API_STABILITY: Unstable
//!
//! TEST_COVERAGE:
//!   - Unit tests: `hosts` module (catalogue shape, clock cursor, selection factor)
//!   - Integration tests: `userspace/hostsim/tests/contract.rs`
//!
//! PUBLIC API:
//!   - `SeriesGenerator`: step-driven batch generator contract
//!   - `HostsSimulator`: seeded per-host simulator with an injectable clock
//!
//! INVARIANTS:
//!   - Deterministic for a fixed seed, host count and clock
//!   - Batches iterate in host-name order

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use thiserror::Error;

mod hosts;

pub use hosts::{HostsSimulator, HostsSimulatorOptions, DEFAULT_SEED, METRICS_PER_HOST};

/// Result alias for generator operations.
pub type Result<T> = core::result::Result<T, GenerateError>;

/// Source of the simulator's notion of "now".
pub type TimeNowFn = Box<dyn Fn() -> SystemTime + Send>;

/// Errors surfaced by a [`SeriesGenerator`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerateError {
    /// Step must be a positive whole number of milliseconds.
    #[error("invalid step {0:?}: must be at least 1ms")]
    InvalidStep(Duration),
    /// Lookback must cover at least one step.
    #[error("invalid lookback {lookback:?}: must be at least one step ({step:?})")]
    InvalidLookback {
        /// Requested lookback window.
        lookback: Duration,
        /// Requested step.
        step: Duration,
    },
    /// Selection factor must lie in `(0, 1]`.
    #[error("invalid selection factor {0}: must be in (0, 1]")]
    InvalidFactor(f64),
    /// The injected clock reported an instant outside the representable range.
    #[error("clock out of range: {0}")]
    Clock(String),
}

/// Single `name=value` pair attached to a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Label value.
    pub value: String,
}

impl Label {
    /// Creates a label from anything string-like.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// One observation of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Unix epoch milliseconds.
    pub timestamp_ms: i64,
    /// Observed value.
    pub value: f64,
}

/// A label set plus the points produced for it in one generation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Identifying labels, in insertion order.
    pub labels: Vec<Label>,
    /// Points produced for this step, oldest first.
    pub samples: Vec<SamplePoint>,
}

/// Output of one generation step, grouped by an implementation-defined key.
pub type Batch = BTreeMap<String, Vec<Series>>;

/// Step-driven time-series generator.
pub trait SeriesGenerator {
    /// Produces the next step.
    ///
    /// `step` is how far the generator's clock advances per call, `lookback` the
    /// window of points emitted for each series, and `factor` the fraction of
    /// entities reporting in this step.
    fn generate(&mut self, step: Duration, lookback: Duration, factor: f64) -> Result<Batch>;
}

/// Converts an instant into Unix epoch milliseconds.
pub fn to_epoch_ms(t: SystemTime) -> Result<i64> {
    let ms = match t.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()),
        Err(before) => i64::try_from(before.duration().as_millis()).map(|ms| -ms),
    };
    ms.map_err(|_| GenerateError::Clock(format!("{t:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_ms_roundtrips_both_sides_of_epoch() {
        let after = SystemTime::UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(to_epoch_ms(after).unwrap(), 1_500);
        let before = SystemTime::UNIX_EPOCH - Duration::from_millis(2_000);
        assert_eq!(to_epoch_ms(before).unwrap(), -2_000);
    }

    #[test]
    fn label_new_accepts_mixed_inputs() {
        let label = Label::new("host", String::from("h0"));
        assert_eq!(label.name, "host");
        assert_eq!(label.value, "h0");
    }
}
