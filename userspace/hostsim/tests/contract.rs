// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Generator contract tests for the host simulator
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: 3 integration tests + 1 property test
//!
//! TEST_SCENARIOS:
//!   - label sets are well formed and keyed by their instance
//!   - the simulator is usable through a trait object
//!   - frozen clock timelines advance exactly one step per call

use std::collections::BTreeSet;
use std::time::{Duration, SystemTime};

use hostsim::{HostsSimulator, HostsSimulatorOptions, SeriesGenerator, METRICS_PER_HOST};
use proptest::prelude::*;

const STEP: Duration = Duration::from_secs(10);

fn frozen(host_count: usize, now_ms: u64) -> HostsSimulator {
    let now = SystemTime::UNIX_EPOCH + Duration::from_millis(now_ms);
    HostsSimulator::new(host_count, HostsSimulatorOptions::frozen_at(now))
}

#[test]
fn label_names_unique_and_instance_matches_key() {
    let mut sim = frozen(8, 1_700_000_000_000);
    let batch = sim.generate(STEP, STEP, 1.0).expect("generate");
    assert_eq!(batch.len(), 8);
    for (host, series) in &batch {
        assert_eq!(series.len(), METRICS_PER_HOST);
        for s in series {
            let names: BTreeSet<&str> = s.labels.iter().map(|l| l.name.as_str()).collect();
            assert_eq!(names.len(), s.labels.len(), "duplicate label in {:?}", s.labels);
            assert!(!names.contains("pod"));
            let instance = s.labels.iter().find(|l| l.name == "instance").expect("instance label");
            assert_eq!(&instance.value, host);
        }
    }
}

#[test]
fn usable_through_trait_object() {
    let mut sim = frozen(3, 0);
    let generator: &mut dyn SeriesGenerator = &mut sim;
    let batch = generator.generate(STEP, STEP, 1.0).expect("generate");
    assert_eq!(batch.values().map(Vec::len).sum::<usize>(), 3 * METRICS_PER_HOST);
}

#[test]
fn different_seeds_diverge() {
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
    let mut a = HostsSimulator::new(4, HostsSimulatorOptions { seed: 1, ..HostsSimulatorOptions::frozen_at(now) });
    let mut b = HostsSimulator::new(4, HostsSimulatorOptions { seed: 2, ..HostsSimulatorOptions::frozen_at(now) });
    assert_ne!(a.generate(STEP, STEP, 1.0).unwrap(), b.generate(STEP, STEP, 1.0).unwrap());
}

proptest! {
    #[test]
    fn frozen_clock_timeline(step_ms in 1u64..120_000, calls in 1usize..12, now_ms in 0u64..4_000_000_000_000) {
        let step = Duration::from_millis(step_ms);
        let mut sim = frozen(1, now_ms);
        let mut last = None;
        for _ in 0..calls {
            last = Some(sim.generate(step, step, 1.0).unwrap());
        }
        let batch = last.unwrap();
        let expected = now_ms as i64 + (calls as i64 - 1) * step_ms as i64;
        for series in batch.values().flatten() {
            prop_assert_eq!(series.samples.len(), 1);
            prop_assert_eq!(series.samples[0].timestamp_ms, expected);
        }
    }
}
