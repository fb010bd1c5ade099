// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Generation-accumulation loop
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests below + `tests/pipeline.rs`
//!
//! INVARIANTS:
//!   - Returns exactly `cardinality` samples; the rest of the final batch is dropped
//!   - Every series carries exactly one sample point
//!   - Every sample gets exactly one `pod` label, appended after the collaborator's labels
//!   - Label names are unique within a sample

use std::num::NonZeroUsize;
use std::time::Duration;

use hostsim::SeriesGenerator;
use log::{debug, info};

use crate::error::{Error, Result};
use crate::identity::IdentityAllocator;
use crate::sample::{Labels, MetricSample};

/// Clock advance requested per generation step.
pub const STEP: Duration = Duration::from_secs(10);
/// Lookback window requested per step; equal to [`STEP`] so each series yields one point.
pub const LOOKBACK: Duration = Duration::from_secs(10);
/// Fraction of simulated entities reporting per step.
pub const SELECTION_FACTOR: f64 = 1.0;
/// Name of the identity label appended to every series.
pub const POD_LABEL: &str = "pod";

/// Drives `generator` until exactly `cardinality` samples have been accumulated.
pub fn accumulate<G>(
    generator: &mut G,
    identities: &mut IdentityAllocator,
    cardinality: NonZeroUsize,
) -> Result<Vec<MetricSample>>
where
    G: SeriesGenerator + ?Sized,
{
    let target = cardinality.get();
    // Grown per batch: the target alone may exceed what can be allocated up front.
    let mut samples = Vec::new();
    let mut steps = 0usize;

    loop {
        let batch = generator.generate(STEP, LOOKBACK, SELECTION_FACTOR)?;
        steps += 1;
        let series_count: usize = batch.values().map(Vec::len).sum();
        debug!("accumulate: step {steps} produced {series_count} series ({} groups)", batch.len());
        if series_count == 0 {
            return Err(Error::StalledGenerator { accumulated: samples.len() });
        }
        samples.reserve(series_count.min(target - samples.len()));

        for series in batch.values().flatten() {
            let mut labels = Labels::from(series.labels.as_slice());
            let [point] = series.samples.as_slice() else {
                return Err(Error::SampleCount { series: labels.to_string(), samples: series.samples.len() });
            };
            if let Some(name) = labels.first_duplicate() {
                return Err(Error::LabelCollision { series: labels.to_string(), name: name.to_string() });
            }
            if labels.contains(POD_LABEL) {
                return Err(Error::LabelCollision { series: labels.to_string(), name: POD_LABEL.to_string() });
            }
            labels.push(POD_LABEL, identities.next_identity());

            samples.push(MetricSample { timestamp_ms: point.timestamp_ms, value: point.value, labels });
            if samples.len() == target {
                info!("accumulate: reached {target} samples after {steps} steps");
                return Ok(samples);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostsim::{Batch, GenerateError, Label, SamplePoint, Series};

    /// Emits `groups` groups of `per_group` series per call, one point each, at increasing timestamps.
    struct Grid {
        groups: usize,
        per_group: usize,
        calls: usize,
    }

    impl SeriesGenerator for Grid {
        fn generate(&mut self, step: Duration, lookback: Duration, factor: f64) -> hostsim::Result<Batch> {
            assert_eq!((step, lookback, factor), (STEP, LOOKBACK, SELECTION_FACTOR));
            self.calls += 1;
            let mut batch = Batch::new();
            for g in 0..self.groups {
                let series = (0..self.per_group)
                    .map(|i| Series {
                        labels: vec![Label::new("group", g.to_string()), Label::new("idx", i.to_string())],
                        samples: vec![SamplePoint { timestamp_ms: self.calls as i64 * 10_000, value: i as f64 }],
                    })
                    .collect();
                batch.insert(format!("g{g}"), series);
            }
            Ok(batch)
        }
    }

    /// Replays a fixed list of batches, then fails.
    struct Scripted(Vec<Batch>);

    impl SeriesGenerator for Scripted {
        fn generate(&mut self, step: Duration, _lookback: Duration, _factor: f64) -> hostsim::Result<Batch> {
            if self.0.is_empty() {
                return Err(GenerateError::InvalidStep(step));
            }
            Ok(self.0.remove(0))
        }
    }

    fn one_series(labels: Vec<Label>, samples: Vec<SamplePoint>) -> Batch {
        Batch::from([("k".to_string(), vec![Series { labels, samples }])])
    }

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    #[test]
    fn stops_mid_batch_at_target() {
        let mut gen = Grid { groups: 3, per_group: 4, calls: 0 };
        let mut ids = IdentityAllocator::new();
        let samples = accumulate(&mut gen, &mut ids, n(17)).unwrap();
        assert_eq!(samples.len(), 17);
        assert_eq!(gen.calls, 2);
        assert_eq!(ids.issued(), 17);
        // 12 from the first step, 5 from the second: group 0 fully, group 1 first series.
        let last = samples.last().unwrap();
        assert_eq!(last.timestamp_ms, 20_000);
        assert_eq!(last.labels.get("group"), Some("1"));
        assert_eq!(last.labels.get("idx"), Some("0"));
    }

    #[test]
    fn exact_batch_multiple_needs_no_extra_call() {
        let mut gen = Grid { groups: 2, per_group: 5, calls: 0 };
        let samples = accumulate(&mut gen, &mut IdentityAllocator::new(), n(10)).unwrap();
        assert_eq!(samples.len(), 10);
        assert_eq!(gen.calls, 1);
    }

    #[test]
    fn appends_one_pod_label_after_collaborator_labels() {
        let mut gen = Grid { groups: 1, per_group: 3, calls: 0 };
        let samples = accumulate(&mut gen, &mut IdentityAllocator::new(), n(3)).unwrap();
        let mut expected = IdentityAllocator::new();
        for s in &samples {
            let names: Vec<&str> = s.labels.iter().map(|l| l.name.as_str()).collect();
            assert_eq!(names, ["group", "idx", POD_LABEL]);
            assert_eq!(s.labels.get(POD_LABEL), Some(expected.next_identity().as_str()));
        }
    }

    #[test]
    fn zero_samples_is_fatal() {
        let mut gen = Scripted(vec![one_series(vec![Label::new("host", "h0")], vec![])]);
        let err = accumulate(&mut gen, &mut IdentityAllocator::new(), n(1)).unwrap_err();
        assert!(matches!(err, Error::SampleCount { samples: 0, .. }), "{err}");
    }

    #[test]
    fn multiple_samples_is_fatal() {
        let point = SamplePoint { timestamp_ms: 1, value: 1.0 };
        let mut gen = Scripted(vec![one_series(vec![Label::new("host", "h0")], vec![point, point])]);
        let err = accumulate(&mut gen, &mut IdentityAllocator::new(), n(1)).unwrap_err();
        assert!(matches!(err, Error::SampleCount { samples: 2, ref series } if series == r#"host="h0""#), "{err}");
    }

    #[test]
    fn existing_pod_label_is_fatal() {
        let point = SamplePoint { timestamp_ms: 1, value: 1.0 };
        let mut gen = Scripted(vec![one_series(vec![Label::new(POD_LABEL, "x")], vec![point])]);
        let err = accumulate(&mut gen, &mut IdentityAllocator::new(), n(1)).unwrap_err();
        assert!(matches!(err, Error::LabelCollision { ref name, .. } if name == POD_LABEL), "{err}");
    }

    #[test]
    fn duplicate_collaborator_label_is_fatal() {
        let point = SamplePoint { timestamp_ms: 1, value: 1.0 };
        let labels = vec![Label::new("host", "h0"), Label::new("zone", "a"), Label::new("host", "h1")];
        let mut gen = Scripted(vec![one_series(labels, vec![point])]);
        let mut ids = IdentityAllocator::new();
        let err = accumulate(&mut gen, &mut ids, n(1)).unwrap_err();
        assert!(matches!(err, Error::LabelCollision { ref name, .. } if name == "host"), "{err}");
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn huge_target_fails_through_generator_error() {
        let mut gen = Scripted(vec![]);
        let err = accumulate(&mut gen, &mut IdentityAllocator::new(), n(usize::MAX / 2)).unwrap_err();
        assert!(matches!(err, Error::Generate(GenerateError::InvalidStep(_))), "{err}");
    }

    #[test]
    fn huge_target_keeps_allocation_to_generated_series() {
        let point = SamplePoint { timestamp_ms: 1, value: 1.0 };
        let mut gen = Scripted(vec![one_series(vec![Label::new("host", "h0")], vec![point])]);
        let err = accumulate(&mut gen, &mut IdentityAllocator::new(), n(usize::MAX)).unwrap_err();
        assert!(matches!(err, Error::Generate(_)), "{err}");
    }

    #[test]
    fn generator_error_is_fatal() {
        let mut gen = Scripted(vec![]);
        let err = accumulate(&mut gen, &mut IdentityAllocator::new(), n(1)).unwrap_err();
        assert!(matches!(err, Error::Generate(GenerateError::InvalidStep(_))), "{err}");
    }

    #[test]
    fn empty_batch_is_fatal() {
        let point = SamplePoint { timestamp_ms: 1, value: 1.0 };
        let mut gen = Scripted(vec![one_series(vec![], vec![point]), Batch::new()]);
        let err = accumulate(&mut gen, &mut IdentityAllocator::new(), n(5)).unwrap_err();
        assert!(matches!(err, Error::StalledGenerator { accumulated: 1 }), "{err}");
    }
}
