// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Seeded fleet-of-hosts simulator emitting node-exporter style series
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests below + `userspace/hostsim/tests/contract.rs`

use std::time::{Duration, SystemTime};

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{to_epoch_ms, Batch, GenerateError, Label, Result, SamplePoint, Series, SeriesGenerator, TimeNowFn};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x686f_7374;

const CPUS_PER_HOST: usize = 2;
const CPU_MODES: [(&str, f64); 4] = [("user", 0.12), ("system", 0.05), ("idle", 0.80), ("iowait", 0.03)];
const REGIONS: [&str; 4] = ["us-east-1", "us-west-2", "eu-west-1", "ap-south-1"];
const ZONES: [&str; 3] = ["a", "b", "c"];

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Number of series every simulated host reports per step.
pub const METRICS_PER_HOST: usize = CPUS_PER_HOST * CPU_MODES.len() + 5;

/// Construction options for [`HostsSimulator`].
pub struct HostsSimulatorOptions {
    /// Clock consulted once, on the first call to `generate`, to place the cursor.
    /// Defaults to the system clock.
    pub time_now_fn: Option<TimeNowFn>,
    /// Seed for host attributes and value evolution.
    pub seed: u64,
}

impl Default for HostsSimulatorOptions {
    fn default() -> Self {
        Self { time_now_fn: None, seed: DEFAULT_SEED }
    }
}

impl HostsSimulatorOptions {
    /// Pins the simulator clock to `now`.
    pub fn frozen_at(now: SystemTime) -> Self {
        let clock: TimeNowFn = Box::new(move || now);
        Self { time_now_fn: Some(clock), ..Self::default() }
    }
}

#[derive(Clone, Copy, Debug)]
enum Kind {
    /// Monotonic; grows by roughly `rate` per second.
    Counter { rate: f64 },
    /// Random walk bounded to `[0, ceiling]`.
    Gauge { volatility: f64, ceiling: f64 },
}

#[derive(Debug)]
struct Metric {
    labels: Vec<Label>,
    kind: Kind,
    value: f64,
}

impl Metric {
    fn advance(&mut self, rng: &mut ChaCha8Rng, step_secs: f64) -> f64 {
        self.value = match self.kind {
            Kind::Counter { rate } => self.value + rate * step_secs * rng.gen_range(0.5..1.5),
            Kind::Gauge { volatility, ceiling } => {
                (self.value + rng.gen_range(-volatility..=volatility)).clamp(0.0, ceiling)
            }
        };
        self.value
    }
}

#[derive(Debug)]
struct Host {
    name: String,
    metrics: Vec<Metric>,
}

impl Host {
    fn new(index: usize, rng: &mut ChaCha8Rng) -> Self {
        let name = format!("host-{index:06}");
        let region = REGIONS[rng.gen_range(0..REGIONS.len())];
        let zone = ZONES[rng.gen_range(0..ZONES.len())];
        let base = [
            Label::new("instance", name.clone()),
            Label::new("region", region),
            Label::new("az", format!("{region}{zone}")),
        ];
        let series = |metric: &str, extra: &[(&str, &str)]| {
            let mut labels = Vec::with_capacity(1 + base.len() + extra.len());
            labels.push(Label::new("__name__", metric));
            labels.extend(base.iter().cloned());
            labels.extend(extra.iter().map(|(k, v)| Label::new(*k, *v)));
            labels
        };

        let mut metrics = Vec::with_capacity(METRICS_PER_HOST);
        for cpu in 0..CPUS_PER_HOST {
            let cpu = cpu.to_string();
            for (mode, rate) in CPU_MODES {
                metrics.push(Metric {
                    labels: series("node_cpu_seconds_total", &[("cpu", cpu.as_str()), ("mode", mode)]),
                    kind: Kind::Counter { rate },
                    value: rng.gen_range(0.0..100_000.0),
                });
            }
        }
        metrics.push(Metric {
            labels: series("node_memory_MemAvailable_bytes", &[]),
            kind: Kind::Gauge { volatility: 64.0 * 1024.0 * 1024.0, ceiling: 16.0 * GIB },
            value: rng.gen_range(2.0 * GIB..16.0 * GIB),
        });
        metrics.push(Metric {
            labels: series("node_load1", &[]),
            kind: Kind::Gauge { volatility: 0.25, ceiling: 64.0 },
            value: rng.gen_range(0.0..4.0),
        });
        metrics.push(Metric {
            labels: series("node_filesystem_avail_bytes", &[("mountpoint", "/")]),
            kind: Kind::Gauge { volatility: 1024.0 * 1024.0, ceiling: 1024.0 * GIB },
            value: rng.gen_range(50.0 * GIB..500.0 * GIB),
        });
        metrics.push(Metric {
            labels: series("node_network_receive_bytes_total", &[("device", "eth0")]),
            kind: Kind::Counter { rate: 125_000.0 },
            value: rng.gen_range(0.0..GIB),
        });
        metrics.push(Metric {
            labels: series("node_network_transmit_bytes_total", &[("device", "eth0")]),
            kind: Kind::Counter { rate: 62_500.0 },
            value: rng.gen_range(0.0..GIB),
        });
        debug_assert_eq!(metrics.len(), METRICS_PER_HOST);

        Self { name, metrics }
    }

    fn step(&mut self, rng: &mut ChaCha8Rng, cursor_ms: i64, step_ms: i64, points: usize) -> Vec<Series> {
        let step_secs = step_ms as f64 / 1000.0;
        let first_ms = cursor_ms - step_ms * (points as i64 - 1);
        self.metrics
            .iter_mut()
            .map(|metric| {
                let samples = (0..points as i64)
                    .map(|k| SamplePoint {
                        timestamp_ms: first_ms + k * step_ms,
                        value: metric.advance(rng, step_secs),
                    })
                    .collect();
                Series { labels: metric.labels.clone(), samples }
            })
            .collect()
    }
}

/// Simulates a fixed fleet of hosts, each reporting [`METRICS_PER_HOST`] series.
///
/// The clock cursor is read from the injected `time_now_fn` on the first call and
/// then advances by exactly one `step` per call, so a frozen clock yields a
/// reproducible timeline regardless of how long generation takes.
pub struct HostsSimulator {
    hosts: Vec<Host>,
    rng: ChaCha8Rng,
    time_now: TimeNowFn,
    cursor_ms: Option<i64>,
}

impl HostsSimulator {
    /// Creates a simulator for `host_count` hosts.
    pub fn new(host_count: usize, options: HostsSimulatorOptions) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
        let hosts = (0..host_count).map(|index| Host::new(index, &mut rng)).collect();
        let time_now: TimeNowFn = match options.time_now_fn {
            Some(clock) => clock,
            None => Box::new(SystemTime::now),
        };
        Self { hosts, rng, time_now, cursor_ms: None }
    }

    /// Number of simulated hosts.
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Series produced per step when every host reports.
    pub fn series_per_step(&self) -> usize {
        self.hosts.len() * METRICS_PER_HOST
    }

    /// Timestamp of the most recent step, if any.
    pub fn cursor_ms(&self) -> Option<i64> {
        self.cursor_ms
    }

    fn next_cursor(&mut self, step_ms: i64) -> Result<i64> {
        let cursor = match self.cursor_ms {
            Some(prev) => prev
                .checked_add(step_ms)
                .ok_or_else(|| GenerateError::Clock(format!("cursor overflow after {prev}ms")))?,
            None => to_epoch_ms((self.time_now)())?,
        };
        self.cursor_ms = Some(cursor);
        Ok(cursor)
    }
}

fn whole_millis(d: Duration) -> Option<i64> {
    i64::try_from(d.as_millis()).ok().filter(|ms| *ms > 0)
}

impl SeriesGenerator for HostsSimulator {
    fn generate(&mut self, step: Duration, lookback: Duration, factor: f64) -> Result<Batch> {
        let step_ms = whole_millis(step).ok_or(GenerateError::InvalidStep(step))?;
        let lookback_ms = whole_millis(lookback)
            .filter(|ms| *ms >= step_ms)
            .ok_or(GenerateError::InvalidLookback { lookback, step })?;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(GenerateError::InvalidFactor(factor));
        }

        let cursor_ms = self.next_cursor(step_ms)?;
        let points = (lookback_ms / step_ms) as usize;

        let mut batch = Batch::new();
        for host in &mut self.hosts {
            if factor < 1.0 && !self.rng.gen_bool(factor) {
                continue;
            }
            let series = host.step(&mut self.rng, cursor_ms, step_ms, points);
            batch.insert(host.name.clone(), series);
        }
        debug!("hostsim: step at {cursor_ms}ms, {} of {} hosts reporting", batch.len(), self.hosts.len());
        Ok(batch)
    }
}
