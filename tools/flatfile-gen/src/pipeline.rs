// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Top-level driver wiring anchor, allocator, loop, validator and writer
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: `tests/pipeline.rs`

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use hostsim::{HostsSimulator, HostsSimulatorOptions, SeriesGenerator};
use log::info;

use crate::accumulate::accumulate;
use crate::block::{validate, Block};
use crate::error::{Error, Result};
use crate::identity::IdentityAllocator;
use crate::writer::write_samples;

/// Default number of samples to generate.
pub const DEFAULT_CARDINALITY: usize = 5_000_000;
/// Default number of simulated hosts.
pub const DEFAULT_HOSTS: usize = 10_000;

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Exact number of samples to produce.
    pub cardinality: NonZeroUsize,
    /// Output directory; created if missing.
    pub dir: PathBuf,
    /// Hosts simulated per step.
    pub hosts: NonZeroUsize,
}

impl Config {
    /// Validates raw invocation parameters.
    pub fn new(cardinality: usize, dir: impl Into<PathBuf>, hosts: usize) -> Result<Self> {
        let cardinality = NonZeroUsize::new(cardinality)
            .ok_or_else(|| Error::Usage("cardinality must be greater than zero".into()))?;
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            return Err(Error::Usage("output directory must not be empty".into()));
        }
        let hosts = NonZeroUsize::new(hosts).ok_or_else(|| Error::Usage("hosts must be greater than zero".into()))?;
        Ok(Self { cardinality, dir, hosts })
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Report {
    /// Written file.
    pub path: PathBuf,
    /// Number of records written.
    pub samples: usize,
    /// Block the samples were validated against.
    pub block: Block,
    /// Time spent generating and validating.
    pub gen_time: Duration,
    /// Time spent writing.
    pub write_time: Duration,
}

/// Accumulates `cardinality` samples from `generator`, validates them against
/// `block` and writes them under `dir`. Nothing is written unless every earlier
/// stage succeeded.
pub fn generate_flat_file<G>(generator: &mut G, block: &Block, cardinality: NonZeroUsize, dir: &Path) -> Result<Report>
where
    G: SeriesGenerator + ?Sized,
{
    info!(
        "starting generate loop: target={} block_start={}ms hard_end={}ms",
        cardinality,
        block.start_ms(),
        block.hard_end_ms()
    );
    let gen_started = Instant::now();
    let mut identities = IdentityAllocator::new();
    let samples = accumulate(generator, &mut identities, cardinality)?;
    validate(block, &samples)?;
    let gen_time = gen_started.elapsed();

    info!("writing block: samples={} gen_time={gen_time:?}", samples.len());
    let write_started = Instant::now();
    let path = write_samples(dir, &samples)?;
    let write_time = write_started.elapsed();
    info!("created flat file {}: write_time={write_time:?}", path.display());

    Ok(Report { path, samples: samples.len(), block: *block, gen_time, write_time })
}

/// Runs the full pipeline against the built-in host simulator, with its clock
/// frozen at the start of the block preceding the current wall-clock block.
pub fn run(config: &Config) -> Result<Report> {
    let block = Block::anchored(SystemTime::now())?;
    let mut simulator =
        HostsSimulator::new(config.hosts.get(), HostsSimulatorOptions::frozen_at(block.start_time()));
    info!("simulating {} hosts ({} series per step)", simulator.host_count(), simulator.series_per_step());
    generate_flat_file(&mut simulator, &block, config.cardinality, &config.dir)
}
