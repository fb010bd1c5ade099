// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command-line surface for the flat-file generator.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::pipeline::{Config, DEFAULT_CARDINALITY, DEFAULT_HOSTS};

/// Generates a block-aligned, cardinality-bounded JSON-lines sample file.
#[derive(Debug, Parser)]
#[command(name = "flatfile-gen", version)]
pub struct Args {
    /// Number of distinct samples to generate.
    #[arg(long, default_value_t = DEFAULT_CARDINALITY as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub cardinality: u64,

    /// Directory that receives `samples.json`.
    #[arg(long, default_value = "/tmp", value_parser = non_empty_dir)]
    pub dir: PathBuf,

    /// Number of simulated hosts reporting each step.
    #[arg(long, default_value_t = DEFAULT_HOSTS as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub hosts: u64,
}

impl Args {
    /// Converts parsed flags into a validated [`Config`].
    pub fn into_config(self) -> Result<Config> {
        let cardinality = usize::try_from(self.cardinality)
            .map_err(|_| Error::Usage(format!("cardinality {} exceeds this platform", self.cardinality)))?;
        let hosts = usize::try_from(self.hosts)
            .map_err(|_| Error::Usage(format!("hosts {} exceeds this platform", self.hosts)))?;
        Config::new(cardinality, self.dir, hosts)
    }
}

fn non_empty_dir(raw: &str) -> core::result::Result<PathBuf, String> {
    if raw.is_empty() {
        Err("directory must not be empty".to_string())
    } else {
        Ok(PathBuf::from(raw))
    }
}
