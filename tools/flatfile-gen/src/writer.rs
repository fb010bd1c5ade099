// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: JSON-lines flat-file writer
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests below + `tests/pipeline.rs`
//!
//! Partial files are left in place on failure.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sample::MetricSample;

/// Name of the output file inside the output directory.
pub const SAMPLES_FILE_NAME: &str = "samples.json";

/// Writes `samples` to `<dir>/samples.json`, one JSON record per line, truncating any previous file.
pub fn write_samples(dir: &Path, samples: &[MetricSample]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir { path: dir.to_path_buf(), source })?;

    let path = dir.join(SAMPLES_FILE_NAME);
    let file = File::create(&path).map_err(|source| Error::CreateFile { path: path.clone(), source })?;
    let mut out = BufWriter::with_capacity(1 << 20, file);

    for (index, sample) in samples.iter().enumerate() {
        if !sample.value.is_finite() {
            return Err(Error::NonFiniteValue { path, index, value: sample.value });
        }
        serde_json::to_writer(&mut out, sample).map_err(|source| {
            if source.is_io() {
                Error::Write { path: path.clone(), source: source.into() }
            } else {
                Error::Encode { path: path.clone(), index, source }
            }
        })?;
        out.write_all(b"\n").map_err(|source| Error::Write { path: path.clone(), source })?;
    }
    out.flush().map_err(|source| Error::Write { path: path.clone(), source })?;
    Ok(path)
}
