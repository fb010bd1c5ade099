// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by every pipeline stage. All variants are terminal.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the pipeline.
pub type Result<T> = core::result::Result<T, Error>;

/// Failures that abort a generation run.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid invocation parameters.
    #[error("usage: {0}")]
    Usage(String),
    /// The wall clock cannot be expressed as epoch milliseconds.
    #[error("system clock out of range: {0}")]
    Clock(String),
    /// The series generator failed to produce a step.
    #[error("unable to generate series: {0}")]
    Generate(#[source] hostsim::GenerateError),
    /// The generator returned a step without any series.
    #[error("generator produced an empty batch after {accumulated} samples")]
    StalledGenerator {
        /// Samples accumulated before the stall.
        accumulated: usize,
    },
    /// A series did not carry exactly one sample.
    #[error("expected single sample for series {{{series}}}, got {samples}")]
    SampleCount {
        /// Rendered label set of the offending series.
        series: String,
        /// Number of samples it carried.
        samples: usize,
    },
    /// A series carried a label name twice, or already carried the label the generator appends.
    #[error("series {{{series}}} already carries label {name:?}")]
    LabelCollision {
        /// Rendered label set of the offending series.
        series: String,
        /// Colliding label name.
        name: String,
    },
    /// Generated samples run past the end of the block.
    #[error("too many samples for block: start={start_ms}ms hard_end={hard_end_ms}ms actual_end={actual_end_ms}ms")]
    BlockOverflow {
        /// Block start, epoch ms.
        start_ms: i64,
        /// Exclusive block end, epoch ms.
        hard_end_ms: i64,
        /// Largest observed sample timestamp, epoch ms.
        actual_end_ms: i64,
    },
    /// Generated samples start before the block.
    #[error("samples precede block: start={start_ms}ms actual_start={actual_start_ms}ms")]
    BeforeBlockStart {
        /// Block start, epoch ms.
        start_ms: i64,
        /// Smallest observed sample timestamp, epoch ms.
        actual_start_ms: i64,
    },
    /// The output directory could not be created.
    #[error("could not create dir {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The output file could not be created.
    #[error("could not create output file {path}: {source}")]
    CreateFile {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A sample could not be encoded as JSON.
    #[error("could not encode sample {index} to {path}: {source}")]
    Encode {
        /// File path.
        path: PathBuf,
        /// Position of the sample in the buffer.
        index: usize,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A sample value has no JSON representation.
    #[error("could not encode sample {index} to {path}: non-finite value {value}")]
    NonFiniteValue {
        /// File path.
        path: PathBuf,
        /// Position of the sample in the buffer.
        index: usize,
        /// Offending value.
        value: f64,
    },
    /// Writing to the output file failed.
    #[error("could not write {path}: {source}")]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl From<hostsim::GenerateError> for Error {
    fn from(value: hostsim::GenerateError) -> Self {
        Self::Generate(value)
    }
}
