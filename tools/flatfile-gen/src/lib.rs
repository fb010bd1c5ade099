// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! CONTEXT: flatfile-gen – deterministic, cardinality-bounded sample workload generator
//!
//! OWNERS: @runtime
//!
//! STATUS: Experimental
//!
//! API_STABILITY: Unstable
//!
//! TEST_COVERAGE:
//!   - Unit tests: per module (anchor alignment, identity stream, loop cut-off, writer format)
//!   - Integration tests: `tools/flatfile-gen/tests/pipeline.rs`, `tools/flatfile-gen/tests/cli.rs`
//!
//! PUBLIC API:
//!   - `block`: time anchor + block-boundary validator
//!   - `identity`: seeded identity allocator
//!   - `accumulate`: generation-accumulation loop
//!   - `writer`: JSON-lines flat-file writer
//!   - `pipeline`: `run()` / `generate_flat_file()` drivers
//!
//! Every stage returns `Result`; any error ends the run before the writer is reached.

pub mod accumulate;
pub mod block;
pub mod cli;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod sample;
pub mod writer;

pub use error::{Error, Result};
pub use pipeline::{generate_flat_file, run, Config, Report};
pub use sample::{Label, Labels, MetricSample};
