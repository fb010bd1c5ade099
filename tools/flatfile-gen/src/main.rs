// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! CONTEXT: flatfile-gen entrypoint wiring flags and logging to the pipeline
//! OWNERS: @runtime
//! STATUS: Experimental

use std::process::ExitCode;

use clap::Parser;
use flatfile_gen::cli::Args;
use log::{error, info};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage errors exit here with status 2, before any generation work.
    let args = Args::parse();
    match args.into_config().and_then(|config| flatfile_gen::run(&config)) {
        Ok(report) => {
            info!(
                "flatfile-gen: wrote {} samples to {} (gen {:?}, write {:?})",
                report.samples,
                report.path.display(),
                report.gen_time,
                report.write_time
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("flatfile-gen: {err}");
            ExitCode::FAILURE
        }
    }
}
