// TRANSIENT: Time-Binned Hop and Latency Statistics of Network Simulation Message Logs
// Copyright (C) 2024-2025 Roland Schmid <roschmi@ethz.ch> and Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Library for binning a network simulation message log in time and collecting the hop and
//! latency statistics of every bin into a single report.
//!
//! The pipeline scans the log for the time span of its flow events ([`scanner`]), resolves the
//! analysis window ([`range`]), splits it into bins ([`bins`]), runs the statistics extractor once
//! per bin ([`executor`], [`extractor`]), and merges the per-bin grids into the report
//! ([`merge`]).
use std::fs::File;

use indicatif::ProgressBar;

pub mod bins;
pub mod config;
pub mod error;
pub mod executor;
pub mod extractor;
pub mod merge;
pub mod range;
pub mod scanner;
pub mod util;

pub use error::{ConfigError, Error};

pub mod prelude {
    pub use super::{
        config::Config,
        extractor::{Filter, ShellExtractor, StatsExtractor, TimeField},
        run, ConfigError, Error, Outcome,
    };
}

use crate::{bins::BinPlan, config::Config, executor::TempFileSet, extractor::StatsExtractor};

/// Result of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The report was written.
    Written { bins: usize, columns: usize },
    /// The log holds no flow events; an empty report was written.
    EmptyInput,
}

/// Process the log described by `config` and write the report.
///
/// The extractor is invoked once per bin, strictly in order. The first failing bin aborts the run.
/// All temporary files are removed before this function returns, on success and on failure.
pub fn run<E: StatsExtractor>(
    config: &Config,
    extractor: &mut E,
    progress: &ProgressBar,
) -> Result<Outcome, Error> {
    config.validate()?;

    let scanned = scanner::scan_log(&config.input, config.time_scalar())?;
    let Some(range) = range::resolve(scanned, config.min_time, config.max_time)? else {
        log::warn!(
            "No flow events in {:?}, writing empty {:?}",
            config.input,
            config.output
        );
        File::create(&config.output)?;
        return Ok(Outcome::EmptyInput);
    };

    let plan = BinPlan::new(range, config.num_bins)?;
    log::info!(
        "Running extractor for range {}-{} with {} bins",
        range.start(),
        range.end(),
        plan.num_bins()
    );
    progress.set_length(plan.num_bins() as u64);

    let mut files = TempFileSet::new(config.temp_dir.clone());
    let report = executor::execute_bins(&plan, config, extractor, &mut files, progress)
        .and_then(|()| Ok(merge::read_bins(&files)?))
        .and_then(|bins| Ok(merge::merge(&plan, &bins)?));

    let cleanup = files.cleanup();
    let report = report?;
    cleanup?;

    report.write(&config.output)?;
    log::info!("Wrote {report} to {:?}", config.output);

    Ok(Outcome::Written {
        bins: plan.num_bins(),
        columns: report.column_names().len(),
    })
}
