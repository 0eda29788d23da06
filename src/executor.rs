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
//! Runs the extractor once per bin, sequentially, and keeps track of the per-bin temporary files.

use std::{
    io,
    path::{Path, PathBuf},
};

use indicatif::ProgressBar;
use tempfile::TempPath;

use crate::{
    bins::BinPlan,
    config::Config,
    extractor::{ExtractRequest, StatsExtractor},
    Error,
};

/// Prefix of all temporary files created by a run.
pub const TEMP_PREFIX: &str = "trans_";

/// The temporary result files of all bins processed so far.
///
/// Hop and latency files are kept in two parallel lists, such that every file ever allocated can
/// be found again. Files are removed by [`TempFileSet::cleanup`], or, on any other exit path, when
/// the set is dropped.
#[derive(Debug, Default)]
pub struct TempFileSet {
    dir: Option<PathBuf>,
    hop: Vec<TempPath>,
    lat: Vec<TempPath>,
}

impl TempFileSet {
    /// Create an empty set placing its files in `dir` (or the system temp directory).
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            ..Default::default()
        }
    }

    /// Allocate the hop and latency file of the next bin and return their paths.
    pub fn allocate(&mut self) -> io::Result<(&Path, &Path)> {
        let hop = self.temp_path()?;
        self.hop.push(hop);
        let lat = self.temp_path()?;
        self.lat.push(lat);
        let idx = self.lat.len() - 1;
        Ok((&*self.hop[idx], &*self.lat[idx]))
    }

    /// Number of bins with a complete hop/latency pair.
    pub fn num_bins(&self) -> usize {
        self.hop.len().min(self.lat.len())
    }

    /// All hop/latency pairs, in bin order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Path, &Path)> + '_ {
        self.hop
            .iter()
            .zip(&self.lat)
            .map(|(hop, lat)| (&**hop, &**lat))
    }

    /// Remove all files, continuing past failures. Returns the first error.
    pub fn cleanup(self) -> io::Result<()> {
        let num_files = self.hop.len() + self.lat.len();
        let mut result = Ok(());
        for path in self.hop.into_iter().chain(self.lat) {
            if let Err(e) = path.close() {
                log::warn!("Cannot remove temporary file: {e}");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        log::debug!("Removed {num_files} temporary files");
        result
    }

    fn temp_path(&self) -> io::Result<TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file.into_temp_path())
    }
}

/// Run the extractor for every bin of `plan`, in order, allocating the result files in `files`.
///
/// Stops at the first failing bin; no further bins are started. The files of all bins (including
/// the failing one) remain in `files` for the caller to clean up.
pub fn execute_bins<E: StatsExtractor>(
    plan: &BinPlan,
    config: &Config,
    extractor: &mut E,
    files: &mut TempFileSet,
    progress: &ProgressBar,
) -> Result<(), Error> {
    for bin in plan.bins() {
        let (hop_file, lat_file) = files.allocate()?;
        let request = ExtractRequest {
            bin,
            time_field: config.time_field,
            scalar: config.time_scalar(),
            filters: &config.filters,
            input: &config.input,
            hop_file,
            lat_file,
        };
        log::trace!("bin {}: {}", bin.index, request.time_filter());
        extractor.extract(&request)?;
        progress.inc(1);
    }
    Ok(())
}
