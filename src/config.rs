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
//! Configuration of a single run.

use std::path::PathBuf;

use crate::{
    extractor::{Filter, TimeField},
    ConfigError,
};

/// Default number of bins.
pub const DEFAULT_NUM_BINS: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Message log to analyze (gzip-compressed if it ends in `.gz`).
    pub input: PathBuf,
    /// Report to write (gzip-compressed if it ends in `.gz`).
    pub output: PathBuf,
    /// Number of bins.
    pub num_bins: usize,
    /// Optional lower bound of the analysis window.
    pub min_time: Option<f64>,
    /// Optional upper bound of the analysis window.
    pub max_time: Option<f64>,
    /// Optional factor applied to all timestamps of the log. A factor of `0` means no scaling.
    pub scalar: Option<f64>,
    /// Timestamp the bin windows apply to.
    pub time_field: TimeField,
    /// Additional non-time filters passed to the extractor.
    pub filters: Vec<Filter>,
    /// Directory for the per-bin temporary files. Defaults to the system temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            num_bins: DEFAULT_NUM_BINS,
            min_time: None,
            max_time: None,
            scalar: None,
            time_field: TimeField::default(),
            filters: Vec::new(),
            temp_dir: None,
        }
    }

    /// Parse and add the given filters.
    pub fn with_filters<S: AsRef<str>>(
        mut self,
        filters: impl IntoIterator<Item = S>,
    ) -> Result<Self, ConfigError> {
        for filter in filters {
            self.filters.push(filter.as_ref().parse()?);
        }
        Ok(self)
    }

    /// The factor applied to the timestamps, if any. `0` disables scaling.
    pub fn time_scalar(&self) -> Option<f64> {
        self.scalar.filter(|scalar| *scalar != 0.0)
    }

    /// Check everything that can be checked without reading the log.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bins == 0 {
            return Err(ConfigError::NoBins);
        }
        if let Some(scalar) = self.scalar {
            if !scalar.is_finite() {
                return Err(ConfigError::InvalidScalar(scalar));
            }
        }
        if let (Some(min), Some(max)) = (self.min_time, self.max_time) {
            if !(min <= max) {
                return Err(ConfigError::MinAfterMax { min, max });
            }
        }
        Ok(())
    }
}
