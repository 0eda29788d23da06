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
//! Error kinds of the binning pipeline.

use transient_utils::grid::GridError;

/// Invalid user input, detected before any external tool is invoked.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Filters can't be time based, i.e. 'start', 'send', 'end', 'recv': `{0}`")]
    TimeBasedFilter(String),
    #[error("Invalid filter `{0}`, expected `+<type>=<values>` or `-<type>=<values>`")]
    InvalidFilter(String),
    #[error("The number of bins must be positive")]
    NoBins,
    #[error("Invalid time scalar {0}")]
    InvalidScalar(f64),
    #[error("Start [{min}] must be <= end [{max}]")]
    MinAfterMax { min: f64, max: f64 },
    #[error("Start [{time}] not in sim range: {start}-{end}")]
    MinOutOfRange { time: f64, start: f64, end: f64 },
    #[error("End [{time}] not in sim range: {start}-{end}")]
    MaxOutOfRange { time: f64, start: f64, end: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Extraction failed for bin {bin} [{start}-{end}): {reason}")]
    Extraction {
        bin: usize,
        start: f64,
        end: f64,
        reason: String,
    },
    #[error("Malformed flow event on line {line}: {reason}")]
    Scan { line: usize, reason: String },
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
