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
//! Partition the analysis window into equal-width bins.

use crate::{range::TimeRange, ConfigError};

/// One bin, covering the half-open window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

/// The `num_bins + 1` boundaries of the bins, spanning exactly `[start, end]` of the range.
///
/// Boundary `i` is `start + i * width` for all but the last boundary, which is set to `end`
/// itself, such that rounding errors never push the last bin past the range. A zero-width range
/// yields zero-width bins; how those are treated is up to the extractor's time filter.
#[derive(Debug, Clone, PartialEq)]
pub struct BinPlan {
    boundaries: Vec<f64>,
}

impl BinPlan {
    pub fn new(range: TimeRange, num_bins: usize) -> Result<Self, ConfigError> {
        if num_bins == 0 {
            return Err(ConfigError::NoBins);
        }
        let width = range.width() / num_bins as f64;
        let boundaries = (0..num_bins)
            .map(|i| range.start() + i as f64 * width)
            .chain(std::iter::once(range.end()))
            .collect();
        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn num_bins(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Start time of every bin, in order. These key the rows of the report.
    pub fn starts(&self) -> &[f64] {
        &self.boundaries[..self.num_bins()]
    }

    pub fn bins(&self) -> impl Iterator<Item = Bin> + '_ {
        self.boundaries
            .windows(2)
            .enumerate()
            .map(|(index, w)| Bin {
                index,
                start: w[0],
                end: w[1],
            })
    }
}
