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
//! Resolve the analysis window from the scanned range and optional user bounds.

use crate::{scanner::ScannedRange, ConfigError};

/// Tolerance for comparing user bounds against the scanned range.
pub const TOLERANCE: f64 = 1e-6;

/// Closed time interval `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Returns `None` unless `start <= end`.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Validate the optional user bounds against `scanned` and replace the scanned extrema with them.
///
/// - `min_time` must lie in `[start - TOLERANCE, end + TOLERANCE)`,
/// - `max_time` must lie in `(start - TOLERANCE, end + TOLERANCE]`,
/// - if both are given, `min_time <= max_time`.
///
/// Returns `Ok(None)` if the log holds no flow events (see [`ScannedRange::is_empty`]). Bounds are
/// validated first, so supplying bounds for an empty log is an error.
pub fn resolve(
    scanned: ScannedRange,
    min_time: Option<f64>,
    max_time: Option<f64>,
) -> Result<Option<TimeRange>, ConfigError> {
    let ScannedRange { start, end } = scanned;

    if let (Some(min), Some(max)) = (min_time, max_time) {
        if !(min <= max) {
            return Err(ConfigError::MinAfterMax { min, max });
        }
    }

    let mut resolved = scanned;
    if let Some(time) = min_time {
        if !(time >= start - TOLERANCE && time < end + TOLERANCE) {
            return Err(ConfigError::MinOutOfRange { time, start, end });
        }
        resolved.start = time;
    }
    if let Some(time) = max_time {
        if !(time > start - TOLERANCE && time <= end + TOLERANCE) {
            return Err(ConfigError::MaxOutOfRange { time, start, end });
        }
        resolved.end = time;
    }

    if resolved.is_empty() {
        return Ok(None);
    }

    // a single bound may exceed the opposite scanned extremum by up to TOLERANCE
    let end = resolved.end.max(resolved.start);
    Ok(TimeRange::new(resolved.start, end))
}
