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
//! Single pass over a message log to discover the time span covered by its flow events.
//!
//! A line is a flow event if it contains the marker `F`. Its comma-separated field at index 2
//! holds the timestamp used for range discovery, both as send and as receive time.

use std::{io::BufRead, path::Path};

use transient_utils::file::open_reader;

use crate::Error;

/// Marker identifying flow events.
pub const FLOW_MARKER: char = 'F';
/// Index of the timestamp field within a flow event.
pub const TIME_FIELD_INDEX: usize = 2;

/// Extrema of the flow event timestamps of a log.
///
/// A log without flow events yields [`ScannedRange::EMPTY`], i.e. `start = +inf` and `end = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScannedRange {
    /// Minimum observed send time.
    pub start: f64,
    /// Maximum observed receive time.
    pub end: f64,
}

impl ScannedRange {
    pub const EMPTY: Self = Self {
        start: f64::INFINITY,
        end: 0.0,
    };

    /// Returns `true` if the range is the empty-log sentinel (or collapsed onto it).
    pub fn is_empty(&self) -> bool {
        self.start == f64::INFINITY || self.end == 0.0
    }

    fn observe(&mut self, send: f64, recv: f64) {
        if send < self.start {
            self.start = send;
        }
        if recv > self.end {
            self.end = recv;
        }
    }
}

impl Default for ScannedRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Scan the log at `path` (gzip-compressed if it ends in `.gz`). If `scalar` is given, all
/// timestamps are multiplied by it.
pub fn scan_log(path: impl AsRef<Path>, scalar: Option<f64>) -> Result<ScannedRange, Error> {
    let path = path.as_ref();
    log::debug!("Scanning {path:?} for flow events");
    let range = scan_lines(open_reader(path)?, scalar)?;
    log::debug!("Scanned range of {path:?}: {}-{}", range.start, range.end);
    Ok(range)
}

/// Scan an already opened log.
pub fn scan_lines(reader: impl BufRead, scalar: Option<f64>) -> Result<ScannedRange, Error> {
    let mut range = ScannedRange::EMPTY;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if !line.contains(FLOW_MARKER) {
            continue;
        }
        let time = flow_time(line).map_err(|reason| Error::Scan {
            line: idx + 1,
            reason,
        })?;
        let time = match scalar {
            Some(scalar) => time as f64 * scalar,
            None => time as f64,
        };
        range.observe(time, time);
    }
    Ok(range)
}

fn flow_time(line: &str) -> Result<u64, String> {
    let field = line
        .split(',')
        .nth(TIME_FIELD_INDEX)
        .ok_or_else(|| format!("missing field {TIME_FIELD_INDEX} in `{line}`"))?
        .trim();
    field
        .parse()
        .map_err(|e| format!("invalid time `{field}`: {e}"))
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    const LOG: &str = "+T,0,100\n\
                       +M,0,1,2,0,0\n\
                       +P,0,3\n\
                       F,0,120,130\n\
                       F,1,121,131\n\
                       -P\n\
                       -M\n\
                       +M,1,2,1,0,0\n\
                       +P,0,2\n\
                       F,0,95,99\n\
                       F,1,340,350\n\
                       -P\n\
                       -M\n\
                       -T,0,350\n";

    #[test]
    fn scan_extrema() {
        let range = scan_lines(LOG.as_bytes(), None).unwrap();
        assert_eq!(range, ScannedRange { start: 95.0, end: 340.0 });
        assert!(!range.is_empty());
        assert!(range.start <= range.end);
    }

    #[test]
    fn scan_scaled() {
        let plain = scan_lines(LOG.as_bytes(), None).unwrap();
        let scaled = scan_lines(LOG.as_bytes(), Some(0.5)).unwrap();
        assert_eq!(scaled.start, plain.start * 0.5);
        assert_eq!(scaled.end, plain.end * 0.5);
    }

    #[test]
    fn scan_without_flows() {
        let range = scan_lines("+T,0,1\n-T,0,2\n\n".as_bytes(), None).unwrap();
        assert_eq!(range, ScannedRange::EMPTY);
        assert!(range.is_empty());
    }

    #[test]
    fn scan_malformed() {
        let err = scan_lines("+T,0,1\nF,0\n".as_bytes(), None).unwrap_err();
        assert!(matches!(err, Error::Scan { line: 2, .. }));
        let err = scan_lines("F,0,abc,4\n".as_bytes(), None).unwrap_err();
        assert!(matches!(err, Error::Scan { line: 1, .. }));
    }

    #[test]
    fn scan_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.mpf.gz");
        let mut enc = flate2::write::GzEncoder::new(
            std::fs::File::create(&path).unwrap(),
            flate2::Compression::default(),
        );
        enc.write_all(LOG.as_bytes()).unwrap();
        enc.finish().unwrap();

        let range = scan_log(&path, None).unwrap();
        assert_eq!(range, ScannedRange { start: 95.0, end: 340.0 });
    }
}
