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
//! Interface to the external statistics extractor, which computes hop and latency statistics of
//! a message log for a single time window.

use std::{
    path::{Path, PathBuf},
    process::Command,
    str::FromStr,
};

use clap::ValueEnum;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use strum::IntoEnumIterator;

use crate::{bins::Bin, util::fmt_time, ConfigError, Error};

/// Which timestamp of a message the bin window is applied to.
#[derive(
    ValueEnum,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum TimeField {
    Start,
    #[default]
    Send,
    End,
    Recv,
}

lazy_static! {
    static ref FILTER: Regex = Regex::new(r"^[+-][^=]+=[^=]*$").unwrap();
}

/// A non-time filter, passed verbatim to the extractor.
///
/// Filters have the form `+<type>=<values>` (accept) or `-<type>=<values>` (reject). Time based
/// types (`start`, `send`, `end`, `recv`) are rejected; time windows are always given by the bins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter(String);

impl FromStr for Filter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(body) = s.get(1..) {
            if TimeField::iter().any(|field| body.starts_with(&field.to_string())) {
                return Err(ConfigError::TimeBasedFilter(s.to_string()));
            }
        }
        if !FILTER.is_match(s) {
            return Err(ConfigError::InvalidFilter(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the extractor needs to compute the statistics of one bin.
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    pub bin: Bin,
    pub time_field: TimeField,
    pub scalar: Option<f64>,
    pub filters: &'a [Filter],
    pub input: &'a Path,
    /// Where to write the hop statistics grid.
    pub hop_file: &'a Path,
    /// Where to write the latency statistics grid.
    pub lat_file: &'a Path,
}

impl ExtractRequest<'_> {
    /// The time window filter of this bin, e.g. `+send=0-50`.
    pub fn time_filter(&self) -> String {
        format!(
            "+{}={}-{}",
            self.time_field,
            fmt_time(self.bin.start),
            fmt_time(self.bin.end)
        )
    }

    pub(crate) fn failed(&self, reason: impl Into<String>) -> Error {
        Error::Extraction {
            bin: self.bin.index,
            start: self.bin.start,
            end: self.bin.end,
            reason: reason.into(),
        }
    }
}

/// Backend computing the statistics of a single bin.
///
/// On success, both `hop_file` and `lat_file` of the request hold a grid with (at least) a
/// `Packet` row. Any error aborts the whole run.
pub trait StatsExtractor {
    fn extract(&mut self, request: &ExtractRequest<'_>) -> Result<(), Error>;
}

/// Runs an external executable through `sh -c`, once per bin.
#[derive(Debug, Clone)]
pub struct ShellExtractor {
    executable: PathBuf,
}

impl ShellExtractor {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The shell command line for the given request.
    pub fn command_line(&self, request: &ExtractRequest<'_>) -> String {
        let mut cmd = format!(
            "{} -c {} -l {} -f {} {}",
            self.executable.display(),
            request.hop_file.display(),
            request.lat_file.display(),
            request.time_filter(),
            request.input.display(),
        );
        if let Some(scalar) = request.scalar {
            cmd.push_str(&format!(" -s {scalar}"));
        }
        if !request.filters.is_empty() {
            cmd.push(' ');
            cmd.push_str(&request.filters.iter().map(|f| format!("-f {f}")).join(" "));
        }
        cmd
    }
}

impl StatsExtractor for ShellExtractor {
    fn extract(&mut self, request: &ExtractRequest<'_>) -> Result<(), Error> {
        let cmd = self.command_line(request);
        log::debug!("Running: {cmd}");
        let status = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .status()
            .map_err(|e| request.failed(format!("cannot launch `sh`: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(request.failed(format!("`{cmd}` exited with {status}")))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn request<'a>(filters: &'a [Filter], scalar: Option<f64>) -> ExtractRequest<'a> {
        ExtractRequest {
            bin: Bin {
                index: 3,
                start: 50.0,
                end: 62.5,
            },
            time_field: TimeField::Recv,
            scalar,
            filters,
            input: Path::new("/data/messages.mpf.gz"),
            hop_file: Path::new("/tmp/trans_hop"),
            lat_file: Path::new("/tmp/trans_lat"),
        }
    }

    #[test]
    fn time_field_names() {
        assert_eq!(TimeField::default(), TimeField::Send);
        assert_eq!(TimeField::Start.to_string(), "start");
        assert_eq!("recv".parse::<TimeField>().unwrap(), TimeField::Recv);
        assert_eq!(
            TimeField::iter().map(|f| f.to_string()).collect_vec(),
            vec!["start", "send", "end", "recv"]
        );
    }

    #[test]
    fn parse_filters() {
        let filter: Filter = "+hopcount=1-3".parse().unwrap();
        assert_eq!(filter.to_string(), "+hopcount=1-3");

        let filter: Filter = "-src=0,4,7".parse().unwrap();
        assert_eq!(filter.to_string(), "-src=0,4,7");
        assert_eq!("-app=".parse::<Filter>().unwrap().to_string(), "-app=");
    }

    #[test]
    fn reject_time_filters() {
        for s in ["-start=0-10", "+send=1-2", "+end=5-6", "-recv=1-1", "+sendtime=4"] {
            assert_eq!(
                s.parse::<Filter>(),
                Err(ConfigError::TimeBasedFilter(s.to_string()))
            );
        }
    }

    #[test]
    fn reject_malformed_filters() {
        for s in ["", "+", "hopcount=1", "*hc=2", "+hc", "+hc=1=2", "+=3"] {
            assert_eq!(
                s.parse::<Filter>(),
                Err(ConfigError::InvalidFilter(s.to_string()))
            );
        }
    }

    #[test]
    fn command_line() {
        let extractor = ShellExtractor::new("/opt/bin/ssparse");
        assert_eq!(
            extractor.command_line(&request(&[], None)),
            "/opt/bin/ssparse -c /tmp/trans_hop -l /tmp/trans_lat -f +recv=50-62.5 /data/messages.mpf.gz"
        );

        let filters: Vec<Filter> = vec!["+hc=2".parse().unwrap(), "-app=1".parse().unwrap()];
        assert_eq!(
            extractor.command_line(&request(&filters, Some(0.25))),
            "/opt/bin/ssparse -c /tmp/trans_hop -l /tmp/trans_lat -f +recv=50-62.5 \
             /data/messages.mpf.gz -s 0.25 -f +hc=2 -f -app=1"
        );
    }

    #[cfg(unix)]
    #[test]
    fn exit_status() {
        assert!(ShellExtractor::new("true")
            .extract(&request(&[], None))
            .is_ok());

        let err = ShellExtractor::new("false")
            .extract(&request(&[], None))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Extraction { bin: 3, start, end, .. } if start == 50.0 && end == 62.5
        ));
    }
}
