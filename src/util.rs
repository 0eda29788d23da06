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
//! Utility module collection of functions

use std::path::Path;

use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

/// Initialize logging.
///
/// With a `log4rs` configuration file, logging is set up entirely from that file. Otherwise,
/// `pretty_env_logger` is used (defaulting to `info`, overridable with `RUST_LOG`), routed through
/// `multi` such that log lines do not tear the progress bars.
pub fn init_logging(log_config: Option<&Path>, multi: &MultiProgress) -> anyhow::Result<()> {
    if let Some(log_config) = log_config {
        return log4rs::init_file(log_config, Default::default());
    }

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let logger = builder.build();
    let level = logger.filter();
    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(level);
    Ok(())
}

/// Format a timestamp the way it appears in time filters and in the `Time` column of the report:
/// the shortest representation that parses back to the same `f64` (`0`, `50`, `12.5`).
pub fn fmt_time(t: f64) -> String {
    format!("{t}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn time_formatting() {
        assert_eq!(fmt_time(0.0), "0");
        assert_eq!(fmt_time(50.0), "50");
        assert_eq!(fmt_time(12.5), "12.5");
        assert_eq!(fmt_time(1.0 / 3.0).parse::<f64>().unwrap(), 1.0 / 3.0);
    }
}
