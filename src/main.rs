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
use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use transient::{
    config::{Config, DEFAULT_NUM_BINS},
    prelude::*,
    util,
};

#[derive(Parser, Debug)]
#[command(author, version, about)] // get author/version information from Cargo.toml
struct Args {
    /// Statistics extractor executable.
    extractor: PathBuf,
    /// Input message log (may be gzip-compressed, `.gz`).
    infile: PathBuf,
    /// Output CSV file (gzip-compressed if it ends in `.gz`).
    outfile: PathBuf,
    /// Number of time buckets.
    #[arg(short, long, default_value_t = DEFAULT_NUM_BINS)]
    buckets: usize,
    /// Min send time.
    #[arg(short, long, allow_negative_numbers = true)]
    mintime: Option<f64>,
    /// Max send time.
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    maxtime: Option<f64>,
    /// Time scalar.
    #[arg(short, long)]
    scalar: Option<f64>,
    /// Type of time filter to use.
    #[arg(short, long, value_enum, default_value_t = TimeField::Send)]
    time: TimeField,
    /// Filters to be used (can't be time based). Can be applied multiple times.
    #[arg(short, long, allow_hyphen_values = true)]
    filters: Vec<String>,
    /// Directory for temporary per-bucket files. Defaults to the system temp directory.
    #[arg(long)]
    temp_dir: Option<PathBuf>,
    /// log4rs configuration file. Without it, logging is controlled by `RUST_LOG`.
    #[arg(long)]
    log_config: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::new(&self.infile, &self.outfile);
        config.num_bins = self.buckets;
        config.min_time = self.mintime;
        config.max_time = self.maxtime;
        config.scalar = self.scalar;
        config.time_field = self.time;
        config.temp_dir = self.temp_dir.clone();
        let config = config.with_filters(&self.filters)?;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let multi = MultiProgress::new();
    if let Err(e) = util::init_logging(args.log_config.as_deref(), &multi) {
        eprintln!("Cannot initialize logging: {e:?}");
        return ExitCode::FAILURE;
    }

    match process(&args, &multi) {
        Ok(outcome) => {
            log::info!("{}", summary(&outcome));
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn summary(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Written { bins, columns } => format!("Done: {bins} buckets, {columns} columns"),
        Outcome::EmptyInput => "Done: no flow events, wrote an empty report".to_string(),
    }
}

fn process(args: &Args, multi: &MultiProgress) -> anyhow::Result<Outcome> {
    let config = args.config().context("Invalid arguments")?;
    let mut extractor = ShellExtractor::new(&args.extractor);

    let pb = multi.add(
        ProgressBar::new(config.num_bins as u64).with_style(
            ProgressStyle::with_template(
                "[{bar:60}] bucket: {pos:>4}/{len:4}, elapsed: {elapsed}, eta: {eta}",
            )?
            .progress_chars("##-"),
        ),
    );

    let outcome = run(&config, &mut extractor, &pb)
        .with_context(|| format!("Error processing {:?}", config.input))?;
    pb.finish_and_clear();
    Ok(outcome)
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(["transient", "./ssparse", "in.mpf.gz", "out.csv"].iter().chain(args))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).config().unwrap();
        assert_eq!(config.num_bins, 40);
        assert_eq!(config.time_field, TimeField::Send);
        assert_eq!(config.input, PathBuf::from("in.mpf.gz"));
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert_eq!(config.min_time, None);
        assert_eq!(config.scalar, None);
        assert!(config.filters.is_empty());
    }

    #[test]
    fn options() {
        let args = parse(&[
            "-b", "8", "-m", "10", "-n", "90.5", "-s", "0.001", "-t", "recv", "-f", "+hc=2", "-f",
            "-src=4",
        ]);
        let config = args.config().unwrap();
        assert_eq!(config.num_bins, 8);
        assert_eq!(config.min_time, Some(10.0));
        assert_eq!(config.max_time, Some(90.5));
        assert_eq!(config.scalar, Some(0.001));
        assert_eq!(config.time_field, TimeField::Recv);
        assert_eq!(
            config.filters.iter().map(Filter::to_string).collect::<Vec<_>>(),
            vec!["+hc=2", "-src=4"]
        );
    }

    #[test]
    fn time_filters_are_rejected() {
        let args = parse(&["-f", "-start=0-100"]);
        assert_eq!(
            args.config(),
            Err(ConfigError::TimeBasedFilter("-start=0-100".to_string()))
        );
    }

    #[test]
    fn invalid_values() {
        assert_eq!(parse(&["-b", "0"]).config(), Err(ConfigError::NoBins));
        assert!(matches!(
            parse(&["-m", "5", "-n", "1"]).config(),
            Err(ConfigError::MinAfterMax { .. })
        ));
        assert!(Args::try_parse_from(["transient", "x", "in", "out", "-t", "now"]).is_err());
    }

    #[test]
    fn negative_bounds() {
        let config = parse(&["-m", "-5e-7", "-n", "-0.5"]).config();
        assert!(matches!(config, Err(ConfigError::MinAfterMax { .. })));

        let config = parse(&["-m", "-5e-7", "-n", "20"]).config().unwrap();
        assert_eq!(config.min_time, Some(-5e-7));
        assert_eq!(config.max_time, Some(20.0));
    }

    #[test]
    fn summaries() {
        assert_eq!(
            summary(&Outcome::Written {
                bins: 40,
                columns: 12
            }),
            "Done: 40 buckets, 12 columns"
        );
        assert_eq!(
            summary(&Outcome::EmptyInput),
            "Done: no flow events, wrote an empty report"
        );
    }
}
