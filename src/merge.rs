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
//! Merge the per-bin hop and latency grids into a single report, indexed by bin start time.

use itertools::Itertools;
use transient_utils::grid::{Grid, GridError};

use crate::{bins::BinPlan, executor::TempFileSet, util::fmt_time};

/// Row of the per-bin grids holding the packet statistics.
pub const PACKET_ROW: &str = "Packet";
/// Name of the row key column of the report.
pub const TIME_KEY: &str = "Time";
/// Value of cells a bin has no statistic for.
pub const MISSING: &str = "nan";

pub const AVE_HOPS: &str = "AveHops";
pub const AVE_MIN_HOPS: &str = "AveMinHops";
pub const PER_MINIMAL: &str = "PerMinimal";
pub const AVE_NON_MIN_HOPS: &str = "AveNonMinHops";
pub const PER_NON_MINIMAL: &str = "PerNonMinimal";

const PER_HOPS: &str = "PerHops";
const PER_MIN_HOPS: &str = "PerMinHops";
const PER_NON_MIN_HOPS: &str = "PerNonMinHops";

/// Hop and latency statistics of a single bin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinGrids {
    pub hop: Grid,
    pub lat: Grid,
}

/// Read the result grids of all bins, in bin order.
pub fn read_bins(files: &TempFileSet) -> Result<Vec<BinGrids>, GridError> {
    log::debug!("Reading the results of {} bins", files.num_bins());
    files
        .pairs()
        .enumerate()
        .map(|(idx, (hop, lat))| {
            let grids = BinGrids {
                hop: Grid::read(hop)?,
                lat: Grid::read(lat)?,
            };
            log::trace!("bin {idx}: hop {}, lat {}", grids.hop, grids.lat);
            Ok::<_, GridError>(grids)
        })
        .collect()
}

/// Columns observed across all bins, in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCatalog {
    hop: Vec<String>,
    lat: Vec<String>,
}

impl ColumnCatalog {
    pub fn from_bins(bins: &[BinGrids]) -> Self {
        Self {
            hop: ordered_union(bins.iter().map(|b| &b.hop)),
            lat: ordered_union(bins.iter().map(|b| &b.lat)),
        }
    }

    /// Hop columns in first-seen order.
    pub fn hop(&self) -> &[String] {
        &self.hop
    }

    /// Latency columns in first-seen order.
    pub fn lat(&self) -> &[String] {
        &self.lat
    }

    /// Hop columns in report order:
    ///
    /// `AveHops`, `*PerHops*`, `AveMinHops`, `PerMinimal`, `*PerMinHops*`, `AveNonMinHops`,
    /// `PerNonMinimal`, `*PerNonMinHops*`
    ///
    /// The four scalar columns are always present. Within each group, columns keep their
    /// first-seen order. Observed columns matching none of the groups follow at the end.
    pub fn hop_order(&self) -> Vec<String> {
        let group = |pattern: &'static str| {
            self.hop
                .iter()
                .filter(move |c| c.contains(pattern))
                .map(String::as_str)
        };

        let ordered = std::iter::once(AVE_HOPS)
            .chain(group(PER_HOPS))
            .chain([AVE_MIN_HOPS, PER_MINIMAL])
            .chain(group(PER_MIN_HOPS))
            .chain([AVE_NON_MIN_HOPS, PER_NON_MINIMAL])
            .chain(group(PER_NON_MIN_HOPS))
            .unique()
            .collect_vec();
        let rest = self
            .hop
            .iter()
            .map(String::as_str)
            .filter(|c| !ordered.contains(c))
            .collect_vec();

        ordered
            .into_iter()
            .chain(rest)
            .map(str::to_string)
            .collect()
    }

    /// Latency columns not already reported as hop columns.
    fn lat_order(&self, hop_order: &[String]) -> Vec<String> {
        self.lat
            .iter()
            .filter(|c| !hop_order.contains(*c))
            .cloned()
            .collect()
    }
}

fn ordered_union<'a>(grids: impl Iterator<Item = &'a Grid>) -> Vec<String> {
    grids
        .flat_map(|g| g.column_names())
        .unique()
        .cloned()
        .collect()
}

/// Build the report: one row per bin (keyed by the bin's start time), the hop columns in report
/// order followed by the latency columns. Every cell is set; statistics missing from a bin are
/// reported as [`MISSING`].
pub fn merge(plan: &BinPlan, bins: &[BinGrids]) -> Result<Grid, GridError> {
    debug_assert_eq!(plan.num_bins(), bins.len());

    let catalog = ColumnCatalog::from_bins(bins);
    let hop_columns = catalog.hop_order();
    let lat_columns = catalog.lat_order(&hop_columns);
    log::debug!(
        "Merging {} bins with {} hop and {} latency columns",
        bins.len(),
        hop_columns.len(),
        lat_columns.len()
    );

    let mut report = Grid::create(
        TIME_KEY,
        plan.starts().iter().map(|t| fmt_time(*t)),
        hop_columns.iter().chain(&lat_columns).map(String::as_str),
    )?;

    for (row, bin) in bins.iter().enumerate() {
        for column in &hop_columns {
            report.set_at(row, column, bin.hop.get_or(PACKET_ROW, column, MISSING))?;
        }
        for column in &lat_columns {
            report.set_at(row, column, bin.lat.get_or(PACKET_ROW, column, MISSING))?;
        }
    }

    Ok(report)
}
