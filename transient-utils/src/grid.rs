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
//! Row/column tables of string cells, as produced by the statistics extractor and as written to
//! the final report.
//!
//! On disk, a grid is a CSV file. The first header cell names the row key (e.g., `Type` or
//! `Time`), the remaining header cells name the columns. Each record starts with its row key.
//! Empty cells are treated as missing.

use std::{
    collections::HashMap,
    io::{Read, Write},
    path::Path,
};

use itertools::Itertools;

use crate::file::{open_reader, OutFile};

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("Unknown row `{0}`")]
    UnknownRow(String),
    #[error("Row index {0} out of bounds ({1} rows)")]
    RowOutOfBounds(usize, usize),
    #[error("Unknown column `{0}`")]
    UnknownColumn(String),
}

/// A table of string cells, addressed by row key and column name.
///
/// Rows keep their insertion order. Row keys are not required to be unique; looking up a row by
/// its key resolves to the first row with that key, while [`Grid::set_at`] addresses rows by
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    key: String,
    rows: Vec<String>,
    row_index: HashMap<String, usize>,
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    cells: Vec<Vec<Option<String>>>,
}

impl Grid {
    /// Create an empty grid with the given row key name, rows and columns. All cells are unset.
    pub fn create<R, C>(
        key: impl Into<String>,
        rows: impl IntoIterator<Item = R>,
        columns: impl IntoIterator<Item = C>,
    ) -> Result<Self, GridError>
    where
        R: Into<String>,
        C: Into<String>,
    {
        let mut grid = Self {
            key: key.into(),
            ..Default::default()
        };
        for column in columns {
            grid.push_column(column.into())?;
        }
        for row in rows {
            grid.push_row(row.into());
        }
        Ok(grid)
    }

    /// Read a grid from a CSV file (gzip-compressed if the path ends in `.gz`).
    ///
    /// An empty file yields an empty grid.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, GridError> {
        Self::from_reader(open_reader(path)?)
    }

    /// Read a grid from any CSV source.
    pub fn from_reader(reader: impl Read) -> Result<Self, GridError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = csv.records();
        let Some(header) = records.next().transpose()? else {
            return Ok(Self::default());
        };
        let mut header = header.iter();
        let mut grid = Self::create(header.next().unwrap_or_default(), Vec::<String>::new(), header)?;

        for record in records {
            let record = record?;
            let mut fields = record.iter();
            let Some(row_key) = fields.next() else {
                continue;
            };
            let row = grid.push_row(row_key.to_string());
            for (col, value) in fields.enumerate().take(grid.columns.len()) {
                if !value.is_empty() {
                    grid.cells[row][col] = Some(value.to_string());
                }
            }
        }

        Ok(grid)
    }

    /// Write the grid as CSV (gzip-compressed if the path ends in `.gz`).
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), GridError> {
        let mut out = OutFile::create(path)?;
        self.to_writer(&mut out)?;
        out.finish()?;
        Ok(())
    }

    /// Write the grid as CSV into any sink.
    pub fn to_writer(&self, writer: impl Write) -> Result<(), GridError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(std::iter::once(&self.key).chain(&self.columns))?;
        for (row, cells) in self.rows.iter().zip(&self.cells) {
            csv.write_record(
                std::iter::once(row.as_str())
                    .chain(cells.iter().map(|c| c.as_deref().unwrap_or_default())),
            )?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Name of the row key column.
    pub fn key_name(&self) -> &str {
        &self.key
    }

    /// All row keys, in order.
    pub fn row_names(&self) -> &[String] {
        &self.rows
    }

    /// All column names, in order (without the row key column).
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    /// Get the value at `row` and `column`, if the cell exists and is set.
    pub fn get(&self, row: &str, column: &str) -> Option<&str> {
        let row = *self.row_index.get(row)?;
        let col = *self.column_index.get(column)?;
        self.cells[row][col].as_deref()
    }

    /// Get the value at `row` and `column`, or `default` if the grid has no such cell.
    pub fn get_or<'a>(&'a self, row: &str, column: &str, default: &'a str) -> &'a str {
        self.get(row, column).unwrap_or(default)
    }

    /// Set the value of an existing cell, addressing the row by its key.
    pub fn set(
        &mut self,
        row: &str,
        column: &str,
        value: impl Into<String>,
    ) -> Result<(), GridError> {
        let idx = *self
            .row_index
            .get(row)
            .ok_or_else(|| GridError::UnknownRow(row.to_string()))?;
        self.set_at(idx, column, value)
    }

    /// Set the value of an existing cell, addressing the row by its position.
    pub fn set_at(
        &mut self,
        row: usize,
        column: &str,
        value: impl Into<String>,
    ) -> Result<(), GridError> {
        let num_rows = self.rows.len();
        let col = *self
            .column_index
            .get(column)
            .ok_or_else(|| GridError::UnknownColumn(column.to_string()))?;
        let cells = self
            .cells
            .get_mut(row)
            .ok_or(GridError::RowOutOfBounds(row, num_rows))?;
        cells[col] = Some(value.into());
        Ok(())
    }

    /// Returns `true` if every cell of the grid holds a value.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    fn push_column(&mut self, column: String) -> Result<(), GridError> {
        if self.column_index.contains_key(&column) {
            return Err(GridError::DuplicateColumn(column));
        }
        self.column_index.insert(column.clone(), self.columns.len());
        self.columns.push(column);
        for cells in self.cells.iter_mut() {
            cells.push(None);
        }
        Ok(())
    }

    fn push_row(&mut self, row: String) -> usize {
        let idx = self.rows.len();
        self.row_index.entry(row.clone()).or_insert(idx);
        self.rows.push(row);
        self.cells.push(vec![None; self.columns.len()]);
        idx
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} x {} grid keyed by `{}` [{}]",
            self.rows.len(),
            self.columns.len(),
            self.key,
            self.columns.iter().join(", ")
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const AGGREGATE: &str = "Type,Count,Minimum,Maximum\n\
                             Packet,10,1.5,9.0\n\
                             Message,4,,12.0\n";

    #[test]
    fn read_aggregate() {
        let grid = Grid::from_reader(AGGREGATE.as_bytes()).unwrap();
        assert_eq!(grid.key_name(), "Type");
        assert_eq!(grid.column_names(), &["Count", "Minimum", "Maximum"]);
        assert_eq!(grid.row_names(), &["Packet", "Message"]);
        assert_eq!(grid.get("Packet", "Minimum"), Some("1.5"));
        assert_eq!(grid.get("Message", "Maximum"), Some("12.0"));
        // empty cells are missing
        assert_eq!(grid.get("Message", "Minimum"), None);
        assert_eq!(grid.get_or("Message", "Minimum", "nan"), "nan");
        assert_eq!(grid.get_or("Transaction", "Count", "nan"), "nan");
        assert_eq!(grid.get_or("Packet", "Mean", "nan"), "nan");
        assert!(!grid.is_complete());
    }

    #[test]
    fn read_empty() {
        let grid = Grid::from_reader("".as_bytes()).unwrap();
        assert!(grid.column_names().is_empty());
        assert!(grid.row_names().is_empty());
        assert_eq!(grid.get_or("Packet", "AveHops", "nan"), "nan");
    }

    #[test]
    fn create_set_write() {
        let mut grid = Grid::create("Time", ["0", "50"], ["AveHops", "Mean"]).unwrap();
        assert!(!grid.is_complete());
        grid.set("0", "AveHops", "2.5").unwrap();
        grid.set("0", "Mean", "nan").unwrap();
        grid.set_at(1, "AveHops", "3").unwrap();
        grid.set_at(1, "Mean", "17.25").unwrap();
        assert!(grid.is_complete());

        let mut buf = Vec::new();
        grid.to_writer(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Time,AveHops,Mean\n0,2.5,nan\n50,3,17.25\n"
        );
    }

    #[test]
    fn set_errors() {
        let mut grid = Grid::create("Time", ["0"], ["AveHops"]).unwrap();
        assert!(matches!(
            grid.set("1", "AveHops", "1"),
            Err(GridError::UnknownRow(r)) if r == "1"
        ));
        assert!(matches!(
            grid.set("0", "Mean", "1"),
            Err(GridError::UnknownColumn(c)) if c == "Mean"
        ));
        assert!(matches!(
            grid.set_at(3, "AveHops", "1"),
            Err(GridError::RowOutOfBounds(3, 1))
        ));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        assert!(matches!(
            Grid::create("Time", ["0"], ["A", "B", "A"]),
            Err(GridError::DuplicateColumn(c)) if c == "A"
        ));
    }

    #[test]
    fn duplicate_rows_resolve_to_first() {
        let mut grid = Grid::create("Time", ["5", "5"], ["A"]).unwrap();
        grid.set_at(0, "A", "first").unwrap();
        grid.set_at(1, "A", "second").unwrap();
        assert_eq!(grid.get("5", "A"), Some("first"));
        assert_eq!(grid.row_names().len(), 2);
    }

    #[test]
    fn file_roundtrip_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv.gz");
        let grid = Grid::from_reader(AGGREGATE.as_bytes()).unwrap();
        grid.write(&path).unwrap();
        assert_eq!(Grid::read(&path).unwrap(), grid);
    }
}
