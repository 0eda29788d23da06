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
//! Open input and output files, transparently handling gzip compression based on the `.gz`
//! suffix of the path.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use flate2::{bufread::MultiGzDecoder, write::GzEncoder, Compression};

/// Returns `true` if the path should be treated as gzip-compressed.
pub fn is_gzip(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Open a file for buffered reading. Files ending in `.gz` are decompressed on the fly.
pub fn open_reader(path: impl AsRef<Path>) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let bufreader = BufReader::new(File::open(path)?);
    if is_gzip(path) {
        log::trace!("reading {path:?} as gzip");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(bufreader))))
    } else {
        Ok(Box::new(bufreader))
    }
}

/// Buffered output file, gzip-compressed if the path ends in `.gz`.
///
/// Call [`OutFile::finish`] once everything is written, such that errors while flushing (or while
/// writing the gzip trailer) are reported instead of being swallowed on drop.
pub enum OutFile {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutFile {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bufwriter = BufWriter::new(File::create(path)?);
        if is_gzip(path) {
            Ok(Self::Gzip(GzEncoder::new(bufwriter, Compression::default())))
        } else {
            Ok(Self::Plain(bufwriter))
        }
    }

    /// Flush all buffered data and close the file.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Plain(mut w) => w.flush(),
            Self::Gzip(w) => w.finish()?.flush(),
        }
    }
}

impl Write for OutFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }
}
