//! Byte destinations for rendered log lines
//!
//! A [`Sink`] is one of a fixed set of writers: standard output, a rotating
//! log file, or an in-memory [`LineBuffer`].

mod buffer;
mod file_writer;
pub mod retention;

use std::io::{self, Write};
use std::sync::Arc;

pub use buffer::LineBuffer;
pub use file_writer::RotatingFileWriter;
pub use retention::{prune_backups, prune_backups_with, Backup, PruneReport};

/// Where a hook writes its formatted lines
#[derive(Debug)]
pub enum Sink {
    /// Process standard output
    Stdout(io::Stdout),
    /// Size-rotated log file
    File(RotatingFileWriter),
    /// Shared in-memory ring of lines
    Buffer(Arc<LineBuffer>),
}

impl Sink {
    pub fn stdout() -> Self {
        Sink::Stdout(io::stdout())
    }

    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Sink::Stdout(_) => "stdout",
            Sink::File(_) => "file",
            Sink::Buffer(_) => "buffer",
        }
    }
}

impl From<RotatingFileWriter> for Sink {
    fn from(writer: RotatingFileWriter) -> Self {
        Sink::File(writer)
    }
}

impl From<Arc<LineBuffer>> for Sink {
    fn from(buffer: Arc<LineBuffer>) -> Self {
        Sink::Buffer(buffer)
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(out) => out.write(buf),
            Sink::File(file) => file.write(buf),
            Sink::Buffer(lines) => {
                lines.push(&String::from_utf8_lossy(buf));
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(out) => out.flush(),
            Sink::File(file) => file.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}
