//! Output handling for `PRN`

use std::io::{self, Write};

/// Receives every value printed by the machine, in execution order
pub trait OutputSink {
    fn emit(&mut self, value: u8) -> io::Result<()>;
}

/// Records values in memory
impl OutputSink for Vec<u8> {
    fn emit(&mut self, value: u8) -> io::Result<()> {
        self.push(value);
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn emit(&mut self, value: u8) -> io::Result<()> {
        (**self).emit(value)
    }
}

/// Writes each value as a decimal line
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn emit(&mut self, value: u8) -> io::Result<()> {
        writeln!(self.writer, "{value}")?;
        self.writer.flush()
    }
}
