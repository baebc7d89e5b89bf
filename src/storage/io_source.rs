use std::io::{self, BufRead, BufReader, Read};

use super::ByteSource;

/// One storage sector; enough to avoid a read call per byte without
/// holding much of the resource in memory.
pub const DEFAULT_READ_AHEAD: usize = 512;

/// Adapts any [`Read`] into a [`ByteSource`].
pub struct IoSource<R> {
    reader: Option<BufReader<R>>,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_READ_AHEAD, inner)
    }

    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            reader: Some(BufReader::with_capacity(capacity.max(1), inner)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Give back the wrapped reader. Bytes already read ahead are lost.
    pub fn into_inner(self) -> Option<R> {
        self.reader.map(BufReader::into_inner)
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => return Ok(None),
        };

        loop {
            match reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(available) => {
                    let byte = available[0];
                    reader.consume(1);
                    return Ok(Some(byte));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn close(&mut self) {
        self.reader = None;
    }
}
