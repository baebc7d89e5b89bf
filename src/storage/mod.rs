mod file_storage;
mod io_source;
mod memory;

use std::io;

pub use file_storage::FileStorage;
pub use io_source::{IoSource, DEFAULT_READ_AHEAD};
pub use memory::MemoryStorage;

/// Sequential, forward-only byte reader over an opened resource.
pub trait ByteSource {
    /// Read one byte, or `Ok(None)` at end of stream.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Release the underlying handle. Reads after closing yield end of
    /// stream.
    fn close(&mut self) {}
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Something that can open named resources as byte sources, e.g. the root
/// directory of a storage card.
pub trait Storage {
    type Source: ByteSource;

    fn open(&self, identifier: &str) -> io::Result<Self::Source>;
}

impl<T: Storage + ?Sized> Storage for &T {
    type Source = T::Source;

    fn open(&self, identifier: &str) -> io::Result<Self::Source> {
        (**self).open(identifier)
    }
}
