use std::collections::BTreeMap;
use std::io::{self, Cursor};
use std::sync::Arc;

use super::{IoSource, Storage};

/// Storage whose resources live in memory, e.g. compiled-in defaults.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    resources: BTreeMap<String, Arc<[u8]>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: &str, content: impl AsRef<[u8]>) {
        self.resources
            .insert(identifier.to_owned(), Arc::from(content.as_ref()));
    }

    pub fn with(mut self, identifier: &str, content: impl AsRef<[u8]>) -> Self {
        self.insert(identifier, content);
        self
    }
}

impl Storage for MemoryStorage {
    type Source = IoSource<Cursor<Arc<[u8]>>>;

    fn open(&self, identifier: &str) -> io::Result<Self::Source> {
        match self.resources.get(identifier) {
            Some(content) => Ok(IoSource::new(Cursor::new(content.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no resource named {}", identifier),
            )),
        }
    }
}
