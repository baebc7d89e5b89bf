use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::{IoSource, Storage, DEFAULT_READ_AHEAD};

const LOG_PREFIX: &str = "[file-storage]";

/// Opens resources as files below a root directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
    read_ahead: usize,
}

impl FileStorage {
    pub fn new(root: &Path) -> Self {
        Self {
            root: PathBuf::from(root),
            read_ahead: DEFAULT_READ_AHEAD,
        }
    }

    /// Size of the read-ahead buffer given to every opened source
    pub fn with_read_ahead(mut self, read_ahead: usize) -> Self {
        self.read_ahead = read_ahead;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an identifier against the root, refusing anything that
    /// could escape it
    fn resolve(&self, identifier: &str) -> io::Result<PathBuf> {
        let relative = Path::new(identifier);
        let escapes = relative.components().any(|c| {
            !matches!(c, Component::Normal(_) | Component::CurDir)
        });
        if identifier.is_empty() || escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("`{}` is not a path below the storage root", identifier),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl Storage for FileStorage {
    type Source = IoSource<File>;

    fn open(&self, identifier: &str) -> io::Result<Self::Source> {
        let path = self.resolve(identifier)?;
        log::debug!("{} opening {}", LOG_PREFIX, path.display());

        let file = File::open(&path)?;
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }
        Ok(IoSource::with_capacity(self.read_ahead, file))
    }
}
