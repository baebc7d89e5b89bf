use crate::buffer::LineBuffer;
use crate::storage::{ByteSource, Storage};
use crate::tokenizer::{Scan, Tokenizer};
use crate::value::{OwnedSetting, Setting};
use crate::{ConfigError, Result, StopReason};

const LOG_PREFIX: &str = "[settings-reader]";
const UNNAMED_SOURCE: &str = "<source>";

/// Reads `name=value` settings one at a time from a byte source, holding
/// at most one line in memory.
///
/// ```
/// use settings_reader::{MemoryStorage, Reader};
///
/// let storage = MemoryStorage::new().with("net.cfg", "# network\nport=8080\n");
/// let mut reader = Reader::open(&storage, "net.cfg", 32).unwrap();
/// while reader.next_setting() {
///     if reader.name_is("port") {
///         assert_eq!(reader.int_value(), 8080);
///     }
/// }
/// reader.close();
/// ```
pub struct Reader<S: ByteSource> {
    label: String,
    source: Option<S>,
    line: LineBuffer,
    tokenizer: Tokenizer,
    stop: Option<StopReason>,
}

impl<S: ByteSource> Reader<S> {
    /// Allocate a buffer for lines of up to `max_line_length` bytes and
    /// open `resource` in `storage`.
    pub fn open<T>(
        storage: &T,
        resource: &str,
        max_line_length: usize,
    ) -> Result<Self>
    where
        T: Storage<Source = S> + ?Sized,
    {
        let line = LineBuffer::new(max_line_length).map_err(|e| {
            log::warn!("{} {}", LOG_PREFIX, e);
            e
        })?;

        let source = storage.open(resource).map_err(|source| {
            log::warn!(
                "{} Could not open {}: {}",
                LOG_PREFIX,
                resource,
                source
            );
            ConfigError::ResourceOpenFailed {
                resource: resource.to_owned(),
                source,
            }
        })?;

        Ok(Self::bind(resource.to_owned(), source, line))
    }

    /// Read from an already opened source.
    pub fn from_source(source: S, max_line_length: usize) -> Result<Self> {
        let line = LineBuffer::new(max_line_length)?;
        Ok(Self::bind(UNNAMED_SOURCE.to_owned(), source, line))
    }

    fn bind(label: String, source: S, line: LineBuffer) -> Self {
        log::debug!(
            "{} reading {} with lines of up to {} bytes",
            LOG_PREFIX,
            label,
            line.max_line_length()
        );
        Self {
            label,
            source: Some(source),
            line,
            tokenizer: Tokenizer::new(),
            stop: None,
        }
    }

    /// Advance to the next setting.
    ///
    /// Returns `false` at the end of the stream and on malformed input
    /// alike; [`stop_reason`](Self::stop_reason) tells them apart. Once
    /// `false` has been returned the reader never reads again.
    pub fn next_setting(&mut self) -> bool {
        self.try_next_setting().unwrap_or(false)
    }

    /// Like [`next_setting`](Self::next_setting), but malformed input is
    /// an error. The error is reported by the call that hits it; later
    /// calls return `Ok(false)`.
    pub fn try_next_setting(&mut self) -> Result<bool> {
        let source = match (self.stop, self.source.as_mut()) {
            (None, Some(source)) => source,
            _ => {
                self.line.clear();
                return Ok(false);
            }
        };

        match self.tokenizer.scan(source, &mut self.line) {
            Ok(Scan::Setting { at_end }) => {
                log::trace!(
                    "{} {}:{} {}",
                    LOG_PREFIX,
                    self.label,
                    self.tokenizer.setting_line(),
                    String::from_utf8_lossy(self.line.raw())
                );
                if at_end {
                    self.stop = Some(StopReason::EndOfStream);
                }
                Ok(true)
            }
            Ok(Scan::EndOfStream) => {
                log::debug!("{} end of {}", LOG_PREFIX, self.label);
                self.stop = Some(StopReason::EndOfStream);
                Ok(false)
            }
            Err(e) => {
                log::warn!(
                    "{} {}:{} {}: {}",
                    LOG_PREFIX,
                    self.label,
                    self.tokenizer.setting_line(),
                    e,
                    String::from_utf8_lossy(self.line.raw())
                );
                self.stop = Some(StopReason::from(&e));
                self.line.clear();
                Err(e)
            }
        }
    }

    /// Drain the remaining settings as owned values.
    pub fn owned_settings(&mut self) -> OwnedSettings<'_, S> {
        OwnedSettings { reader: self }
    }

    /// The current setting, if the last call produced one.
    pub fn setting(&self) -> Option<Setting<'_>> {
        self.line
            .split()
            .map(|(name, value)| Setting::new(name, value))
    }

    pub fn name_is(&self, candidate: &str) -> bool {
        self.setting()
            .map_or(false, |setting| setting.name_is(candidate))
    }

    pub fn name(&self) -> Option<&[u8]> {
        self.setting().map(|setting| setting.name())
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.setting().map(|setting| setting.value())
    }

    pub fn copy_value(&self) -> Option<Vec<u8>> {
        self.setting()?.copy_value()
    }

    /// Best-effort integer value, 0 when there is no current setting.
    /// See [`parse_int`](crate::value::parse_int).
    pub fn int_value(&self) -> i32 {
        self.setting().map_or(0, |setting| setting.int_value())
    }

    pub fn bool_value(&self) -> bool {
        self.setting().map_or(false, |setting| setting.bool_value())
    }

    pub fn is_exhausted(&self) -> bool {
        self.stop.is_some()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Physical line of the current setting, or of the line that failed.
    pub fn line_number(&self) -> usize {
        self.tokenizer.setting_line()
    }

    pub fn max_line_length(&self) -> usize {
        self.line.max_line_length()
    }

    /// Release the buffer and close the source. Calling it again does
    /// nothing. A reader that was not exhausted before reports
    /// [`StopReason::Closed`] afterwards.
    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
            log::debug!("{} closed {}", LOG_PREFIX, self.label);
        }
        self.line.release();
        if self.stop.is_none() {
            self.stop = Some(StopReason::Closed);
        }
    }
}

impl<S: ByteSource> Drop for Reader<S> {
    fn drop(&mut self) {
        self.close();
    }
}

pub struct OwnedSettings<'r, S: ByteSource> {
    reader: &'r mut Reader<S>,
}

impl<S: ByteSource> Iterator for OwnedSettings<'_, S> {
    type Item = Result<OwnedSetting>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.try_next_setting() {
            Ok(true) => self.reader.setting().map(Setting::into_owned),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
