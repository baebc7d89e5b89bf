//! Streaming reader for `name=value` configuration files.
//!
//! Settings are parsed one byte at a time from a [`ByteSource`] into a
//! fixed-size line buffer, so memory use is bounded by the longest line
//! the caller allows rather than by the size of the file.
//!
//! ```text
//! # comments start with '#' as the first non-blank character
//! ssid=home network
//! retries=3
//! verbose=true
//! empty=
//! ```
//!
//! Blank lines and comment lines are skipped, lines end with `\r`, `\n` or
//! `\r\n`, and the first `=` separates name from value. A line without
//! `=`, with an empty name, or longer than the buffer ends the whole
//! stream.

pub mod buffer;
mod errors;
mod reader;
pub mod storage;
pub mod tokenizer;
pub mod value;

pub use errors::{ConfigError, Result, StopReason};
pub use reader::{OwnedSettings, Reader};
pub use storage::{
    ByteSource, FileStorage, IoSource, MemoryStorage, Storage,
    DEFAULT_READ_AHEAD,
};
pub use value::{OwnedSetting, Setting};

#[cfg(test)]
pub(crate) fn initialize() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Trace)
            .try_init();
    });
}
