//! The "read next setting" state machine.
//!
//! Bytes are classified one at a time with no lookahead:
//!
//! ```text
//!            ┌── CR LF SP TAB ──┐
//!            ▼                  │
//!  ─────▶ [skip] ───────────────┘
//!          │  │
//!          │  └── '#' ──▶ [comment] ── CR LF ──▶ [skip]
//!          │
//!          └── other ──▶ [copy] ── CR LF / end ──▶ validate
//! ```
//!
//! End of stream while skipping is a clean end of file. End of stream
//! while copying completes the final line, which needs no terminator.

use crate::buffer::LineBuffer;
use crate::storage::ByteSource;
use crate::{ConfigError, Result};

pub const COMMENT: u8 = b'#';
pub const DELIMITER: u8 = b'=';

/// Outcome of one successful scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// A setting is in the buffer. `at_end` is set when the stream ended
    /// right after it.
    Setting { at_end: bool },
    EndOfStream,
}

/// Counts physical lines, treating `\r\n` as one terminator.
#[derive(Debug, Default, Clone, Copy)]
struct LineCounter {
    terminators: usize,
    after_cr: bool,
}

impl LineCounter {
    fn observe(&mut self, byte: u8) {
        match byte {
            b'\n' if self.after_cr => self.after_cr = false,
            b'\n' => self.terminators += 1,
            b'\r' => {
                self.terminators += 1;
                self.after_cr = true;
            }
            _ => self.after_cr = false,
        }
    }

    fn current(&self) -> usize {
        self.terminators + 1
    }
}

#[derive(Debug, Default)]
pub struct Tokenizer {
    lines: LineCounter,
    setting_line: usize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line on which the most recent setting (or failed line) started.
    /// Zero until the first content byte is seen.
    pub fn setting_line(&self) -> usize {
        self.setting_line
    }

    fn read<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Option<u8>> {
        let byte = source.read_byte()?;
        if let Some(byte) = byte {
            self.lines.observe(byte);
        }
        Ok(byte)
    }

    /// Parse the next setting from `source` into `line`.
    ///
    /// A malformed line is reported as an error and leaves the rest of the
    /// line unread; no attempt is made to resynchronise.
    pub fn scan<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
        line: &mut LineBuffer,
    ) -> Result<Scan> {
        line.clear();

        let mut byte = loop {
            let byte = match self.read(source)? {
                Some(byte) => byte,
                None => return Ok(Scan::EndOfStream),
            };
            match byte {
                COMMENT => loop {
                    match self.read(source)? {
                        Some(b'\r' | b'\n') => break,
                        Some(_) => {}
                        None => return Ok(Scan::EndOfStream),
                    }
                },
                b'\r' | b'\n' | b' ' | b'\t' => {}
                _ => break byte,
            }
        };
        self.setting_line = self.lines.current();

        let at_end = loop {
            line.push(byte)?;
            if byte == DELIMITER {
                line.mark_value_start();
            }
            match self.read(source)? {
                Some(b'\r' | b'\n') => break false,
                Some(next) => byte = next,
                None => break true,
            }
        };

        match line.value_start() {
            None => Err(ConfigError::MissingDelimiter),
            Some(1) => Err(ConfigError::EmptyName),
            Some(_) => Ok(Scan::Setting { at_end }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::IoSource;
    use rstest::rstest;
    use std::io::Cursor;

    fn source(text: &str) -> IoSource<Cursor<Vec<u8>>> {
        IoSource::new(Cursor::new(text.as_bytes().to_vec()))
    }

    fn scan_all(text: &str, max_line_length: usize) -> Vec<(String, String)> {
        let mut source = source(text);
        let mut line = LineBuffer::new(max_line_length).unwrap();
        let mut tokenizer = Tokenizer::new();
        let mut settings = vec![];
        loop {
            match tokenizer.scan(&mut source, &mut line).unwrap() {
                Scan::Setting { at_end } => {
                    let (name, value) = line.split().unwrap();
                    settings.push((
                        String::from_utf8(name.to_vec()).unwrap(),
                        String::from_utf8(value.to_vec()).unwrap(),
                    ));
                    if at_end {
                        break;
                    }
                }
                Scan::EndOfStream => break,
            }
        }
        settings
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn comments_blank_lines_and_empty_values() {
        let settings = scan_all(
            "# comment\n\nname1=hello\nname2=\nname3=a=b\n",
            32,
        );
        assert_eq!(
            settings,
            pairs(&[("name1", "hello"), ("name2", ""), ("name3", "a=b")])
        );
    }

    #[rstest]
    #[case("a=1\nb=2\n")]
    #[case("a=1\n\n\n\nb=2\n")]
    #[case("a=1\r\n# one\r\n#two\r\n\r\n  \t\r\nb=2\r\n")]
    #[case("\n\n# leading\n   \ta=1\n#\n#\n\rb=2")]
    #[case("a=1\rb=2\r")]
    fn gaps_between_settings_do_not_matter(#[case] text: &str) {
        assert_eq!(scan_all(text, 16), pairs(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn internal_whitespace_and_mid_line_hash_are_content() {
        let settings = scan_all("ssid = home net # main\n", 64);
        assert_eq!(settings, pairs(&[("ssid ", " home net # main")]));
    }

    #[test]
    fn final_line_without_terminator() {
        let mut source = source("a=1\nlast=yes");
        let mut line = LineBuffer::new(16).unwrap();
        let mut tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.scan(&mut source, &mut line).unwrap(),
            Scan::Setting { at_end: false }
        );
        assert_eq!(
            tokenizer.scan(&mut source, &mut line).unwrap(),
            Scan::Setting { at_end: true }
        );
        assert_eq!(
            line.split(),
            Some((b"last".as_slice(), b"yes".as_slice()))
        );
    }

    #[rstest]
    #[case("")]
    #[case("\n\r\n  \t")]
    #[case("# only a comment")]
    #[case("# comment\n# another\n")]
    fn nothing_but_filler_is_end_of_stream(#[case] text: &str) {
        let mut line = LineBuffer::new(16).unwrap();
        let scan = Tokenizer::new().scan(&mut source(text), &mut line);
        assert_eq!(scan.unwrap(), Scan::EndOfStream);
    }

    #[rstest]
    #[case("key\n")]
    #[case("key")]
    #[case("# fine\nkey value\n")]
    fn line_without_delimiter(#[case] text: &str) {
        let mut line = LineBuffer::new(16).unwrap();
        let scan = Tokenizer::new().scan(&mut source(text), &mut line);
        assert!(matches!(scan, Err(ConfigError::MissingDelimiter)));
    }

    #[rstest]
    #[case("=value\n")]
    #[case("  =\n")]
    fn line_without_name(#[case] text: &str) {
        let mut line = LineBuffer::new(16).unwrap();
        let scan = Tokenizer::new().scan(&mut source(text), &mut line);
        assert!(matches!(scan, Err(ConfigError::EmptyName)));
    }

    #[rstest]
    #[case("abc=efgh\n", 8, true)]
    #[case("abc=efg\n", 8, true)]
    #[case("abc=ef\n", 8, true)]
    #[case("abc=efghi\n", 8, false)]
    #[case("abc=efghijklmnop", 8, false)]
    fn line_length_limit(
        #[case] text: &str,
        #[case] max_line_length: usize,
        #[case] fits: bool,
    ) {
        let mut line = LineBuffer::new(max_line_length).unwrap();
        let scan = Tokenizer::new().scan(&mut source(text), &mut line);
        if fits {
            assert!(matches!(scan, Ok(Scan::Setting { .. })));
        } else {
            assert!(matches!(
                scan,
                Err(ConfigError::LineTooLong { max_line_length: 8 })
            ));
        }
    }

    #[test]
    fn tracks_setting_lines() {
        let mut source = source("# header\r\n\r\nfirst=1\n\n\rsecond=2\nbad\n");
        let mut line = LineBuffer::new(16).unwrap();
        let mut tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.setting_line(), 0);

        tokenizer.scan(&mut source, &mut line).unwrap();
        assert_eq!(tokenizer.setting_line(), 3);
        tokenizer.scan(&mut source, &mut line).unwrap();
        assert_eq!(tokenizer.setting_line(), 6);
        assert!(tokenizer.scan(&mut source, &mut line).is_err());
        assert_eq!(tokenizer.setting_line(), 7);
    }
}
