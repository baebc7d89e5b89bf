use std::fmt::Display;
use std::str::{self, FromStr};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

const TRUE_LITERAL: &[u8] = b"true";

/// A name/value pair borrowed from a [`Reader`](crate::Reader).
///
/// The borrow ends before the reader can advance or close, so a `Setting`
/// never outlives the line it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting<'a> {
    name: &'a [u8],
    value: &'a [u8],
}

impl<'a> Setting<'a> {
    pub(crate) fn new(name: &'a [u8], value: &'a [u8]) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    pub fn name_is(&self, candidate: &str) -> bool {
        self.name == candidate.as_bytes()
    }

    pub fn name_str(&self) -> Result<&'a str> {
        Ok(str::from_utf8(self.name)?)
    }

    pub fn value_str(&self) -> Result<&'a str> {
        Ok(str::from_utf8(self.value)?)
    }

    /// Best-effort integer, see [`parse_int`].
    pub fn int_value(&self) -> i32 {
        parse_int(self.value)
    }

    /// `true` only for the exact value `true`.
    pub fn bool_value(&self) -> bool {
        parse_bool(self.value)
    }

    /// Strict conversion of the whole value.
    pub fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.value_str()?;
        value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: String::from_utf8_lossy(self.name).into_owned(),
            source: anyhow::anyhow!("`{}`: {}", value, e),
        })
    }

    /// Copy the value out of the reader's buffer. `None` if the memory
    /// cannot be allocated.
    pub fn copy_value(&self) -> Option<Vec<u8>> {
        let mut copy = Vec::new();
        copy.try_reserve_exact(self.value.len()).ok()?;
        copy.extend_from_slice(self.value);
        Some(copy)
    }

    pub fn into_owned(self) -> Result<OwnedSetting> {
        Ok(OwnedSetting {
            name: self.name_str()?.to_owned(),
            value: self.value_str()?.to_owned(),
        })
    }
}

/// A setting detached from the reader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnedSetting {
    pub name: String,
    pub value: String,
}

/// Parse like C's `atoi`: skip leading ASCII whitespace, accept one
/// optional sign, then read decimal digits up to the first non-digit.
///
/// This is deliberately lenient. Input without a numeric prefix gives 0,
/// trailing garbage is ignored and out-of-range numbers saturate.
pub fn parse_int(bytes: &[u8]) -> i32 {
    let mut rest = bytes;
    while let [b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c, tail @ ..] = rest {
        rest = tail;
    }

    let negative = match rest {
        [b'-', tail @ ..] => {
            rest = tail;
            true
        }
        [b'+', tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };

    let mut result: i32 = 0;
    for &byte in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i32::from(byte - b'0');
        result = if negative {
            result.saturating_mul(10).saturating_sub(digit)
        } else {
            result.saturating_mul(10).saturating_add(digit)
        };
    }
    result
}

pub fn parse_bool(bytes: &[u8]) -> bool {
    bytes == TRUE_LITERAL
}
