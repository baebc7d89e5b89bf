use crate::{ConfigError, Result};

/// Fixed-capacity buffer holding the raw bytes of the setting being parsed.
///
/// The delimiter is kept in the buffer so that the name is
/// `bytes[..value_start - 1]` and the value is `bytes[value_start..]`.
/// One slot of the capacity is held back, so a line may contain at most
/// `capacity - 1` bytes including its delimiter.
#[derive(Debug)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    value_start: Option<usize>,
}

impl LineBuffer {
    /// Allocate room for lines of up to `max_line_length` bytes.
    ///
    /// The whole buffer is reserved up front; nothing is allocated while
    /// parsing.
    pub fn new(max_line_length: usize) -> Result<Self> {
        let capacity = max_line_length
            .checked_add(1)
            .ok_or(ConfigError::AllocationFailed(usize::MAX))?;

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| ConfigError::AllocationFailed(capacity))?;

        Ok(Self {
            bytes,
            capacity,
            value_start: None,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_line_length(&self) -> usize {
        self.capacity.saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.bytes.len() + 1 >= self.capacity
    }

    pub fn is_released(&self) -> bool {
        self.capacity == 0
    }

    /// Forget the current line, keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.value_start = None;
    }

    /// Free the allocation. A released buffer is permanently full.
    pub fn release(&mut self) {
        self.bytes = Vec::new();
        self.capacity = 0;
        self.value_start = None;
    }

    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.is_full() {
            return Err(ConfigError::LineTooLong {
                max_line_length: self.max_line_length(),
            });
        }
        self.bytes.push(byte);
        Ok(())
    }

    /// Record that the value starts after the last pushed byte. Only the
    /// first mark of a line counts.
    pub fn mark_value_start(&mut self) {
        if self.value_start.is_none() {
            self.value_start = Some(self.bytes.len());
        }
    }

    pub fn value_start(&self) -> Option<usize> {
        self.value_start
    }

    /// Everything stored for the current line, delimiter included.
    pub fn raw(&self) -> &[u8] {
        &self.bytes
    }

    /// Name and value of the current line, if it is a complete setting.
    pub fn split(&self) -> Option<(&[u8], &[u8])> {
        match self.value_start {
            Some(start) if start > 1 && start <= self.bytes.len() => {
                Some((&self.bytes[..start - 1], &self.bytes[start..]))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(buffer: &mut LineBuffer, line: &[u8]) -> Result<()> {
        for &byte in line {
            buffer.push(byte)?;
            if byte == b'=' {
                buffer.mark_value_start();
            }
        }
        Ok(())
    }

    #[test]
    fn reserves_room_for_the_sentinel() {
        let buffer = LineBuffer::new(31).unwrap();
        assert_eq!(buffer.capacity(), 32);
        assert_eq!(buffer.max_line_length(), 31);
        assert!(buffer.is_empty());
        assert_eq!(buffer.split(), None);
    }

    #[test]
    fn impossible_capacity_is_an_allocation_failure() {
        assert!(matches!(
            LineBuffer::new(usize::MAX),
            Err(ConfigError::AllocationFailed(_))
        ));
        assert!(matches!(
            LineBuffer::new(usize::MAX - 1),
            Err(ConfigError::AllocationFailed(_))
        ));
    }

    #[test]
    fn splits_at_the_first_delimiter() {
        let mut buffer = LineBuffer::new(16).unwrap();
        fill(&mut buffer, b"name=a=b").unwrap();
        assert_eq!(buffer.value_start(), Some(5));
        assert_eq!(
            buffer.split(),
            Some((b"name".as_slice(), b"a=b".as_slice()))
        );
    }

    #[test]
    fn empty_value_is_present() {
        let mut buffer = LineBuffer::new(16).unwrap();
        fill(&mut buffer, b"k=").unwrap();
        assert_eq!(buffer.split(), Some((b"k".as_slice(), b"".as_slice())));
    }

    #[test]
    fn empty_name_is_not_a_setting() {
        let mut buffer = LineBuffer::new(16).unwrap();
        fill(&mut buffer, b"=value").unwrap();
        assert_eq!(buffer.value_start(), Some(1));
        assert_eq!(buffer.split(), None);
    }

    #[test]
    fn rejects_bytes_beyond_max_line_length() {
        let mut buffer = LineBuffer::new(4).unwrap();
        fill(&mut buffer, b"ab=c").unwrap();
        assert!(buffer.is_full());
        assert!(matches!(
            buffer.push(b'd'),
            Err(ConfigError::LineTooLong { max_line_length: 4 })
        ));
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn clear_keeps_capacity_release_drops_it() {
        let mut buffer = LineBuffer::new(8).unwrap();
        fill(&mut buffer, b"a=1").unwrap();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.value_start(), None);
        assert_eq!(buffer.capacity(), 9);

        buffer.release();
        assert!(buffer.is_released());
        assert!(buffer.is_full());
        assert!(buffer.push(b'a').is_err());
        assert_eq!(buffer.split(), None);
    }
}
