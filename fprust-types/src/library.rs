//! Library and buffer addressing types

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// One of the module's two character buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CharBuffer {
    One = 1,
    Two = 2,
}

impl CharBuffer {
    /// Wire value of the buffer id
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CharBuffer {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(Error::IllegalCharBuffer(other)),
        }
    }
}

impl fmt::Display for CharBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharBuffer{}", self.id())
    }
}

/// Validated notepad page number (16 pages of 32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotepadPage(u8);

impl NotepadPage {
    /// Number of pages on the module
    pub const COUNT: u8 = 16;

    /// Bytes per page
    pub const SIZE: usize = 32;

    /// Validate a page number
    pub fn new(page: u8) -> Result<Self> {
        if page >= Self::COUNT {
            return Err(Error::IllegalNotepadPage(page));
        }
        Ok(Self(page))
    }

    /// Wire value of the page number
    pub fn number(self) -> u8 {
        self.0
    }
}

/// Result of a library search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Library page of the matching template
    pub page_id: u16,

    /// Matching score
    pub score: u16,
}

impl SearchHit {
    /// Decode the 4-byte search result payload
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        if payload.len() != 4 {
            return Err(Error::InvalidRecordLength {
                expected: 4,
                actual: payload.len(),
            });
        }
        Ok(Self {
            page_id: BigEndian::read_u16(&payload[0..2]),
            score: BigEndian::read_u16(&payload[2..4]),
        })
    }
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} (score {})", self.page_id, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_char_buffer_ids() {
        assert_eq!(CharBuffer::One.id(), 1);
        assert_eq!(CharBuffer::Two.id(), 2);
        assert_eq!(CharBuffer::try_from(2).unwrap(), CharBuffer::Two);
    }

    #[test]
    fn test_char_buffer_rejects_out_of_range() {
        assert!(matches!(
            CharBuffer::try_from(3),
            Err(Error::IllegalCharBuffer(3))
        ));
    }

    #[test]
    fn test_notepad_page_bounds() {
        assert_eq!(NotepadPage::new(0).unwrap().number(), 0);
        assert_eq!(NotepadPage::new(15).unwrap().number(), 15);
        assert!(matches!(
            NotepadPage::new(16),
            Err(Error::IllegalNotepadPage(16))
        ));
    }

    #[test]
    fn test_search_hit_decode() {
        let hit = SearchHit::from_payload(&[0x00, 0x2A, 0x01, 0x10]).unwrap();
        assert_eq!(hit.page_id, 42);
        assert_eq!(hit.score, 272);
    }

    #[test]
    fn test_search_hit_rejects_short_payload() {
        assert!(SearchHit::from_payload(&[0x00, 0x2A]).is_err());
    }
}
