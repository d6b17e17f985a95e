//! Type decoding errors

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Response payload has the wrong size for the record being decoded
    #[error("Invalid record length: expected {expected} bytes, got {actual}")]
    InvalidRecordLength {
        expected: usize,
        actual: usize,
    },

    /// Character buffer id is not 1 or 2
    #[error("Illegal character buffer: {0} (valid: 1 or 2)")]
    IllegalCharBuffer(u8),

    /// Notepad page number out of the 16-page range
    #[error("Illegal notepad page: {0} (valid: 0..=15)")]
    IllegalNotepadPage(u8),

    /// Packet size code outside the documented 0..=3 range
    #[error("Unknown packet size code: {0}")]
    UnknownPacketSizeCode(u16),
}
