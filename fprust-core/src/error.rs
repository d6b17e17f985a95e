//! Error types for fprust-core

use crate::command::Command;

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame does not start with the fixed 0xEF01 header
    #[error("Bad frame header: expected 0xEF01, found 0x{found:04X}")]
    BadMagic {
        found: u16,
    },

    /// Frame is too short to be valid
    #[error("Packet too short: expected at least {expected} bytes, got {actual} bytes")]
    PacketTooShort {
        expected: usize,
        actual: usize,
    },

    /// Length field claims more payload bytes than were received
    #[error("Truncated packet: length field claims {claimed} payload bytes, only {available} available")]
    Truncated {
        claimed: usize,
        available: usize,
    },

    /// Length field is below the checksum contribution
    #[error("Malformed length field: {0} (minimum is 2)")]
    MalformedLength(u16),

    /// Identifier byte is not a known packet kind
    #[error("Unknown packet identifier: 0x{0:02X}")]
    UnknownIdentifier(u8),

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// A reply that should be an acknowledge packet was something else
    #[error("Invalid packet: expected acknowledge, got {0}")]
    InvalidPacket(crate::packet::PacketKind),

    /// Payload exceeds the fixed data-chunk size
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Destructive command attempted without the dangerous-operations flag
    #[error("Operation disabled: {0} requires dangerous operations to be enabled")]
    OperationDisabled(Command),

    /// Bulk transfer invoked with nothing to send
    #[error("Empty bulk transfer: buffer must contain at least one byte")]
    EmptyTransfer,

    /// Bulk transfer buffer taken before the stream finished
    #[error("Incomplete bulk transfer: received {received} of {expected} bytes")]
    IncompleteTransfer {
        received: usize,
        expected: usize,
    },
}
