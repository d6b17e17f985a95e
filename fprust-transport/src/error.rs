//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Port index outside the supported range
    #[error("Illegal port index: {0} (valid: 0..=3)")]
    IllegalPort(u8),

    /// Baud rate the module does not speak
    #[error("Illegal baud rate: {0} (valid: 9600, 19200, 38400, 57600, 115200)")]
    IllegalBaudRate(u32),

    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    /// Serial line could not be opened
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        source: tokio_serial::Error,
    },

    /// No reply within the bounded wait
    #[error("Read timeout after {0:?}")]
    ReadTimeout(std::time::Duration),

    /// Line delivered fewer bytes than expected, even after the one
    /// supplementary read
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        expected: usize,
        actual: usize,
    },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
