//! High-level error types

use fprust_core::Confirmation;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] fprust_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] fprust_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] fprust_types::Error),

    #[error("Device not connected")]
    NotConnected,

    /// Well-formed acknowledge reporting a device-side failure
    #[error("Device error: {0}")]
    Device(Confirmation),

    /// Reply was well-framed but made no sense for the command sent
    #[error("Invalid response from device: {0}")]
    InvalidResponse(String),

    /// Caller-supplied buffer has the wrong size for the transfer
    #[error("Invalid buffer length: expected {expected} bytes, got {actual}")]
    InvalidBufferLength {
        expected: usize,
        actual: usize,
    },
}
