//! Byte-transport capability for the FPM-10 protocol engine
//!
//! The protocol engine never touches the serial line directly; it consumes
//! this trait. One transport handle per session, strictly sequential
//! request/response.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::SerialTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Baud rates the module can be configured for
pub const BAUD_RATES: [u32; 5] = [9600, 19200, 38400, 57600, 115200];

/// Factory default baud rate
pub const DEFAULT_BAUD: u32 = 57600;

/// Byte transport with bounded-timeout exact reads
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the line
    async fn connect(&mut self) -> Result<()>;

    /// Close the line
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Write a complete frame
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read exactly `len` bytes, blocking at most `timeout`
    ///
    /// A short first read is completed by at most one supplementary
    /// blocking read before failure is declared.
    async fn receive_exact(&mut self, len: usize, timeout: Duration) -> Result<BytesMut>;

    /// Human-readable description of the endpoint
    fn descriptor(&self) -> String;
}

/// Validate a requested baud rate
pub fn validate_baud(baud: u32) -> Result<()> {
    if BAUD_RATES.contains(&baud) {
        Ok(())
    } else {
        Err(Error::IllegalBaudRate(baud))
    }
}
