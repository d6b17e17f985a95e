//! Serial transport

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, trace, warn};

use crate::{error::*, validate_baud, Transport};

/// Highest /dev/ttyUSB index the module is expected on
const MAX_PORT_INDEX: u8 = 3;

/// Serial transport for FPM-10 modules
///
/// 8 data bits, no parity, one stop bit, no flow control. The line is
/// opened lazily by [`Transport::connect`]; configuration errors (bad port
/// index, bad baud rate) are reported at construction, before anything is
/// touched.
pub struct SerialTransport {
    path: String,
    baud: u32,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Create a transport for port index 0..=3 (mapped to /dev/ttyUSB{n})
    pub fn new(port_index: u8, baud: u32) -> Result<Self> {
        if port_index > MAX_PORT_INDEX {
            return Err(Error::IllegalPort(port_index));
        }
        Self::from_path(format!("/dev/ttyUSB{port_index}"), baud)
    }

    /// Create a transport for an explicit device path
    pub fn from_path(path: impl Into<String>, baud: u32) -> Result<Self> {
        validate_baud(baud)?;
        Ok(Self {
            path: path.into(),
            baud,
            stream: None,
        })
    }

    /// Configured baud rate
    pub fn baud(&self) -> u32 {
        self.baud
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        debug!("Opening {} at {} baud...", self.path, self.baud);

        let stream = tokio_serial::new(self.path.as_str(), self.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()
            .map_err(|source| Error::Open {
                path: self.path.clone(),
                source,
            })?;

        debug!("Opened {}", self.path);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Closing {}...", self.path);
            let _ = stream.shutdown().await;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {}", data.len(), hex::encode(data));

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn receive_exact(&mut self, len: usize, wait: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::zeroed(len);
        let mut filled = 0;

        // At most two reads: the first may come up short when the module
        // is still clocking bytes out, one supplementary read completes it.
        for attempt in 0..2 {
            let n = timeout(wait, stream.read(&mut buf[filled..]))
                .await
                .map_err(|_| Error::ReadTimeout(wait))??;

            if n == 0 {
                return Err(Error::ConnectionClosed);
            }

            filled += n;
            if filled == len {
                break;
            }

            if attempt == 0 {
                warn!(
                    expected = len,
                    got = filled,
                    "short read, retrying once"
                );
            }
        }

        if filled < len {
            return Err(Error::ShortRead {
                expected: len,
                actual: filled,
            });
        }

        trace!("Received {} bytes: {}", len, hex::encode(&buf[..]));

        Ok(buf)
    }

    fn descriptor(&self) -> String {
        format!("{}@{}", self.path, self.baud)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("Serial transport dropped while still open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_transport_create() {
        let transport = SerialTransport::new(0, 57600).unwrap();
        assert!(!transport.is_connected());
        assert_eq!(transport.descriptor(), "/dev/ttyUSB0@57600");
    }

    #[test]
    fn test_serial_transport_illegal_port() {
        assert!(matches!(
            SerialTransport::new(4, 57600),
            Err(Error::IllegalPort(4))
        ));
    }

    #[test]
    fn test_serial_transport_illegal_baud() {
        assert!(matches!(
            SerialTransport::new(0, 12345),
            Err(Error::IllegalBaudRate(12345))
        ));
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let mut transport = SerialTransport::from_path("/dev/null", 9600).unwrap();
        let result = transport.send(&[0xEF, 0x01]).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    // Note: connect/receive tests require a real module on the line
    // #[tokio::test]
    // async fn test_serial_transport_connect() {
    //     let mut transport = SerialTransport::new(0, 57600).unwrap();
    //     transport.connect().await.unwrap();
    //     assert!(transport.is_connected());
    //     transport.disconnect().await.unwrap();
    // }
}
