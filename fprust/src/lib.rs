//! # fprust
//!
//! Rust implementation of the FPM-10 optical fingerprint module serial
//! protocol.
//!
//! ## Features
//!
//! - Type-safe packet codec with bit-exact checksum handling
//! - Async/await API using Tokio over a pluggable byte transport
//! - Closed error taxonomy (configuration, transport, framing, device)
//! - Chunked bulk transfer of raw images and character files
//! - Explicit opt-in gate for destructive commands
//!
//! ## Quick Start
//!
//! ```no_run
//! use fprust::Device;
//!
//! #[tokio::main]
//! async fn main() -> fprust::Result<()> {
//!     // Module on /dev/ttyUSB0 at the factory baud rate
//!     let mut device = Device::open(0, 57600)?;
//!     device.connect().await?;
//!
//!     let params = device.read_system_parameters().await?;
//!     println!("{}", params);
//!
//!     device.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;

// Re-exports
pub use device::Device;
pub use error::{Error, Result};

// Re-export protocol types
pub use fprust_core::{Command, Confirmation, Packet, PacketKind, Session};
pub use fprust_transport::{SerialTransport, Transport};
pub use fprust_types::{CharBuffer, NotepadPage, SearchHit, SystemParameters};
