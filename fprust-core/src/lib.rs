//! # fprust-core
//!
//! Core protocol implementation for FPM-10 class optical fingerprint modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Packet structure and encoding/decoding
//! - Checksum calculation
//! - Command and confirmation code definitions
//! - Session state (device address, dangerous-operation gate)
//! - Bulk transfer splitting and reassembly

pub mod checksum;
pub mod command;
pub mod confirmation;
pub mod constants;
pub mod error;
pub mod packet;
pub mod session;
pub mod transfer;

pub use command::Command;
pub use confirmation::Confirmation;
pub use error::{Error, Result};
pub use packet::{Packet, PacketKind};
pub use session::Session;
pub use transfer::{split_chunks, Reassembler, TransferState};

/// Fixed frame header preceding every packet
pub const MAGIC: u16 = 0xEF01;

/// Broadcast device address (factory default)
pub const BROADCAST_ADDRESS: u32 = 0xFFFF_FFFF;

/// Bytes before the payload: magic(2) + address(4) + identifier(1) + length(2)
pub const FRAME_HEADER_SIZE: usize = 9;

/// Framing overhead of a zero-payload packet (header plus checksum)
pub const FRAME_OVERHEAD: usize = FRAME_HEADER_SIZE + 2;

/// Fixed chunk size of a bulk-transfer data packet
pub const CHUNK_SIZE: usize = 128;
