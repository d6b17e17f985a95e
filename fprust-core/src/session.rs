//! Session state for one open transport
//!
//! A session tracks:
//! - The device address (broadcast until one is assigned)
//! - Whether destructive commands are allowed
//!
//! The original driver kept these as global mutable flags; here they are an
//! explicit value handed to every packet construction, never ambient state.
//! One session per transport; the caller serializes access.

use bytes::{BufMut, BytesMut};

use crate::{
    command::Command,
    error::{Error, Result},
    packet::{Packet, PacketKind},
    BROADCAST_ADDRESS,
};

/// Per-connection protocol state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    address: u32,
    dangerous_allowed: bool,
}

impl Session {
    /// Create a session addressing the broadcast address
    pub fn new() -> Self {
        Self {
            address: BROADCAST_ADDRESS,
            dangerous_allowed: false,
        }
    }

    /// Create a session bound to a specific device address
    pub fn with_address(address: u32) -> Self {
        Self {
            address,
            dangerous_allowed: false,
        }
    }

    /// Current device address
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Rebind the session after a successful SetAddress exchange
    pub fn set_address(&mut self, address: u32) {
        self.address = address;
    }

    /// Opt in or out of destructive commands (library empty)
    pub fn allow_dangerous(&mut self, allowed: bool) {
        self.dangerous_allowed = allowed;
    }

    /// Check whether destructive commands are currently allowed
    pub fn dangerous_allowed(&self) -> bool {
        self.dangerous_allowed
    }

    /// Build a command packet with payload `[code] + args`
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationDisabled`] for a dangerous command when the
    /// session has not opted in. The refusal happens before any bytes are
    /// produced, so nothing can reach the transport.
    pub fn command_packet(&self, command: Command, args: &[u8]) -> Result<Packet> {
        if command.is_dangerous() && !self.dangerous_allowed {
            return Err(Error::OperationDisabled(command));
        }

        let mut payload = BytesMut::with_capacity(1 + args.len());
        payload.put_u8(command.into());
        payload.put_slice(args);

        Ok(Packet::new(self.address, PacketKind::Command, payload.freeze()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
