//! System parameter record
//!
//! ReadSysPara returns a fixed 16-byte record describing the module's
//! current configuration. All fields are big-endian.

use std::fmt;

use bitflags::bitflags;
use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

bitflags! {
    /// Module status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusRegister: u16 {
        /// System is executing a command
        const BUSY = 1 << 0;
        /// A matching finger was found
        const FINGER_MATCHED = 1 << 1;
        /// Handshake password has been verified
        const PASSWORD_VERIFIED = 1 << 2;
        /// Image buffer holds a valid image
        const IMAGE_VALID = 1 << 3;
    }
}

/// Data packet size negotiated with the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PacketSizeCode {
    Bytes32 = 0,
    Bytes64 = 1,
    Bytes128 = 2,
    Bytes256 = 3,
}

impl PacketSizeCode {
    /// Chunk length in bytes
    pub fn chunk_len(self) -> usize {
        32 << (self as u16)
    }
}

impl TryFrom<u16> for PacketSizeCode {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Self::Bytes32),
            1 => Ok(Self::Bytes64),
            2 => Ok(Self::Bytes128),
            3 => Ok(Self::Bytes256),
            other => Err(Error::UnknownPacketSizeCode(other)),
        }
    }
}

/// Decoded ReadSysPara record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemParameters {
    /// Status register contents
    pub status: StatusRegister,

    /// System identifier code
    pub system_id: u16,

    /// Fingerprint library capacity
    pub library_size: u16,

    /// Matching security level (1..=5)
    pub security_level: u16,

    /// Configured device address
    pub device_address: u32,

    /// Negotiated data packet size
    pub packet_size: PacketSizeCode,

    /// Baud rate as a multiple of 9600
    pub baud_multiplier: u16,
}

impl SystemParameters {
    /// Record size on the wire
    pub const RECORD_SIZE: usize = 16;

    /// Effective serial baud rate
    pub fn baud(&self) -> u32 {
        self.baud_multiplier as u32 * 9600
    }
}

impl TryFrom<&[u8]> for SystemParameters {
    type Error = Error;

    fn try_from(record: &[u8]) -> Result<Self> {
        if record.len() != Self::RECORD_SIZE {
            return Err(Error::InvalidRecordLength {
                expected: Self::RECORD_SIZE,
                actual: record.len(),
            });
        }

        Ok(Self {
            status: StatusRegister::from_bits_retain(BigEndian::read_u16(&record[0..2])),
            system_id: BigEndian::read_u16(&record[2..4]),
            library_size: BigEndian::read_u16(&record[4..6]),
            security_level: BigEndian::read_u16(&record[6..8]),
            device_address: BigEndian::read_u32(&record[8..12]),
            packet_size: PacketSizeCode::try_from(BigEndian::read_u16(&record[12..14]))?,
            baud_multiplier: BigEndian::read_u16(&record[14..16]),
        })
    }
}

impl fmt::Display for SystemParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SysPara[id=0x{:04X}, library={}, security={}, addr=0x{:08X}, chunk={}B, baud={}]",
            self.system_id,
            self.library_size,
            self.security_level,
            self.device_address,
            self.packet_size.chunk_len(),
            self.baud()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record() -> [u8; 16] {
        [
            0x00, 0x04, // status: password verified
            0x00, 0x09, // system id
            0x00, 0x96, // library size 150
            0x00, 0x03, // security level
            0xFF, 0xFF, 0xFF, 0xFF, // broadcast address
            0x00, 0x02, // packet size code: 128 bytes
            0x00, 0x06, // baud multiplier: 57600
        ]
    }

    #[test]
    fn test_decode_record() {
        let params = SystemParameters::try_from(&sample_record()[..]).unwrap();

        assert_eq!(params.status, StatusRegister::PASSWORD_VERIFIED);
        assert_eq!(params.system_id, 0x0009);
        assert_eq!(params.library_size, 150);
        assert_eq!(params.security_level, 3);
        assert_eq!(params.device_address, 0xFFFF_FFFF);
        assert_eq!(params.packet_size, PacketSizeCode::Bytes128);
        assert_eq!(params.baud(), 57600);
    }

    #[test]
    fn test_decode_rejects_short_record() {
        let result = SystemParameters::try_from(&sample_record()[..12]);
        assert!(matches!(
            result,
            Err(Error::InvalidRecordLength {
                expected: 16,
                actual: 12
            })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_packet_size_code() {
        let mut record = sample_record();
        record[13] = 0x07;

        assert!(matches!(
            SystemParameters::try_from(&record[..]),
            Err(Error::UnknownPacketSizeCode(7))
        ));
    }

    #[test]
    fn test_packet_size_chunk_lengths() {
        assert_eq!(PacketSizeCode::Bytes32.chunk_len(), 32);
        assert_eq!(PacketSizeCode::Bytes64.chunk_len(), 64);
        assert_eq!(PacketSizeCode::Bytes128.chunk_len(), 128);
        assert_eq!(PacketSizeCode::Bytes256.chunk_len(), 256);
    }
}
