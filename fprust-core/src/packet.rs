//! FPM-10 packet structure and encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    error::{Error, Result},
    BROADCAST_ADDRESS, CHUNK_SIZE, FRAME_HEADER_SIZE, FRAME_OVERHEAD, MAGIC,
};

/// One-byte packet identifier
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    /// Instruction from host to module
    Command = 0x01,
    /// Bulk-transfer chunk
    Data = 0x02,
    /// Reply from module, first payload byte is the confirmation code
    Acknowledge = 0x07,
    /// Final chunk of a bulk transfer
    EndOfData = 0x08,
}

impl PacketKind {
    /// Parse the identifier byte of a frame
    pub fn from_raw(raw: u8) -> Result<Self> {
        match raw {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::Data),
            0x07 => Ok(Self::Acknowledge),
            0x08 => Ok(Self::EndOfData),
            other => Err(Error::UnknownIdentifier(other)),
        }
    }
}

impl From<PacketKind> for u8 {
    fn from(kind: PacketKind) -> u8 {
        kind as u8
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Command => "COMMAND",
            Self::Data => "DATA",
            Self::Acknowledge => "ACK",
            Self::EndOfData => "END_OF_DATA",
        };
        write!(f, "{name}(0x{:02X})", *self as u8)
    }
}

/// FPM-10 protocol packet
///
/// # Packet Structure
///
/// ```text
/// ┌──────────┬──────────┬────────────┬──────────┬──────────┬──────────┐
/// │  Magic   │ Address  │ Identifier │  Length  │ Payload  │ Checksum │
/// │ 2 bytes  │ 4 bytes  │   1 byte   │ 2 bytes  │ N bytes  │ 2 bytes  │
/// │ (0xEF01) │ (BE u32) │            │ (BE u16) │          │ (BE u16) │
/// └──────────┴──────────┴────────────┴──────────┴──────────┴──────────┘
/// ```
///
/// All multi-byte values are big-endian. The length field covers the
/// payload plus the two checksum bytes; the checksum is the arithmetic sum
/// of identifier, length bytes and payload, truncated to 16 bits.
///
/// # Examples
///
/// ```
/// use fprust_core::{Packet, PacketKind, BROADCAST_ADDRESS};
///
/// let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]);
/// let encoded = packet.encode();
///
/// let decoded = Packet::decode(encoded).unwrap();
/// assert_eq!(packet, decoded);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    /// Device address (broadcast until one is assigned)
    pub address: u32,

    /// Packet identifier
    pub kind: PacketKind,

    /// Packet payload (command code plus arguments, confirmation code plus
    /// results, or raw chunk bytes)
    pub payload: Bytes,
}

impl Packet {
    /// Maximum payload of a bulk-transfer data packet
    pub const MAX_CHUNK_PAYLOAD: usize = CHUNK_SIZE;

    /// Create a packet
    pub fn new(address: u32, kind: PacketKind, payload: impl Into<Bytes>) -> Self {
        Self {
            address,
            kind,
            payload: payload.into(),
        }
    }

    /// Create an acknowledge packet (used by tests and device stubs)
    pub fn acknowledge(address: u32, confirmation: u8, result: &[u8]) -> Self {
        let mut payload = BytesMut::with_capacity(1 + result.len());
        payload.put_u8(confirmation);
        payload.put_slice(result);
        Self::new(address, PacketKind::Acknowledge, payload.freeze())
    }

    /// Wire value of the length field: payload plus checksum bytes
    pub fn length_field(&self) -> u16 {
        (self.payload.len() + 2) as u16
    }

    /// Calculate the checksum over identifier, length and payload
    pub fn checksum(&self) -> u16 {
        checksum::calculate(self.kind.into(), self.length_field(), &self.payload)
    }

    /// Total encoded size in bytes
    pub fn size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode packet to bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use fprust_core::{Packet, PacketKind, BROADCAST_ADDRESS};
    ///
    /// let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]);
    /// let bytes = packet.encode();
    /// assert_eq!(bytes.len(), 12); // 11 bytes of framing + 1 payload byte
    /// ```
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u16(MAGIC);
        buf.put_u32(self.address);
        buf.put_u8(self.kind.into());
        buf.put_u16(self.length_field());
        buf.put_slice(&self.payload);
        buf.put_u16(self.checksum());

        buf
    }

    /// Decode a packet from a complete frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The frame is shorter than the 11-byte framing overhead
    /// - The magic header is not 0xEF01
    /// - The identifier byte is unknown
    /// - The length field claims more bytes than were received
    /// - Checksum verification fails
    ///
    /// A failed decode never yields a partial packet.
    pub fn decode(mut buf: BytesMut) -> Result<Self> {
        if buf.len() < FRAME_OVERHEAD {
            return Err(Error::PacketTooShort {
                expected: FRAME_OVERHEAD,
                actual: buf.len(),
            });
        }

        let magic = buf.get_u16();
        if magic != MAGIC {
            return Err(Error::BadMagic { found: magic });
        }

        let address = buf.get_u32();
        let kind = PacketKind::from_raw(buf.get_u8())?;

        let length = buf.get_u16();
        if length < 2 {
            return Err(Error::MalformedLength(length));
        }
        let payload_len = (length - 2) as usize;

        // The length field must never claim bytes beyond the frame
        if buf.remaining() < payload_len + 2 {
            return Err(Error::Truncated {
                claimed: payload_len,
                available: buf.remaining().saturating_sub(2),
            });
        }

        let payload = buf.split_to(payload_len).freeze();
        let received = buf.get_u16();

        let packet = Self {
            address,
            kind,
            payload,
        };

        let calculated = packet.checksum();
        if calculated != received {
            return Err(Error::ChecksumMismatch {
                expected: calculated,
                received,
            });
        }

        Ok(packet)
    }

    /// Check whether a raw frame is an acknowledge packet without decoding
    pub fn is_acknowledge(frame: &[u8]) -> bool {
        frame.get(6).copied() == Some(PacketKind::Acknowledge as u8)
    }

    /// Read the confirmation code of a raw acknowledge frame
    ///
    /// The confirmation code sits at fixed offset 9. This skips framing
    /// validation, so it is only suitable for quick status inspection;
    /// anything used for correctness must go through [`Packet::decode`].
    pub fn peek_confirmation(frame: &[u8]) -> Option<u8> {
        if !Self::is_acknowledge(frame) {
            return None;
        }
        frame.get(FRAME_HEADER_SIZE).copied()
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("address", &format!("0x{:08X}", self.address))
            .field("kind", &self.kind)
            .field("checksum", &format!("0x{:04X}", self.checksum()))
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet[{}](addr=0x{:08X}, len={})",
            self.kind,
            self.address,
            self.payload.len()
        )
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new(BROADCAST_ADDRESS, PacketKind::Command, Bytes::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_encode_handshake_frame() {
        let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]);
        let encoded = packet.encode();

        assert_eq!(
            encoded.as_ref(),
            &[
                0xEF, 0x01, // magic
                0xFF, 0xFF, 0xFF, 0xFF, // broadcast address
                0x01, // command identifier
                0x00, 0x03, // length = payload + 2
                0x17, // handshake code
                0x00, 0x1B, // checksum
            ]
        );
    }

    #[test]
    fn test_encode_decode() {
        let original = Packet::new(0x1234_5678, PacketKind::Data, vec![1, 2, 3, 4]);

        let decoded = Packet::decode(original.encode()).unwrap();

        assert_eq!(original, decoded);
        assert_eq!(decoded.address, 0x1234_5678);
        assert_eq!(decoded.kind, PacketKind::Data);
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut encoded = Packet::default().encode();
        encoded[0] = 0xDE;
        encoded[1] = 0xAD;

        let result = Packet::decode(encoded);
        assert!(matches!(result, Err(Error::BadMagic { found: 0xDEAD })));
    }

    #[test]
    fn test_decode_rejects_corrupted_checksum() {
        let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]);
        let mut encoded = packet.encode();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let result = Packet::decode(encoded);
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_decode_rejects_corrupted_payload() {
        let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17, 0x01]);
        let mut encoded = packet.encode();
        encoded[9] ^= 0x40;

        assert!(matches!(
            Packet::decode(encoded),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_length_field_bit_flip() {
        // Length bytes sit at offsets 7 and 8; any single-bit corruption
        // there must fail decoding (as truncation, malformed length, or a
        // checksum mismatch, depending on which way the value moved)
        let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]);

        for idx in 7..=8 {
            for bit in 0..8 {
                let mut encoded = packet.encode();
                encoded[idx] ^= 1 << bit;
                assert!(
                    Packet::decode(encoded).is_err(),
                    "bit {bit} of length byte {idx} went undetected"
                );
            }
        }
    }

    #[test]
    fn test_decode_rejects_truncated_frame() {
        let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Data, vec![0u8; 64]);
        let mut encoded = packet.encode();
        encoded.truncate(encoded.len() - 20);

        assert!(matches!(
            Packet::decode(encoded),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let buf = BytesMut::from(&[0xEF, 0x01, 0xFF][..]);
        assert!(matches!(
            Packet::decode(buf),
            Err(Error::PacketTooShort { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_identifier() {
        let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]);
        let mut encoded = packet.encode();
        encoded[6] = 0x42;

        assert!(matches!(
            Packet::decode(encoded),
            Err(Error::UnknownIdentifier(0x42))
        ));
    }

    #[test]
    fn test_acknowledge_helpers() {
        let ack = Packet::acknowledge(BROADCAST_ADDRESS, 0x00, &[]);
        let frame = ack.encode();

        assert!(Packet::is_acknowledge(&frame));
        assert_eq!(Packet::peek_confirmation(&frame), Some(0x00));

        let cmd = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]).encode();
        assert!(!Packet::is_acknowledge(&cmd));
        assert_eq!(Packet::peek_confirmation(&cmd), None);
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            address in any::<u32>(),
            kind_idx in 0usize..4,
            payload in proptest::collection::vec(any::<u8>(), 0..=128),
        ) {
            let kinds = [
                PacketKind::Command,
                PacketKind::Data,
                PacketKind::Acknowledge,
                PacketKind::EndOfData,
            ];
            let original = Packet::new(address, kinds[kind_idx], payload);
            let decoded = Packet::decode(original.encode()).unwrap();
            prop_assert_eq!(original, decoded);
        }

        #[test]
        fn prop_payload_bit_flip_detected(
            payload in proptest::collection::vec(any::<u8>(), 1..=128),
            byte_idx_seed in any::<usize>(),
            bit in 0u8..8,
        ) {
            let packet = Packet::new(BROADCAST_ADDRESS, PacketKind::Data, payload.clone());
            let mut encoded = packet.encode();

            let idx = FRAME_HEADER_SIZE + byte_idx_seed % payload.len();
            encoded[idx] ^= 1 << bit;

            prop_assert!(Packet::decode(encoded).is_err());
        }
    }
}
