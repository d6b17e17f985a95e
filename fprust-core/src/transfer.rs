//! Bulk transfer splitting and reassembly
//!
//! Images and character files are streamed as a sequence of data packets of
//! at most 128 payload bytes, terminated by an end-of-data packet. There is
//! no per-chunk acknowledgement; only the triggering command's acknowledge
//! reports the outcome of the whole transfer.

use bytes::{Bytes, BytesMut};
use tracing::warn;

use crate::{
    error::{Error, Result},
    packet::{Packet, PacketKind},
    CHUNK_SIZE,
};

/// Split a buffer into framed data packets for a host-to-module transfer
///
/// All chunks but the last become [`PacketKind::Data`] packets; the final
/// chunk is sent as [`PacketKind::EndOfData`] even when it is a full 128
/// bytes.
///
/// # Errors
///
/// An empty buffer is rejected before any packet is built.
///
/// # Examples
///
/// ```
/// use fprust_core::{split_chunks, PacketKind, BROADCAST_ADDRESS};
///
/// let packets = split_chunks(BROADCAST_ADDRESS, &[0u8; 300]).unwrap();
/// assert_eq!(packets.len(), 3);
/// assert_eq!(packets[0].kind, PacketKind::Data);
/// assert_eq!(packets[2].kind, PacketKind::EndOfData);
/// assert_eq!(packets[2].payload.len(), 44);
/// ```
pub fn split_chunks(address: u32, buf: &[u8]) -> Result<Vec<Packet>> {
    if buf.is_empty() {
        return Err(Error::EmptyTransfer);
    }

    let mut chunks = buf.chunks(CHUNK_SIZE).peekable();
    let mut packets = Vec::with_capacity(buf.len().div_ceil(CHUNK_SIZE));

    while let Some(chunk) = chunks.next() {
        let kind = if chunks.peek().is_some() {
            PacketKind::Data
        } else {
            PacketKind::EndOfData
        };
        packets.push(Packet::new(address, kind, Bytes::copy_from_slice(chunk)));
    }

    Ok(packets)
}

/// Outcome of feeding one packet to a [`Reassembler`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransferState {
    /// More packets expected
    Continue,
    /// Transfer finished
    Complete,
}

/// Accumulates a module-to-host stream of data packets
///
/// The total size is known a priori (image: 73728 bytes, character file:
/// 1536 bytes). The stream normally ends with an end-of-data packet; a
/// stream that reaches the expected byte count without one is treated as
/// complete but flagged, since some firmware revisions omit the terminator.
#[derive(Debug)]
pub struct Reassembler {
    expected: usize,
    buf: BytesMut,
    missing_terminator: bool,
    complete: bool,
}

impl Reassembler {
    /// Create a reassembler for a transfer of known total size
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            buf: BytesMut::with_capacity(expected),
            missing_terminator: false,
            complete: false,
        }
    }

    /// Feed the next received packet
    ///
    /// # Errors
    ///
    /// Rejects packets that are neither data nor end-of-data, and chunks
    /// larger than the fixed chunk size.
    pub fn push(&mut self, packet: &Packet) -> Result<TransferState> {
        match packet.kind {
            PacketKind::Data | PacketKind::EndOfData => {}
            other => return Err(Error::InvalidPacket(other)),
        }
        if packet.payload.len() > CHUNK_SIZE {
            return Err(Error::PayloadTooLarge {
                size: packet.payload.len(),
                max: CHUNK_SIZE,
            });
        }

        self.buf.extend_from_slice(&packet.payload);

        if packet.kind == PacketKind::EndOfData {
            self.complete = true;
            return Ok(TransferState::Complete);
        }

        if self.buf.len() >= self.expected {
            // Firmware is tolerant of a missing terminator; note it and
            // stop rather than blocking on a packet that never comes.
            warn!(
                expected = self.expected,
                received = self.buf.len(),
                "bulk transfer reached expected size without end-of-data packet"
            );
            self.missing_terminator = true;
            self.complete = true;
            return Ok(TransferState::Complete);
        }

        Ok(TransferState::Continue)
    }

    /// Bytes accumulated so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether nothing has been received yet
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the stream completed without an end-of-data packet
    pub fn missing_terminator(&self) -> bool {
        self.missing_terminator
    }

    /// Take the reassembled buffer once the transfer is complete
    ///
    /// # Errors
    ///
    /// Returns an error if no [`TransferState::Complete`] has been reached,
    /// so a partial buffer can never be mistaken for the whole stream.
    pub fn finish(self) -> Result<Bytes> {
        if !self.complete {
            return Err(Error::IncompleteTransfer {
                received: self.buf.len(),
                expected: self.expected,
            });
        }
        Ok(self.buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::IMAGE_SIZE;
    use crate::BROADCAST_ADDRESS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_rejects_empty_buffer() {
        assert!(matches!(
            split_chunks(BROADCAST_ADDRESS, &[]),
            Err(Error::EmptyTransfer)
        ));
    }

    #[test]
    fn test_split_single_short_chunk() {
        let packets = split_chunks(BROADCAST_ADDRESS, &[1, 2, 3]).unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].kind, PacketKind::EndOfData);
        assert_eq!(packets[0].payload.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_split_exact_multiple_ends_with_full_end_packet() {
        let buf = vec![0xAA; CHUNK_SIZE * 2];
        let packets = split_chunks(BROADCAST_ADDRESS, &buf).unwrap();

        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].kind, PacketKind::Data);
        assert_eq!(packets[1].kind, PacketKind::EndOfData);
        assert_eq!(packets[1].payload.len(), CHUNK_SIZE);
    }

    #[test]
    fn test_image_chunks_exactly_576_packets() {
        let image: Vec<u8> = (0..IMAGE_SIZE).map(|i| (i % 251) as u8).collect();
        let packets = split_chunks(BROADCAST_ADDRESS, &image).unwrap();

        assert_eq!(packets.len(), 576);
        assert!(packets[..575].iter().all(|p| p.kind == PacketKind::Data));
        assert_eq!(packets[575].kind, PacketKind::EndOfData);

        // Reassembling in order reproduces the image exactly
        let mut reassembler = Reassembler::new(IMAGE_SIZE);
        for packet in &packets[..575] {
            assert_eq!(reassembler.push(packet).unwrap(), TransferState::Continue);
        }
        assert_eq!(
            reassembler.push(&packets[575]).unwrap(),
            TransferState::Complete
        );
        assert!(!reassembler.missing_terminator());
        assert_eq!(reassembler.finish().unwrap().as_ref(), image.as_slice());
    }

    #[test]
    fn test_reassembler_end_packet_trailing_payload() {
        let mut reassembler = Reassembler::new(200);

        let data = Packet::new(BROADCAST_ADDRESS, PacketKind::Data, vec![1u8; 128]);
        let end = Packet::new(BROADCAST_ADDRESS, PacketKind::EndOfData, vec![2u8; 72]);

        assert_eq!(reassembler.push(&data).unwrap(), TransferState::Continue);
        assert_eq!(reassembler.push(&end).unwrap(), TransferState::Complete);

        let buf = reassembler.finish().unwrap();
        assert_eq!(buf.len(), 200);
        assert_eq!(&buf[128..], &[2u8; 72][..]);
    }

    #[test]
    fn test_reassembler_tolerates_missing_terminator() {
        let mut reassembler = Reassembler::new(256);

        let data = Packet::new(BROADCAST_ADDRESS, PacketKind::Data, vec![0u8; 128]);
        assert_eq!(reassembler.push(&data).unwrap(), TransferState::Continue);
        assert_eq!(reassembler.push(&data).unwrap(), TransferState::Complete);

        assert!(reassembler.missing_terminator());
        assert_eq!(reassembler.finish().unwrap().len(), 256);
    }

    #[test]
    fn test_reassembler_rejects_finish_before_complete() {
        let mut reassembler = Reassembler::new(256);
        let data = Packet::new(BROADCAST_ADDRESS, PacketKind::Data, vec![0u8; 128]);
        assert_eq!(reassembler.push(&data).unwrap(), TransferState::Continue);

        assert!(matches!(
            reassembler.finish(),
            Err(Error::IncompleteTransfer {
                received: 128,
                expected: 256
            })
        ));
    }

    #[test]
    fn test_reassembler_rejects_command_packet() {
        let mut reassembler = Reassembler::new(128);
        let cmd = Packet::new(BROADCAST_ADDRESS, PacketKind::Command, vec![0x17]);

        assert!(matches!(
            reassembler.push(&cmd),
            Err(Error::InvalidPacket(PacketKind::Command))
        ));
    }

    #[test]
    fn test_reassembler_rejects_oversized_chunk() {
        let mut reassembler = Reassembler::new(1024);
        let oversized = Packet::new(BROADCAST_ADDRESS, PacketKind::Data, vec![0u8; 129]);

        assert!(matches!(
            reassembler.push(&oversized),
            Err(Error::PayloadTooLarge { size: 129, .. })
        ));
    }
}
