//! FPM-10 checksum algorithm
//!
//! The module uses a plain arithmetic sum, not a CRC:
//! 1. Sum the identifier byte, both big-endian length bytes, and every
//!    payload byte.
//! 2. Overflowing bits are discarded (truncation mod 2^16).
//!
//! This exact accumulator must be reproduced bit-for-bit to interoperate
//! with the physical device.

use tracing::trace;

/// Calculate the packet checksum
///
/// `length` is the value of the wire length field, i.e. payload length
/// plus 2 for the checksum bytes.
///
/// # Examples
///
/// ```
/// use fprust_core::checksum;
///
/// let sum = checksum::calculate(0x01, 3, &[0x17]);
/// assert_eq!(sum, 0x01 + 0x03 + 0x17);
/// ```
pub fn calculate(identifier: u8, length: u16, payload: &[u8]) -> u16 {
    let [len_hi, len_lo] = length.to_be_bytes();

    let mut sum = identifier as u16;
    sum = sum.wrapping_add(len_hi as u16);
    sum = sum.wrapping_add(len_lo as u16);

    for &byte in payload {
        sum = sum.wrapping_add(byte as u16);
    }

    trace!(
        identifier = identifier,
        length = length,
        payload_len = payload.len(),
        checksum = format!("0x{:04X}", sum),
        "Calculated checksum"
    );

    sum
}

/// Verify a received checksum
pub fn verify(identifier: u8, length: u16, payload: &[u8], expected: u16) -> bool {
    calculate(identifier, length, payload) == expected
}
