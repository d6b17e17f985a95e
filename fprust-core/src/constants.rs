//! Protocol constants

/// Image dimensions streamed by UpImage/DownImage
pub const IMAGE_WIDTH: usize = 256;
pub const IMAGE_HEIGHT: usize = 288;

/// Total byte count of a raw fingerprint image
pub const IMAGE_SIZE: usize = IMAGE_WIDTH * IMAGE_HEIGHT;

/// A character file occupies this many 128-byte data chunks
pub const TEMPLATE_BLOCKS: usize = 12;

/// Total byte count of a character file transferred by UpChar/DownChar
pub const TEMPLATE_SIZE: usize = TEMPLATE_BLOCKS * crate::CHUNK_SIZE;

/// Library capacity of the stock module
pub const MAX_TEMPLATES: u16 = 150;

/// Notepad layout: 16 pages of 32 bytes
pub const NOTEPAD_PAGES: u8 = 16;
pub const NOTEPAD_PAGE_SIZE: usize = 32;

/// Offset of the confirmation code in a raw acknowledge frame
pub const CONFIRMATION_POS: usize = 9;

/// Parameter numbers accepted by SetSysPara
pub mod params {
    /// Baud rate multiplier (value 1..=12, rate = value * 9600)
    pub const BAUD_CONTROL: u8 = 4;

    /// Matching security level (value 1..=5)
    pub const SECURITY_LEVEL: u8 = 5;

    /// Data packet size code (value 0..=3 for 32/64/128/256 bytes)
    pub const PACKET_SIZE: u8 = 6;
}
