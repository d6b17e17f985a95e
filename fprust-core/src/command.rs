//! FPM-10 instruction codes
//!
//! All commands from the module's instruction set. Each command packet
//! carries one of these codes as the first payload byte, followed by its
//! fixed argument layout.

use std::fmt;

/// Instruction codes sent in command packets
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Image acquisition and template generation
    GenImage = 0x01,
    ImageToTemplate = 0x02,
    Match = 0x03,
    Search = 0x04,
    RegisterModel = 0x05,

    // Template library
    Store = 0x06,
    Load = 0x07,
    UploadTemplate = 0x08,
    DownloadTemplate = 0x09,
    UploadImage = 0x0A,
    DownloadImage = 0x0B,
    DeleteTemplate = 0x0C,
    EmptyLibrary = 0x0D,

    // System configuration
    SetSystemParameter = 0x0E,
    ReadSystemParameters = 0x0F,
    SetPassword = 0x12,
    VerifyPassword = 0x13,
    RandomNumber = 0x14,
    SetAddress = 0x15,
    Handshake = 0x17,

    // Notepad
    WriteNotepad = 0x18,
    ReadNotepad = 0x19,

    // Library inspection
    TemplateCount = 0x1D,
    ReadIndexTable = 0x1F,
}

impl Command {
    /// Check whether this command irreversibly changes device state
    ///
    /// Dangerous commands are refused unless the session has explicitly
    /// enabled them.
    pub fn is_dangerous(self) -> bool {
        matches!(self, Self::EmptyLibrary)
    }

    /// Check whether a successful acknowledge starts a device-to-host
    /// data stream
    pub fn expects_download(self) -> bool {
        matches!(self, Self::UploadImage | Self::UploadTemplate)
    }

    /// Check whether a successful acknowledge must be followed by a
    /// host-to-device data stream
    pub fn expects_upload(self) -> bool {
        matches!(self, Self::DownloadImage | Self::DownloadTemplate)
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::GenImage => "GEN_IMG",
            Self::ImageToTemplate => "IMG2TZ",
            Self::Match => "MATCH",
            Self::Search => "SEARCH",
            Self::RegisterModel => "REG_MODEL",
            Self::Store => "STORE",
            Self::Load => "LOAD",
            Self::UploadTemplate => "UP_CHAR",
            Self::DownloadTemplate => "DOWN_CHAR",
            Self::UploadImage => "UP_IMAGE",
            Self::DownloadImage => "DOWN_IMAGE",
            Self::DeleteTemplate => "DEL_CHAR",
            Self::EmptyLibrary => "EMPTY",
            Self::SetSystemParameter => "SET_SYS_PARA",
            Self::ReadSystemParameters => "READ_SYS_PARA",
            Self::SetPassword => "SET_PWD",
            Self::VerifyPassword => "VFY_PWD",
            Self::RandomNumber => "GET_RANDOM",
            Self::SetAddress => "SET_ADDR",
            Self::Handshake => "HANDSHAKE",
            Self::WriteNotepad => "WRITE_NOTEPAD",
            Self::ReadNotepad => "READ_NOTEPAD",
            Self::TemplateCount => "TEMPLATE_NUM",
            Self::ReadIndexTable => "READ_INDEX_TABLE",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        assert_eq!(u8::from(Command::GenImage), 0x01);
        assert_eq!(u8::from(Command::Handshake), 0x17);
        assert_eq!(u8::from(Command::ReadIndexTable), 0x1F);
    }

    #[test]
    fn test_dangerous_commands() {
        assert!(Command::EmptyLibrary.is_dangerous());
        assert!(!Command::DeleteTemplate.is_dangerous());
        assert!(!Command::Handshake.is_dangerous());
    }

    #[test]
    fn test_stream_direction() {
        assert!(Command::UploadImage.expects_download());
        assert!(Command::DownloadImage.expects_upload());
        assert!(!Command::GenImage.expects_download());
        assert!(!Command::GenImage.expects_upload());
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::Handshake.to_string(), "HANDSHAKE(0x17)");
    }
}
