//! Confirmation codes
//!
//! Every acknowledge packet carries a single status byte as its first
//! payload byte. The mapping is total: codes absent from the manual become
//! [`Confirmation::Other`] instead of failing, so a firmware newer than the
//! documentation can never crash the host.

use std::fmt;

/// Status byte returned in every acknowledge packet
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Confirmation {
    /// Command executed successfully
    Success,
    /// Error receiving the data package
    PacketReceiveError,
    /// No finger on the sensor
    NoFinger,
    /// Failed to enroll the finger
    EnrollFailed,
    /// Image too messy to generate character file
    ImageTooMessy,
    /// Too few feature points in the image
    TooFewFeatures,
    /// The two fingerprints do not match
    PrintsDoNotMatch,
    /// No matching template found in the library
    NoMatchInLibrary,
    /// Failed to combine the character files
    CombineFailed,
    /// Page id beyond the library size
    PageBeyondLibrary,
    /// Template read from the library is invalid
    InvalidTemplate,
    /// Failed to upload the template
    TemplateUploadFailed,
    /// Module cannot receive further data packets
    CannotReceiveData,
    /// Failed to upload the image
    ImageUploadFailed,
    /// Failed to delete the template
    DeleteFailed,
    /// Failed to clear the library
    ClearFailed,
    /// Password verification failed
    WrongPassword,
    /// No valid primary image in the buffer
    NoValidImage,
    /// Flash write failed
    FlashWriteError,
    /// Undefined error reported by the module
    NoDefinition,
    /// Invalid register number
    InvalidRegister,
    /// Incorrect register configuration
    WrongRegisterConfig,
    /// Notepad page number out of range
    WrongNotepadPage,
    /// Failed to operate the communication port
    SerialPortError,
    /// Code not present in the manual
    Other(u8),
}

impl Confirmation {
    /// Map a raw status byte; never fails
    pub fn from_raw(code: u8) -> Self {
        match code {
            0x00 => Self::Success,
            0x01 => Self::PacketReceiveError,
            0x02 => Self::NoFinger,
            0x04 => Self::EnrollFailed,
            0x06 => Self::ImageTooMessy,
            0x07 => Self::TooFewFeatures,
            0x08 => Self::PrintsDoNotMatch,
            0x09 => Self::NoMatchInLibrary,
            0x0A => Self::CombineFailed,
            0x0B => Self::PageBeyondLibrary,
            0x0C => Self::InvalidTemplate,
            0x0D => Self::TemplateUploadFailed,
            0x0E => Self::CannotReceiveData,
            0x0F => Self::ImageUploadFailed,
            0x10 => Self::DeleteFailed,
            0x11 => Self::ClearFailed,
            0x13 => Self::WrongPassword,
            0x15 => Self::NoValidImage,
            0x18 => Self::FlashWriteError,
            0x19 => Self::NoDefinition,
            0x1A => Self::InvalidRegister,
            0x1B => Self::WrongRegisterConfig,
            0x1C => Self::WrongNotepadPage,
            0x1D => Self::SerialPortError,
            other => Self::Other(other),
        }
    }

    /// Get the raw status byte
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0x00,
            Self::PacketReceiveError => 0x01,
            Self::NoFinger => 0x02,
            Self::EnrollFailed => 0x04,
            Self::ImageTooMessy => 0x06,
            Self::TooFewFeatures => 0x07,
            Self::PrintsDoNotMatch => 0x08,
            Self::NoMatchInLibrary => 0x09,
            Self::CombineFailed => 0x0A,
            Self::PageBeyondLibrary => 0x0B,
            Self::InvalidTemplate => 0x0C,
            Self::TemplateUploadFailed => 0x0D,
            Self::CannotReceiveData => 0x0E,
            Self::ImageUploadFailed => 0x0F,
            Self::DeleteFailed => 0x10,
            Self::ClearFailed => 0x11,
            Self::WrongPassword => 0x13,
            Self::NoValidImage => 0x15,
            Self::FlashWriteError => 0x18,
            Self::NoDefinition => 0x19,
            Self::InvalidRegister => 0x1A,
            Self::WrongRegisterConfig => 0x1B,
            Self::WrongNotepadPage => 0x1C,
            Self::SerialPortError => 0x1D,
            Self::Other(code) => code,
        }
    }

    /// Check whether the command executed successfully
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Human-readable message, suitable for cross-referencing the manual
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "command execution complete",
            Self::PacketReceiveError => "error receiving data package",
            Self::NoFinger => "no finger on sensor",
            Self::EnrollFailed => "failed to enroll finger",
            Self::ImageTooMessy => "image too messy to generate character file",
            Self::TooFewFeatures => "too few feature points in image",
            Self::PrintsDoNotMatch => "fingerprints do not match",
            Self::NoMatchInLibrary => "no match found in library",
            Self::CombineFailed => "failed to combine character files",
            Self::PageBeyondLibrary => "page id beyond library size",
            Self::InvalidTemplate => "invalid template read from library",
            Self::TemplateUploadFailed => "failed to upload template",
            Self::CannotReceiveData => "module cannot receive data packets",
            Self::ImageUploadFailed => "failed to upload image",
            Self::DeleteFailed => "failed to delete template",
            Self::ClearFailed => "failed to clear library",
            Self::WrongPassword => "wrong password",
            Self::NoValidImage => "no valid primary image",
            Self::FlashWriteError => "flash write error",
            Self::NoDefinition => "undefined error",
            Self::InvalidRegister => "invalid register number",
            Self::WrongRegisterConfig => "incorrect register configuration",
            Self::WrongNotepadPage => "notepad page number out of range",
            Self::SerialPortError => "failed to operate communication port",
            Self::Other(_) => "device error",
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.message(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_mapping() {
        let conf = Confirmation::from_raw(0x00);
        assert_eq!(conf, Confirmation::Success);
        assert!(conf.is_success());
    }

    #[test]
    fn test_no_match_mapping() {
        let conf = Confirmation::from_raw(0x09);
        assert_eq!(conf, Confirmation::NoMatchInLibrary);
        assert!(!conf.is_success());
    }

    #[test]
    fn test_unknown_code_maps_to_other() {
        let conf = Confirmation::from_raw(0xFF);
        assert_eq!(conf, Confirmation::Other(0xFF));
        assert_eq!(conf.code(), 0xFF);
        assert_eq!(conf.to_string(), "device error (0xFF)");
    }

    #[test]
    fn test_mapping_is_total_and_reversible() {
        for raw in 0u8..=0xFF {
            let conf = Confirmation::from_raw(raw);
            assert_eq!(conf.code(), raw);
        }
    }

    #[test]
    fn test_message_includes_raw_code() {
        assert_eq!(
            Confirmation::FlashWriteError.to_string(),
            "flash write error (0x18)"
        );
    }
}
