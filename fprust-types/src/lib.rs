//! Type definitions for fprust

pub mod error;
pub mod library;
pub mod system_params;

pub use error::{Error, Result};
pub use library::{CharBuffer, NotepadPage, SearchHit};
pub use system_params::{PacketSizeCode, StatusRegister, SystemParameters};
