//! Error types for emulator cores

use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Errors that can occur during emulation
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("invalid memory address: 0x{0:04X}")]
    InvalidAddress(u16),

    /// Never constructed by a conforming core: every opcode byte is bound to
    /// a handler, undocumented ones included. Kept for API completeness.
    #[error("invalid opcode: 0x{0:02X}")]
    InvalidOpcode(u8),

    #[error("unsupported opcode: 0x{0:02X}")]
    UnsupportedOpcode(u8),

    /// Header magic mismatch or a size field inconsistent with file length.
    #[error("malformed cartridge: {0}")]
    MalformedCartridge(String),

    /// Mapper id outside the supported set. Raised at install time, never
    /// discovered mid-run.
    #[error("unsupported mapper: {0}")]
    UnsupportedMapper(u8),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("emulation error: {0}")]
    Other(String),
}
