//! Error types for cartridge loading and engine halts.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, EmuError>;

/// Everything the core can report to a host.
///
/// Writes to read-only PPU ports and reads of write-only ones are not errors;
/// the bus ignores or answers them with a placeholder.
#[derive(Error, Debug)]
pub enum EmuError {
    #[error("cartridge image is {len} bytes, shorter than the 16-byte header")]
    HeaderTooShort { len: usize },

    #[error("cartridge image truncated: header declares {expected} bytes, image has {actual}")]
    TruncatedImage { expected: usize, actual: usize },

    #[error("unsupported mapper: {0}")]
    MapperUnsupported(u8),

    #[error("mapper {mapper} cannot map {prg_banks} PRG bank(s) and {chr_banks} CHR bank(s)")]
    BankLayout {
        mapper: u8,
        prg_banks: u8,
        chr_banks: u8,
    },

    #[error("undefined instruction ${opcode:02X} at ${pc:04X}")]
    UndefinedInstruction { opcode: u8, pc: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
