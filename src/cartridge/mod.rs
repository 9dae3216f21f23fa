//! Cartridge loading and mapper support.
//!
//! - **cartridge**: parses iNES images and owns the raw bytes for the session.
//! - **mapper**: banking strategies keyed by mapper id; NROM (0) is the only one registered.

pub mod cartridge;
pub mod mapper;

/// Build an iNES image in memory. PRG bank `b` byte `i` is `i + 0x40 * b` (mod 256);
/// CHR byte `i` is `i ^ 0xA5`.
#[cfg(test)]
pub(crate) fn test_image(prg_banks: u8, chr_banks: u8, flags_6: u8, flags_7: u8) -> Vec<u8> {
    use cartridge::{CHR_BANK_SIZE, PRG_BANK_SIZE};

    let mut image = vec![b'N', b'E', b'S', 0x1A, prg_banks, chr_banks, flags_6, flags_7];
    image.resize(cartridge::HEADER_SIZE, 0);
    for bank in 0..prg_banks as usize {
        image.extend((0..PRG_BANK_SIZE).map(|i| (i + 0x40 * bank) as u8));
    }
    image.extend((0..chr_banks as usize * CHR_BANK_SIZE).map(|i| i as u8 ^ 0xA5));
    image
}
