//! Cartridge images in iNES layout.
//!
//! Implements the part of the [iNES](https://www.nesdev.org/wiki/INES) format the core needs:
//! 16-byte header (PRG size in 16 KiB units at byte 4, CHR size in 8 KiB units at byte 5,
//! mapper number split across the high nibbles of bytes 6–7), optional 512-byte trainer,
//! then PRG ROM, then CHR ROM.

use log::{info, warn};

use crate::{
    bus::AddressSpaces,
    cartridge::mapper::{self, mapper::Mapper},
    error::{EmuError, Result},
};

/// iNES header size.
pub const HEADER_SIZE: usize = 16;
/// Trainer block size, present when flags 6 bit 2 is set.
pub const TRAINER_SIZE: usize = 512;
/// One PRG ROM bank.
pub const PRG_BANK_SIZE: usize = 16 * 1024;
/// One CHR ROM bank.
pub const CHR_BANK_SIZE: usize = 8 * 1024;

const MAGIC: [u8; 4] = *b"NES\x1A";

/// The header fields the core reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InesHeader {
    /// PRG ROM size in 16 KiB units.
    pub prg_banks: u8,
    /// CHR ROM size in 8 KiB units (0 means the board carries CHR RAM).
    pub chr_banks: u8,
    pub flags_6: u8,
    pub flags_7: u8,
}

impl InesHeader {
    /// Parse the first 16 bytes of an image. The magic is not required.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(EmuError::HeaderTooShort { len: bytes.len() });
        }
        if bytes[..4] != MAGIC {
            warn!("cartridge header lacks NES<EOF> magic, parsing anyway");
        }

        Ok(Self {
            prg_banks: bytes[4],
            chr_banks: bytes[5],
            flags_6: bytes[6],
            flags_7: bytes[7],
        })
    }

    /// Mapper number: high nibble of flags 7, low nibble from the high bits of flags 6.
    pub fn mapper_id(&self) -> u8 {
        (self.flags_7 & 0xF0) | (self.flags_6 >> 4)
    }

    pub fn has_trainer(&self) -> bool {
        self.flags_6 & 0x04 != 0
    }

    pub fn prg_rom_size(&self) -> usize {
        self.prg_banks as usize * PRG_BANK_SIZE
    }

    pub fn chr_rom_size(&self) -> usize {
        self.chr_banks as usize * CHR_BANK_SIZE
    }

    fn prg_offset(&self) -> usize {
        HEADER_SIZE + if self.has_trainer() { TRAINER_SIZE } else { 0 }
    }
}

/// A loaded cartridge: the raw image (owned for the session), its header, and the mapper
/// that projects it into the console's address spaces.
pub struct Cartridge {
    raw: Vec<u8>,
    header: InesHeader,
    pub mapper: Box<dyn Mapper>,
}

impl Cartridge {
    /// Parse an image and pick its mapper.
    ///
    /// Fails on a short or truncated image, on a mapper id with no registered strategy,
    /// and on a bank layout the mapper cannot project.
    pub fn load_rom(raw: Vec<u8>) -> Result<Self> {
        let header = InesHeader::parse(&raw)?;

        let expected = header.prg_offset() + header.prg_rom_size() + header.chr_rom_size();
        if raw.len() < expected {
            return Err(EmuError::TruncatedImage {
                expected,
                actual: raw.len(),
            });
        }

        let mapper = mapper::mapper_for(header.mapper_id())?;
        mapper.validate(&header)?;

        info!(
            "cartridge: mapper {}, PRG {} KiB, CHR {} KiB",
            mapper.id(),
            header.prg_rom_size() / 1024,
            header.chr_rom_size() / 1024
        );

        Ok(Self {
            raw,
            header,
            mapper,
        })
    }

    pub fn mapper_id(&self) -> u8 {
        self.header.mapper_id()
    }

    pub fn prg_rom_size(&self) -> usize {
        self.header.prg_rom_size()
    }

    pub fn chr_rom_size(&self) -> usize {
        self.header.chr_rom_size()
    }

    pub fn prg_rom(&self) -> &[u8] {
        let start = self.header.prg_offset();
        &self.raw[start..start + self.prg_rom_size()]
    }

    pub fn chr_rom(&self) -> &[u8] {
        let start = self.header.prg_offset() + self.prg_rom_size();
        &self.raw[start..start + self.chr_rom_size()]
    }

    /// Copy ROM into the address spaces according to the mapper's banking policy.
    pub fn project(&self, spaces: AddressSpaces<'_>) {
        self.mapper.project(self, spaces);
    }
}
