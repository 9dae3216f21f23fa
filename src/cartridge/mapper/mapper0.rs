//! Mapper 0 (NROM): no bank switching, 16/32 KiB PRG, 0/8 KiB CHR.

use log::debug;

use crate::{
    bus::AddressSpaces,
    cartridge::{
        cartridge::{Cartridge, InesHeader, PRG_BANK_SIZE},
        mapper::mapper::Mapper,
    },
    error::{EmuError, Result},
};

/// PRG windows in CPU space.
const PRG_LOW: u16 = 0x8000;
const PRG_HIGH: u16 = 0xC000;

/// Pattern tables start at the bottom of PPU space.
const CHR_BASE: u16 = 0x0000;

/// NROM: first PRG bank at $8000, last at $C000. A 16 KiB image appears at both.
pub struct Mapper0;

impl Mapper0 {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Mapper0 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper for Mapper0 {
    fn id(&self) -> u8 {
        0
    }

    fn validate(&self, header: &InesHeader) -> Result<()> {
        match (header.prg_banks, header.chr_banks) {
            (1..=2, 0..=1) => Ok(()),
            (prg_banks, chr_banks) => Err(EmuError::BankLayout {
                mapper: self.id(),
                prg_banks,
                chr_banks,
            }),
        }
    }

    fn project(&self, cart: &Cartridge, spaces: AddressSpaces<'_>) {
        let AddressSpaces { cpu, ppu } = spaces;

        let prg = cart.prg_rom();
        let first = &prg[..PRG_BANK_SIZE];
        let last = &prg[prg.len() - PRG_BANK_SIZE..];

        cpu.write_to_memory(first, PRG_LOW);
        cpu.write_to_memory(last, PRG_HIGH);

        let chr = cart.chr_rom();
        if !chr.is_empty() {
            ppu.write_to_memory(chr, CHR_BASE);
        }

        debug!(
            "NROM: {} PRG bank(s) at ${:04X}/${:04X}, {} bytes CHR",
            prg.len() / PRG_BANK_SIZE,
            PRG_LOW,
            PRG_HIGH,
            chr.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bus::NesBus,
        cartridge::{cartridge::Cartridge, test_image},
        error::EmuError,
    };

    fn load(prg_banks: u8, chr_banks: u8) -> NesBus {
        let cart = Cartridge::load_rom(test_image(prg_banks, chr_banks, 0, 0)).unwrap();
        let mut bus = NesBus::new();
        cart.project(bus.spaces());
        bus
    }

    #[test]
    fn single_bank_is_mirrored() {
        let bus = load(1, 1);
        assert_eq!(bus.ram.slice(0x8000, 0x4000), bus.ram.slice(0xC000, 0x4000));
        assert_eq!(bus.ram.load(0x8001), 0x01);
    }

    #[test]
    fn two_banks_fill_the_window() {
        let bus = load(2, 0);
        assert_eq!(bus.ram.load(0x8000), 0x00);
        assert_eq!(bus.ram.load(0xC000), 0x40);
        assert_ne!(bus.ram.slice(0x8000, 0x4000), bus.ram.slice(0xC000, 0x4000));
    }

    #[test]
    fn chr_lands_at_pattern_tables() {
        let bus = load(1, 1);
        assert_eq!(bus.ppu.vram().load(0x0000), 0xA5);
        assert_eq!(bus.ppu.vram().load(0x1FFF), 0xFF ^ 0xA5);
    }

    #[test]
    fn no_chr_leaves_ppu_space_untouched() {
        let bus = load(1, 0);
        assert_eq!(bus.ppu.vram().load(0x0000), 0xFF);
    }

    #[test]
    fn oversized_prg_is_rejected() {
        let err = Cartridge::load_rom(test_image(4, 1, 0, 0)).err().unwrap();
        assert!(matches!(
            err,
            EmuError::BankLayout {
                mapper: 0,
                prg_banks: 4,
                chr_banks: 1
            }
        ));
    }
}
