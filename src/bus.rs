//! Memory bus and address decoding for the CPU.
//!
//! The CPU space is a flat 64 KiB store, except for the PPU register window $2000–$2007,
//! which is never backed by storage: every access there is forwarded to the PPU shim.

use log::trace;

use crate::{
    memory::{CPU_SPACE_SIZE, Memory},
    ppu::ppu::PPU,
};

/// First and last address of the PPU register window.
pub const PPU_REGISTERS: std::ops::RangeInclusive<u16> = 0x2000..=0x2007;

/// Value returned when the CPU reads a write-only PPU register.
pub const WRITE_ONLY_PLACEHOLDER: u8 = 0x00;

/// Trait for memory-mapped I/O and bus access used by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    /// Take a pending NMI request from a device on the bus, if any.
    fn poll_nmi(&mut self) -> bool {
        false
    }
}

/// Mutable borrows of both address spaces, handed to a mapper for ROM projection.
pub struct AddressSpaces<'a> {
    pub cpu: &'a mut Memory,
    pub ppu: &'a mut Memory,
}

/// Console bus: CPU address space plus the PPU register shim (which owns the PPU space).
pub struct NesBus {
    pub ram: Memory,
    pub ppu: PPU,
}

impl NesBus {
    /// Create a bus with zeroed CPU memory and a power-on PPU.
    pub fn new() -> Self {
        Self {
            ram: Memory::new(CPU_SPACE_SIZE),
            ppu: PPU::new(),
        }
    }

    /// Both address spaces at once, for mapper projection.
    pub fn spaces(&mut self) -> AddressSpaces<'_> {
        AddressSpaces {
            cpu: &mut self.ram,
            ppu: self.ppu.vram_mut(),
        }
    }

    /// Wipe both address spaces and PPU state for a new session.
    pub fn power_cycle(&mut self) {
        self.ram.reset();
        self.ppu.power_cycle();
    }
}

impl Default for NesBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x2002 => self.ppu.read_status(),
            0x2004 => self.ppu.read_oam_data(),
            0x2007 => self.ppu.read_data(),
            // PPUCTRL, PPUMASK, OAMADDR, PPUSCROLL, PPUADDR are write-only
            0x2000 | 0x2001 | 0x2003 | 0x2005 | 0x2006 => {
                trace!("read of write-only PPU register ${:04X}", addr);
                WRITE_ONLY_PLACEHOLDER
            }
            _ => self.ram.load(addr),
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x2000 => self.ppu.write_ctrl(data),
            0x2001 => self.ppu.write_mask(data),
            // PPUSTATUS is read-only: writes have no effect
            0x2002 => trace!("write of {:02X} to read-only PPUSTATUS ignored", data),
            0x2003 => self.ppu.write_oam_addr(data),
            0x2004 => self.ppu.write_oam_data(data),
            0x2005 => self.ppu.write_scroll(data),
            0x2006 => self.ppu.write_addr(data),
            0x2007 => self.ppu.write_data(data),
            _ => self.ram.write(addr, data),
        }
    }

    fn poll_nmi(&mut self) -> bool {
        // Consume NMI if PPU triggered it
        if self.ppu.nmi {
            self.ppu.nmi = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_addresses_hit_storage() {
        let mut bus = NesBus::new();
        bus.write(0x0200, 0x42);
        bus.write(0x2008, 0x43);
        assert_eq!(bus.read(0x0200), 0x42);
        assert_eq!(bus.read(0x2008), 0x43);
    }

    #[test]
    fn register_window_never_touches_storage() {
        let mut bus = NesBus::new();
        for addr in PPU_REGISTERS {
            bus.write(addr, 0x5A);
        }
        for addr in PPU_REGISTERS {
            assert_eq!(bus.ram.load(addr), 0x00);
        }
    }

    #[test]
    fn write_only_registers_read_placeholder() {
        let mut bus = NesBus::new();
        bus.write(0x2000, 0xFF);
        for addr in [0x2000, 0x2001, 0x2003, 0x2005, 0x2006] {
            assert_eq!(bus.read(addr), WRITE_ONLY_PLACEHOLDER);
        }
    }

    #[test]
    fn status_write_is_ignored() {
        let mut bus = NesBus::new();
        bus.ppu.begin_vblank();
        bus.write(0x2002, 0x00);
        assert!(bus.ppu.vblank);
    }

    #[test]
    fn status_read_clears_vblank_through_bus() {
        let mut bus = NesBus::new();
        bus.ppu.begin_vblank();
        assert_eq!(bus.read(0x2002) & 0x80, 0x80);
        assert_eq!(bus.read(0x2002) & 0x80, 0x00);
    }

    #[test]
    fn vram_port_round_trip_through_bus() {
        let mut bus = NesBus::new();
        bus.write(0x2006, 0x23);
        bus.write(0x2006, 0xC0);
        bus.write(0x2007, 0x11);
        bus.write(0x2007, 0x22);

        bus.write(0x2006, 0x23);
        bus.write(0x2006, 0xC0);
        assert_eq!(bus.read(0x2007), 0x11);
        assert_eq!(bus.read(0x2007), 0x22);
        assert_eq!(bus.ppu.vram().load(0x23C0), 0x11);
    }

    #[test]
    fn poll_nmi_consumes_request() {
        let mut bus = NesBus::new();
        bus.write(0x2000, 0x80);
        bus.ppu.begin_vblank();
        assert!(bus.poll_nmi());
        assert!(!bus.poll_nmi());
    }

    #[test]
    fn spaces_do_not_alias() {
        let mut bus = NesBus::new();
        let AddressSpaces { cpu, ppu } = bus.spaces();
        cpu.write(0x0000, 0x01);
        ppu.write(0x0000, 0x02);
        assert_eq!(bus.ram.load(0x0000), 0x01);
        assert_eq!(bus.ppu.vram().load(0x0000), 0x02);
    }
}
