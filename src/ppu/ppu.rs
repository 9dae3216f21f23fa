//! PPU register shim: the part of the picture unit the CPU bus talks to.
//!
//! Registers $2000–$2007 as seen from the CPU. The shim owns the picture-unit address space
//! (pattern tables at $0000, nametables at $2000, palette at $3F00); the rendering pipeline
//! that would consume it is not modeled.

use log::trace;

use crate::memory::{Memory, PPU_SPACE_SIZE};

/// OAM (Object Attribute Memory): 64 sprites × 4 bytes.
pub const OAM_LEN: usize = 256;

/// VRAM pointer width: the PPU decodes 14 address bits.
const VRAM_ADDR_MASK: u16 = 0x3FFF;

/// $2000 PPUCTRL, split into its fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PpuCtrl {
    /// Bits 0–1: base nametable ($2000, $2400, $2800, $2C00).
    pub nametable: u8,
    /// Bit 2: VRAM pointer advances by 32 (down a row) instead of 1.
    pub increment_32: bool,
    /// Bit 3: 8×8 sprite pattern table at $1000.
    pub sprite_table_high: bool,
    /// Bit 4: background pattern table at $1000.
    pub background_table_high: bool,
    /// Bit 5: 8×16 sprites.
    pub tall_sprites: bool,
    /// Bit 7: raise NMI at the start of VBlank.
    pub nmi_enable: bool,
}

impl PpuCtrl {
    pub fn from_bits(data: u8) -> Self {
        Self {
            nametable: data & 0b11,
            increment_32: data & 0x04 != 0,
            sprite_table_high: data & 0x08 != 0,
            background_table_high: data & 0x10 != 0,
            tall_sprites: data & 0x20 != 0,
            nmi_enable: data & 0x80 != 0,
        }
    }

    pub fn nametable_base(&self) -> u16 {
        0x2000 + self.nametable as u16 * 0x400
    }

    pub fn vram_increment(&self) -> u16 {
        if self.increment_32 { 32 } else { 1 }
    }
}

/// PPU register state plus the picture-unit address space.
pub struct PPU {
    pub ctrl: PpuCtrl,
    pub mask: u8,
    pub vblank: bool,
    /// Latched NMI request, consumed by the CPU through the bus.
    pub nmi: bool,
    /// VRAM pointer set through $2006 (14 bits effective).
    pub addr: u16,
    /// Shared first/second write toggle for $2005 and $2006.
    pub write_latch: bool,
    pub scroll_x: u8,
    pub scroll_y: u8,
    pub oam: [u8; OAM_LEN],
    pub oam_addr: u8,
    vram: Memory,
}

impl PPU {
    /// Power-on state. Unwritten picture-unit memory reads as $FF.
    pub fn new() -> Self {
        Self {
            ctrl: PpuCtrl::default(),
            mask: 0,
            vblank: false,
            nmi: false,
            addr: 0,
            write_latch: false,
            scroll_x: 0,
            scroll_y: 0,
            oam: [0; OAM_LEN],
            oam_addr: 0,
            vram: Memory::with_fill(PPU_SPACE_SIZE, 0xFF),
        }
    }

    /// Clear register state. The address space is kept; see [`PPU::power_cycle`].
    pub fn reset(&mut self) {
        self.ctrl = PpuCtrl::default();
        self.mask = 0;
        self.vblank = false;
        self.nmi = false;
        self.addr = 0;
        self.write_latch = false;
        self.scroll_x = 0;
        self.scroll_y = 0;
        self.oam_addr = 0;
    }

    /// Reset registers and wipe the picture-unit address space and OAM.
    pub fn power_cycle(&mut self) {
        self.reset();
        self.oam = [0; OAM_LEN];
        self.vram.reset();
    }

    pub fn vram(&self) -> &Memory {
        &self.vram
    }

    pub fn vram_mut(&mut self) -> &mut Memory {
        &mut self.vram
    }

    /// VBlank begins: set the status flag and request NMI if enabled.
    pub fn begin_vblank(&mut self) {
        self.vblank = true;
        if self.ctrl.nmi_enable {
            self.nmi = true;
        }
    }

    /// VBlank ends (pre-render line).
    pub fn end_vblank(&mut self) {
        self.vblank = false;
    }

    /// $2000 write.
    pub fn write_ctrl(&mut self, data: u8) {
        let was_enabled = self.ctrl.nmi_enable;
        self.ctrl = PpuCtrl::from_bits(data);
        // Enabling NMI while already in VBlank fires immediately.
        if !was_enabled && self.ctrl.nmi_enable && self.vblank {
            self.nmi = true;
        }
        trace!("PPUCTRL <- {:02X} ({:?})", data, self.ctrl);
    }

    /// $2001 write.
    pub fn write_mask(&mut self, data: u8) {
        self.mask = data;
    }

    /// $2002 read: VBlank in bit 7. Reading clears VBlank and the write latch.
    pub fn read_status(&mut self) -> u8 {
        let status = if self.vblank { 0x80 } else { 0x00 };

        self.vblank = false;
        self.write_latch = false;

        trace!("PPUSTATUS -> {:02X}", status);
        status
    }

    /// $2003 write.
    pub fn write_oam_addr(&mut self, data: u8) {
        self.oam_addr = data;
    }

    /// $2004 read.
    pub fn read_oam_data(&self) -> u8 {
        self.oam[self.oam_addr as usize]
    }

    /// $2004 write: store and advance the OAM address.
    pub fn write_oam_data(&mut self, data: u8) {
        self.oam[self.oam_addr as usize] = data;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    /// $2005 write: X scroll first, then Y.
    pub fn write_scroll(&mut self, data: u8) {
        if !self.write_latch {
            self.scroll_x = data;
        } else {
            self.scroll_y = data;
        }
        self.write_latch = !self.write_latch;
    }

    /// $2006 write: high byte first (6 bits kept), then low byte.
    pub fn write_addr(&mut self, data: u8) {
        if !self.write_latch {
            self.addr = ((data as u16) << 8) & 0x3F00;
        } else {
            self.addr = (self.addr & 0xFF00) | data as u16;
        }
        self.write_latch = !self.write_latch;
    }

    /// $2007 read: byte at the VRAM pointer, then advance it.
    pub fn read_data(&mut self) -> u8 {
        let addr = self.addr & VRAM_ADDR_MASK;
        let data = self.vram.load(addr);
        trace!("PPUDATA ${:04X} -> {:02X}", addr, data);
        self.advance_addr();
        data
    }

    /// $2007 write: store at the VRAM pointer, then advance it.
    pub fn write_data(&mut self, data: u8) {
        let addr = self.addr & VRAM_ADDR_MASK;
        trace!("PPUDATA ${:04X} <- {:02X}", addr, data);
        self.vram.write(addr, data);
        self.advance_addr();
    }

    fn advance_addr(&mut self) {
        self.addr = self.addr.wrapping_add(self.ctrl.vram_increment()) & VRAM_ADDR_MASK;
    }
}

impl Default for PPU {
    fn default() -> Self {
        Self::new()
    }
}
