//! Flat byte-addressable storage backing one address space.
//!
//! The console has two of these: the 64 KiB CPU space and the 16 KiB picture-unit space.
//! Each is owned by exactly one component, so they can never alias.

/// Size of the CPU-addressable space.
pub const CPU_SPACE_SIZE: usize = 0x10000;
/// Size of the picture-unit address space (14-bit addresses).
pub const PPU_SPACE_SIZE: usize = 0x4000;

/// One address space. Reads of never-written bytes return the fill value it was created with.
#[derive(Clone)]
pub struct Memory {
    mem: Vec<u8>,
    fill: u8,
}

impl Memory {
    /// Zero-filled space of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self::with_fill(size, 0)
    }

    /// Space of `size` bytes where every cell starts as `fill`.
    pub fn with_fill(size: usize, fill: u8) -> Self {
        debug_assert!(size > 0, "address space must not be empty");
        Self {
            mem: vec![fill; size],
            fill,
        }
    }

    /// Read a byte. Addresses past the end wrap around the space.
    pub fn load(&self, addr: u16) -> u8 {
        self.mem[addr as usize % self.mem.len()]
    }

    /// Write a byte. Addresses past the end wrap around the space.
    pub fn write(&mut self, addr: u16, data: u8) {
        let len = self.mem.len();
        self.mem[addr as usize % len] = data;
    }

    /// Bulk-copy `bytes` starting at `start`.
    ///
    /// Sizing is the caller's job (mappers check their layout first). Debug builds assert the
    /// copy fits; release builds copy the part that fits and drop the rest.
    pub fn write_to_memory(&mut self, bytes: &[u8], start: u16) {
        let start = start as usize;
        debug_assert!(
            start + bytes.len() <= self.mem.len(),
            "copy of {} bytes at ${:04X} overflows a {}-byte space",
            bytes.len(),
            start,
            self.mem.len()
        );
        let end = (start + bytes.len()).min(self.mem.len());
        if start < end {
            self.mem[start..end].copy_from_slice(&bytes[..end - start]);
        }
    }

    /// Borrow `len` bytes starting at `start` (clamped to the end of the space).
    pub fn slice(&self, start: u16, len: usize) -> &[u8] {
        let start = start as usize;
        let end = (start + len).min(self.mem.len());
        &self.mem[start.min(end)..end]
    }

    /// Restore every cell to the fill value, ready for a new session.
    pub fn reset(&mut self) {
        self.mem.fill(self.fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_memory_reads_fill_value() {
        let cpu = Memory::new(CPU_SPACE_SIZE);
        let ppu = Memory::with_fill(PPU_SPACE_SIZE, 0xFF);
        assert_eq!(cpu.load(0x1234), 0x00);
        assert_eq!(ppu.load(0x1234), 0xFF);
    }

    #[test]
    fn write_to_memory_copies_at_offset() {
        let mut mem = Memory::new(CPU_SPACE_SIZE);
        mem.write_to_memory(&[1, 2, 3], 0x8000);
        assert_eq!(mem.slice(0x7FFF, 5), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn reset_restores_fill() {
        let mut mem = Memory::with_fill(PPU_SPACE_SIZE, 0xFF);
        mem.write(0x0010, 0x42);
        mem.reset();
        assert_eq!(mem.load(0x0010), 0xFF);
    }

    #[test]
    #[should_panic(expected = "address space must not be empty")]
    #[cfg(debug_assertions)]
    fn empty_space_is_rejected() {
        Memory::new(0);
    }

    #[test]
    fn small_space_wraps_addresses() {
        let mut mem = Memory::new(PPU_SPACE_SIZE);
        mem.write(0x4001, 0x77);
        assert_eq!(mem.load(0x0001), 0x77);
    }
}
