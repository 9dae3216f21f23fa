//! PPU (Picture Processing Unit) register interface.
//!
//! See [PPU registers](https://www.nesdev.org/wiki/PPU_registers). Only the CPU-facing
//! contract is modeled: PPUCTRL decode, PPUSTATUS VBlank with clear-on-read, the two-write
//! PPUADDR pointer, and the auto-incrementing PPUDATA port.

pub mod ppu;
