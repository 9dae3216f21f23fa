//! Famicore: the CPU, bus and cartridge core of an NES (Nintendo Entertainment System) emulator.
//!
//! Implements the parts of the chipset documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide) that a program can observe
//! through the CPU: the Ricoh 2A03 instruction set, the CPU memory map with its PPU register
//! window, and iNES cartridge projection.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): flat storage plus
//!   the PPU register window $2000–$2007
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) loading; [Mapper](https://www.nesdev.org/wiki/Mapper) NROM (0)
//! - **config** – frame timing and boot options
//! - **console** – frame driver, VBlank and [NMI](https://www.nesdev.org/wiki/NMI) timing
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: official + common undocumented opcodes, interrupts
//! - **error** – load and halt errors
//! - **memory** – owned, resettable address spaces
//! - **ppu** – [PPU registers](https://www.nesdev.org/wiki/PPU_registers) as seen from the CPU

pub mod bus;
pub mod cartridge;
pub mod config;
pub mod console;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod ppu;
