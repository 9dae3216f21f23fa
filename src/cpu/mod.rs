//! 2A03 CPU emulation (a 6502 without decimal mode).
//!
//! Table-driven: every opcode decodes to an operation, an addressing mode and a base cycle
//! count (see [`opcodes`]). The engine is clocked one cycle at a time through [`cpu::CPU::tick`]
//! and reaches memory only through the [`crate::bus::Bus`] trait.

pub mod cpu;
pub mod flags;
pub mod opcodes;
pub mod trace;
