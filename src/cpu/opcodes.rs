//! Instruction decode table: one `(operation, addressing mode, base cycles)` entry per opcode.
//!
//! Cycle counts follow the [6502 instruction reference](https://www.nesdev.org/obelisk-6502-guide/reference.html)
//! and the [unofficial opcode table](https://www.nesdev.org/wiki/CPU_unofficial_opcodes).
//! Opcodes without an entry (JAM and the unstable ones) halt the engine.

/// What an instruction does, independent of how it finds its operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // unofficial
    Alr,
    Anc,
    Arr,
    Axs,
    Dcp,
    Ign,
    Isc,
    Lax,
    Rla,
    Rra,
    Sax,
    Skb,
    Slo,
    Sre,
}

impl Operation {
    /// Pays the +1 page-cross penalty in indexed modes. Stores and read-modify-write
    /// operations never do; their base counts already include the extra cycle.
    pub fn reads_operand(self) -> bool {
        use Operation::*;
        matches!(
            self,
            Adc | And | Cmp | Eor | Lda | Ldx | Ldy | Ora | Sbc | Lax | Ign
        )
    }

    pub fn mnemonic(self) -> &'static str {
        use Operation::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop | Skb | Ign => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
            Alr => "ALR",
            Anc => "ANC",
            Arr => "ARR",
            Axs => "AXS",
            Dcp => "DCP",
            Isc => "ISC",
            Lax => "LAX",
            Rla => "RLA",
            Rra => "RRA",
            Sax => "SAX",
            Slo => "SLO",
            Sre => "SRE",
        }
    }
}

/// How an instruction locates its operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Implicit,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirectX,
    IndirectIndexedY,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub fn operand_len(self) -> u16 {
        use AddressingMode::*;
        match self {
            Implicit | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | Relative | IndexedIndirectX
            | IndirectIndexedY => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }
}

/// One decode-table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub op: Operation,
    pub mode: AddressingMode,
    pub cycles: u8,
}

impl Instruction {
    /// Opcode plus operand bytes.
    pub fn byte_len(&self) -> u16 {
        1 + self.mode.operand_len()
    }
}

pub type DecodeTable = [Option<Instruction>; 256];

use AddressingMode::*;
use Operation::*;

#[rustfmt::skip]
const OPCODES: &[(u8, Operation, AddressingMode, u8)] = &[
    // loads and stores
    (0xA9, Lda, Immediate, 2), (0xA5, Lda, ZeroPage, 3), (0xB5, Lda, ZeroPageX, 4), (0xAD, Lda, Absolute, 4),
    (0xBD, Lda, AbsoluteX, 4), (0xB9, Lda, AbsoluteY, 4), (0xA1, Lda, IndexedIndirectX, 6), (0xB1, Lda, IndirectIndexedY, 5),
    (0xA2, Ldx, Immediate, 2), (0xA6, Ldx, ZeroPage, 3), (0xB6, Ldx, ZeroPageY, 4), (0xAE, Ldx, Absolute, 4),
    (0xBE, Ldx, AbsoluteY, 4),
    (0xA0, Ldy, Immediate, 2), (0xA4, Ldy, ZeroPage, 3), (0xB4, Ldy, ZeroPageX, 4), (0xAC, Ldy, Absolute, 4),
    (0xBC, Ldy, AbsoluteX, 4),
    (0x85, Sta, ZeroPage, 3), (0x95, Sta, ZeroPageX, 4), (0x8D, Sta, Absolute, 4), (0x9D, Sta, AbsoluteX, 5),
    (0x99, Sta, AbsoluteY, 5), (0x81, Sta, IndexedIndirectX, 6), (0x91, Sta, IndirectIndexedY, 6),
    (0x86, Stx, ZeroPage, 3), (0x96, Stx, ZeroPageY, 4), (0x8E, Stx, Absolute, 4),
    (0x84, Sty, ZeroPage, 3), (0x94, Sty, ZeroPageX, 4), (0x8C, Sty, Absolute, 4),

    // transfers and stack
    (0xAA, Tax, Implicit, 2), (0xA8, Tay, Implicit, 2), (0xBA, Tsx, Implicit, 2),
    (0x8A, Txa, Implicit, 2), (0x9A, Txs, Implicit, 2), (0x98, Tya, Implicit, 2),
    (0x48, Pha, Implicit, 3), (0x08, Php, Implicit, 3), (0x68, Pla, Implicit, 4), (0x28, Plp, Implicit, 4),

    // logic and arithmetic
    (0x29, And, Immediate, 2), (0x25, And, ZeroPage, 3), (0x35, And, ZeroPageX, 4), (0x2D, And, Absolute, 4),
    (0x3D, And, AbsoluteX, 4), (0x39, And, AbsoluteY, 4), (0x21, And, IndexedIndirectX, 6), (0x31, And, IndirectIndexedY, 5),
    (0x09, Ora, Immediate, 2), (0x05, Ora, ZeroPage, 3), (0x15, Ora, ZeroPageX, 4), (0x0D, Ora, Absolute, 4),
    (0x1D, Ora, AbsoluteX, 4), (0x19, Ora, AbsoluteY, 4), (0x01, Ora, IndexedIndirectX, 6), (0x11, Ora, IndirectIndexedY, 5),
    (0x49, Eor, Immediate, 2), (0x45, Eor, ZeroPage, 3), (0x55, Eor, ZeroPageX, 4), (0x4D, Eor, Absolute, 4),
    (0x5D, Eor, AbsoluteX, 4), (0x59, Eor, AbsoluteY, 4), (0x41, Eor, IndexedIndirectX, 6), (0x51, Eor, IndirectIndexedY, 5),
    (0x24, Bit, ZeroPage, 3), (0x2C, Bit, Absolute, 4),
    (0x69, Adc, Immediate, 2), (0x65, Adc, ZeroPage, 3), (0x75, Adc, ZeroPageX, 4), (0x6D, Adc, Absolute, 4),
    (0x7D, Adc, AbsoluteX, 4), (0x79, Adc, AbsoluteY, 4), (0x61, Adc, IndexedIndirectX, 6), (0x71, Adc, IndirectIndexedY, 5),
    (0xE9, Sbc, Immediate, 2), (0xE5, Sbc, ZeroPage, 3), (0xF5, Sbc, ZeroPageX, 4), (0xED, Sbc, Absolute, 4),
    (0xFD, Sbc, AbsoluteX, 4), (0xF9, Sbc, AbsoluteY, 4), (0xE1, Sbc, IndexedIndirectX, 6), (0xF1, Sbc, IndirectIndexedY, 5),
    (0xC9, Cmp, Immediate, 2), (0xC5, Cmp, ZeroPage, 3), (0xD5, Cmp, ZeroPageX, 4), (0xCD, Cmp, Absolute, 4),
    (0xDD, Cmp, AbsoluteX, 4), (0xD9, Cmp, AbsoluteY, 4), (0xC1, Cmp, IndexedIndirectX, 6), (0xD1, Cmp, IndirectIndexedY, 5),
    (0xE0, Cpx, Immediate, 2), (0xE4, Cpx, ZeroPage, 3), (0xEC, Cpx, Absolute, 4),
    (0xC0, Cpy, Immediate, 2), (0xC4, Cpy, ZeroPage, 3), (0xCC, Cpy, Absolute, 4),

    // increments and decrements
    (0xE6, Inc, ZeroPage, 5), (0xF6, Inc, ZeroPageX, 6), (0xEE, Inc, Absolute, 6), (0xFE, Inc, AbsoluteX, 7),
    (0xE8, Inx, Implicit, 2), (0xC8, Iny, Implicit, 2),
    (0xC6, Dec, ZeroPage, 5), (0xD6, Dec, ZeroPageX, 6), (0xCE, Dec, Absolute, 6), (0xDE, Dec, AbsoluteX, 7),
    (0xCA, Dex, Implicit, 2), (0x88, Dey, Implicit, 2),

    // shifts
    (0x0A, Asl, Accumulator, 2), (0x06, Asl, ZeroPage, 5), (0x16, Asl, ZeroPageX, 6), (0x0E, Asl, Absolute, 6),
    (0x1E, Asl, AbsoluteX, 7),
    (0x4A, Lsr, Accumulator, 2), (0x46, Lsr, ZeroPage, 5), (0x56, Lsr, ZeroPageX, 6), (0x4E, Lsr, Absolute, 6),
    (0x5E, Lsr, AbsoluteX, 7),
    (0x2A, Rol, Accumulator, 2), (0x26, Rol, ZeroPage, 5), (0x36, Rol, ZeroPageX, 6), (0x2E, Rol, Absolute, 6),
    (0x3E, Rol, AbsoluteX, 7),
    (0x6A, Ror, Accumulator, 2), (0x66, Ror, ZeroPage, 5), (0x76, Ror, ZeroPageX, 6), (0x6E, Ror, Absolute, 6),
    (0x7E, Ror, AbsoluteX, 7),

    // jumps, calls, interrupts
    (0x4C, Jmp, Absolute, 3), (0x6C, Jmp, Indirect, 5),
    (0x20, Jsr, Absolute, 6), (0x60, Rts, Implicit, 6),
    (0x00, Brk, Implicit, 7), (0x40, Rti, Implicit, 6),

    // branches
    (0x90, Bcc, Relative, 2), (0xB0, Bcs, Relative, 2), (0xF0, Beq, Relative, 2), (0x30, Bmi, Relative, 2),
    (0xD0, Bne, Relative, 2), (0x10, Bpl, Relative, 2), (0x50, Bvc, Relative, 2), (0x70, Bvs, Relative, 2),

    // flags
    (0x18, Clc, Implicit, 2), (0xD8, Cld, Implicit, 2), (0x58, Cli, Implicit, 2), (0xB8, Clv, Implicit, 2),
    (0x38, Sec, Implicit, 2), (0xF8, Sed, Implicit, 2), (0x78, Sei, Implicit, 2),

    (0xEA, Nop, Implicit, 2),

    // unofficial NOPs
    (0x1A, Nop, Implicit, 2), (0x3A, Nop, Implicit, 2), (0x5A, Nop, Implicit, 2),
    (0x7A, Nop, Implicit, 2), (0xDA, Nop, Implicit, 2), (0xFA, Nop, Implicit, 2),
    (0x80, Skb, Immediate, 2), (0x82, Skb, Immediate, 2), (0x89, Skb, Immediate, 2),
    (0xC2, Skb, Immediate, 2), (0xE2, Skb, Immediate, 2),
    (0x04, Ign, ZeroPage, 3), (0x44, Ign, ZeroPage, 3), (0x64, Ign, ZeroPage, 3),
    (0x14, Ign, ZeroPageX, 4), (0x34, Ign, ZeroPageX, 4), (0x54, Ign, ZeroPageX, 4),
    (0x74, Ign, ZeroPageX, 4), (0xD4, Ign, ZeroPageX, 4), (0xF4, Ign, ZeroPageX, 4),
    (0x0C, Ign, Absolute, 4),
    (0x1C, Ign, AbsoluteX, 4), (0x3C, Ign, AbsoluteX, 4), (0x5C, Ign, AbsoluteX, 4),
    (0x7C, Ign, AbsoluteX, 4), (0xDC, Ign, AbsoluteX, 4), (0xFC, Ign, AbsoluteX, 4),

    // unofficial combined operations
    (0xA7, Lax, ZeroPage, 3), (0xB7, Lax, ZeroPageY, 4), (0xAF, Lax, Absolute, 4), (0xBF, Lax, AbsoluteY, 4),
    (0xA3, Lax, IndexedIndirectX, 6), (0xB3, Lax, IndirectIndexedY, 5),
    (0x87, Sax, ZeroPage, 3), (0x97, Sax, ZeroPageY, 4), (0x8F, Sax, Absolute, 4), (0x83, Sax, IndexedIndirectX, 6),
    (0xEB, Sbc, Immediate, 2),
    (0xC7, Dcp, ZeroPage, 5), (0xD7, Dcp, ZeroPageX, 6), (0xCF, Dcp, Absolute, 6), (0xDF, Dcp, AbsoluteX, 7),
    (0xDB, Dcp, AbsoluteY, 7), (0xC3, Dcp, IndexedIndirectX, 8), (0xD3, Dcp, IndirectIndexedY, 8),
    (0xE7, Isc, ZeroPage, 5), (0xF7, Isc, ZeroPageX, 6), (0xEF, Isc, Absolute, 6), (0xFF, Isc, AbsoluteX, 7),
    (0xFB, Isc, AbsoluteY, 7), (0xE3, Isc, IndexedIndirectX, 8), (0xF3, Isc, IndirectIndexedY, 8),
    (0x07, Slo, ZeroPage, 5), (0x17, Slo, ZeroPageX, 6), (0x0F, Slo, Absolute, 6), (0x1F, Slo, AbsoluteX, 7),
    (0x1B, Slo, AbsoluteY, 7), (0x03, Slo, IndexedIndirectX, 8), (0x13, Slo, IndirectIndexedY, 8),
    (0x27, Rla, ZeroPage, 5), (0x37, Rla, ZeroPageX, 6), (0x2F, Rla, Absolute, 6), (0x3F, Rla, AbsoluteX, 7),
    (0x3B, Rla, AbsoluteY, 7), (0x23, Rla, IndexedIndirectX, 8), (0x33, Rla, IndirectIndexedY, 8),
    (0x47, Sre, ZeroPage, 5), (0x57, Sre, ZeroPageX, 6), (0x4F, Sre, Absolute, 6), (0x5F, Sre, AbsoluteX, 7),
    (0x5B, Sre, AbsoluteY, 7), (0x43, Sre, IndexedIndirectX, 8), (0x53, Sre, IndirectIndexedY, 8),
    (0x67, Rra, ZeroPage, 5), (0x77, Rra, ZeroPageX, 6), (0x6F, Rra, Absolute, 6), (0x7F, Rra, AbsoluteX, 7),
    (0x7B, Rra, AbsoluteY, 7), (0x63, Rra, IndexedIndirectX, 8), (0x73, Rra, IndirectIndexedY, 8),
    (0x4B, Alr, Immediate, 2), (0x0B, Anc, Immediate, 2), (0x2B, Anc, Immediate, 2),
    (0x6B, Arr, Immediate, 2), (0xCB, Axs, Immediate, 2),
];

/// Build the 256-entry decode table.
pub fn decode_table() -> DecodeTable {
    let mut table: DecodeTable = [None; 256];
    for &(opcode, op, mode, cycles) in OPCODES {
        debug_assert!(table[opcode as usize].is_none(), "opcode ${opcode:02X} listed twice");
        table[opcode as usize] = Some(Instruction { op, mode, cycles });
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAMS: [u8; 12] = [
        0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
    ];
    const UNSTABLE: [u8; 8] = [0x8B, 0x93, 0x9B, 0x9C, 0x9E, 0x9F, 0xAB, 0xBB];

    #[test]
    fn only_jam_and_unstable_opcodes_are_missing() {
        let table = decode_table();
        for opcode in 0..=255u8 {
            let expected_missing = JAMS.contains(&opcode) || UNSTABLE.contains(&opcode);
            assert_eq!(
                table[opcode as usize].is_none(),
                expected_missing,
                "opcode ${opcode:02X}"
            );
        }
        assert_eq!(OPCODES.len(), 256 - JAMS.len() - UNSTABLE.len());
    }

    /// Documented instruction length in bytes, opcode + operands; 0 where the table has no entry.
    #[rustfmt::skip]
    const LENGTHS: [u16; 256] = [
    //  0  1  2  3  4  5  6  7  8  9  A  B  C  D  E  F
        1, 2, 0, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 0
        2, 2, 0, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 1
        3, 2, 0, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 2
        2, 2, 0, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 3
        1, 2, 0, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 4
        2, 2, 0, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 5
        1, 2, 0, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 6
        2, 2, 0, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 7
        2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 0, 3, 3, 3, 3, // 8
        2, 2, 0, 0, 2, 2, 2, 2, 1, 3, 1, 0, 0, 3, 0, 0, // 9
        2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 0, 3, 3, 3, 3, // A
        2, 2, 0, 2, 2, 2, 2, 2, 1, 3, 1, 0, 3, 3, 3, 3, // B
        2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // C
        2, 2, 0, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // D
        2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // E
        2, 2, 0, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // F
    ];

    #[test]
    fn operand_lengths_match_instruction_lengths() {
        let table = decode_table();
        for (opcode, entry) in table.iter().enumerate() {
            match entry {
                Some(ins) => assert_eq!(
                    ins.byte_len(),
                    LENGTHS[opcode],
                    "opcode ${opcode:02X} ({ins:?})"
                ),
                None => assert_eq!(LENGTHS[opcode], 0, "opcode ${opcode:02X} has no entry"),
            }
        }
    }

    #[test]
    fn zero_page_y_is_only_used_by_x_register_ops() {
        let table = decode_table();
        let mut zero_page_y: Vec<u8> = (0..=255u8)
            .filter(|&op| table[op as usize].is_some_and(|ins| ins.mode == ZeroPageY))
            .collect();
        zero_page_y.sort_unstable();
        // STX, SAX, LDX, LAX
        assert_eq!(zero_page_y, vec![0x96, 0x97, 0xB6, 0xB7]);
    }

    #[test]
    fn every_entry_has_a_plausible_cycle_count() {
        for ins in decode_table().iter().flatten() {
            assert!((2..=8).contains(&ins.cycles), "{ins:?}");
        }
    }

    #[test]
    fn page_penalty_only_for_reads() {
        assert!(Lda.reads_operand());
        assert!(Ign.reads_operand());
        assert!(!Sta.reads_operand());
        assert!(!Inc.reads_operand());
        assert!(!Dcp.reads_operand());
    }
}
