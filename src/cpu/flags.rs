//! 6502 processor status register (P) flag bits.

pub const FLAG_CARRY: u8 = 1 << 0;
pub const FLAG_ZERO: u8 = 1 << 1;
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
pub const FLAG_DECIMAL: u8 = 1 << 3; // tracked, but the 2A03 has no BCD
pub const FLAG_BREAK: u8 = 1 << 4; // only exists in pushed copies of P
pub const FLAG_UNUSED: u8 = 1 << 5; // always 1 when read
pub const FLAG_OVERFLOW: u8 = 1 << 6;
pub const FLAG_NEGATIVE: u8 = 1 << 7;

/// P decomposed into its seven named flags.
///
/// [`Status::bits`] and [`Status::from_bits`] recombine them in hardware bit order, with bit 5
/// forced on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub carry: bool,
    pub zero: bool,
    pub interrupt_disable: bool,
    pub decimal: bool,
    pub brk: bool,
    pub overflow: bool,
    pub negative: bool,
}

impl Status {
    /// Power-on value: I set (P reads $24).
    pub fn power_on() -> Self {
        Self {
            interrupt_disable: true,
            ..Self::default()
        }
    }

    pub fn bits(&self) -> u8 {
        let mut p = FLAG_UNUSED;
        for (set, bit) in [
            (self.carry, FLAG_CARRY),
            (self.zero, FLAG_ZERO),
            (self.interrupt_disable, FLAG_INTERRUPT_DISABLE),
            (self.decimal, FLAG_DECIMAL),
            (self.brk, FLAG_BREAK),
            (self.overflow, FLAG_OVERFLOW),
            (self.negative, FLAG_NEGATIVE),
        ] {
            if set {
                p |= bit;
            }
        }
        p
    }

    pub fn from_bits(p: u8) -> Self {
        Self {
            carry: p & FLAG_CARRY != 0,
            zero: p & FLAG_ZERO != 0,
            interrupt_disable: p & FLAG_INTERRUPT_DISABLE != 0,
            decimal: p & FLAG_DECIMAL != 0,
            brk: p & FLAG_BREAK != 0,
            overflow: p & FLAG_OVERFLOW != 0,
            negative: p & FLAG_NEGATIVE != 0,
        }
    }

    /// Set Z and N from an 8-bit result.
    pub fn set_zn(&mut self, value: u8) {
        self.zero = value == 0;
        self.negative = value & 0x80 != 0;
    }
}
