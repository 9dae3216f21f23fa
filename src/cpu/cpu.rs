use log::{debug, info, warn};

use crate::{
    bus::Bus,
    cpu::{
        flags::{FLAG_BREAK, FLAG_UNUSED, Status},
        opcodes::{AddressingMode, DecodeTable, Instruction, Operation, decode_table},
        trace::{StepObserver, StepRecord},
    },
    error::EmuError,
};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

const STACK_BASE: u16 = 0x0100;

/// Every interrupt sequence (reset, NMI, IRQ) takes 7 cycles.
const INTERRUPT_CYCLES: u32 = 7;

/// Cycle counter value after the power-on reset sequence.
const POWER_ON_CYCLES: u64 = 7;

/// Where and on what the engine stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Halt {
    pub opcode: u8,
    pub pc: u16,
}

impl From<Halt> for EmuError {
    fn from(halt: Halt) -> Self {
        EmuError::UndefinedInstruction {
            opcode: halt.opcode,
            pc: halt.pc,
        }
    }
}

/// Engine state as seen by the host after a tick or step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuState {
    Running,
    Halted(Halt),
}

pub struct CPU<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,
    /// Cycles elapsed since power-on.
    pub cycles: u64,
    pub bus: B,
    /// Cycles left before the current instruction completes.
    budget: u32,
    table: DecodeTable,
    reset_pending: bool,
    nmi_pending: bool,
    irq_line: bool,
    halt: Option<Halt>,
    observer: Option<Box<dyn StepObserver>>,
}

impl<B: Bus> CPU<B> {
    /// Power-on register state. PC stays at 0 until [`CPU::reset`] reads the reset vector.
    pub fn new(bus: B) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: Status::power_on(),
            cycles: POWER_ON_CYCLES,
            bus,
            budget: 0,
            table: decode_table(),
            reset_pending: false,
            nmi_pending: false,
            irq_line: false,
            halt: None,
            observer: None,
        }
    }

    /// Power-on reset: registers to their initial values, PC from the reset vector.
    ///
    /// Clears any halt and pending interrupt.
    pub fn reset(&mut self) {
        self.pc = self.read_word(RESET_VECTOR);

        self.sp = 0xFD; // the reset sequence leaves SP three below $00
        self.status = Status::power_on();

        self.a = 0;
        self.x = 0;
        self.y = 0;

        self.cycles = POWER_ON_CYCLES;
        self.budget = 0;
        self.reset_pending = false;
        self.nmi_pending = false;
        self.irq_line = false;
        self.halt = None;

        info!("CPU reset, PC=${:04X}", self.pc);
    }

    /// Latch a warm reset, serviced at the next instruction boundary. Also lifts a halt.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
        self.halt = None;
    }

    /// Latch an NMI edge.
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drive the IRQ line. Serviced while asserted and I is clear.
    pub fn set_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    pub fn set_observer(&mut self, observer: Box<dyn StepObserver>) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn state(&self) -> CpuState {
        match self.halt {
            Some(halt) => CpuState::Halted(halt),
            None => CpuState::Running,
        }
    }

    pub fn halt(&self) -> Option<Halt> {
        self.halt
    }

    /// Cycles still owed by the instruction in flight.
    pub fn pending_cycles(&self) -> u32 {
        self.budget
    }

    /// Advance one clock cycle.
    ///
    /// When the previous instruction's cycles are used up this services an interrupt or
    /// executes the next instruction, charging its full cost up front. A halted engine does
    /// nothing and keeps reporting the halt.
    pub fn tick(&mut self) -> CpuState {
        if self.halt.is_some() {
            return self.state();
        }

        if self.budget == 0 {
            self.budget = self.begin_next();
            if self.budget == 0 {
                return self.state();
            }
        }

        self.budget -= 1;
        self.cycles += 1;
        CpuState::Running
    }

    /// Finish the instruction in flight, then run exactly one more to completion.
    pub fn step(&mut self) -> CpuState {
        while self.budget > 0 {
            self.tick();
        }
        self.tick();
        while self.budget > 0 {
            self.tick();
        }
        self.state()
    }

    fn begin_next(&mut self) -> u32 {
        if self.reset_pending {
            self.reset_pending = false;
            self.service_reset();
            return INTERRUPT_CYCLES;
        }

        if self.bus.poll_nmi() {
            self.nmi_pending = true;
        }
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(NMI_VECTOR);
            return INTERRUPT_CYCLES;
        }

        if self.irq_line && !self.status.interrupt_disable {
            self.interrupt(IRQ_VECTOR);
            return INTERRUPT_CYCLES;
        }

        self.execute_next()
    }

    fn service_reset(&mut self) {
        // The reset sequence runs three stack reads, no writes.
        self.sp = self.sp.wrapping_sub(3);
        self.status.interrupt_disable = true;
        self.pc = self.read_word(RESET_VECTOR);
        info!("reset serviced, PC=${:04X}", self.pc);
    }

    /// NMI/IRQ entry: push PC and P (break clear), set I, jump through `vector`.
    fn interrupt(&mut self, vector: u16) {
        self.push_word(self.pc);
        self.push((self.status.bits() & !FLAG_BREAK) | FLAG_UNUSED);
        self.status.interrupt_disable = true;
        self.pc = self.read_word(vector);
        debug!("interrupt via ${:04X} -> PC=${:04X}", vector, self.pc);
    }

    fn execute_next(&mut self) -> u32 {
        let pc = self.pc;
        let opcode = self.bus.read(pc);

        let Some(ins) = self.table[opcode as usize] else {
            warn!("undefined instruction ${:02X} at ${:04X}, halting", opcode, pc);
            self.halt = Some(Halt { opcode, pc });
            return 0;
        };

        let mut operand = [0u8; 2];
        for (i, byte) in operand
            .iter_mut()
            .take(ins.mode.operand_len() as usize)
            .enumerate()
        {
            *byte = self.bus.read(pc.wrapping_add(1 + i as u16));
        }

        let record = self
            .observer
            .is_some()
            .then(|| self.record(pc, opcode, &ins, operand));

        self.pc = pc.wrapping_add(ins.byte_len());
        let (addr, page_crossed) = self.resolve(ins.mode, operand, pc);

        let mut cycles = ins.cycles as u32;
        if page_crossed && ins.op.reads_operand() {
            cycles += 1;
        }
        cycles += self.execute(ins.op, ins.mode, addr);

        if let (Some(record), Some(observer)) = (record, self.observer.as_mut()) {
            observer.on_step(&record);
        }

        cycles
    }

    fn record(&self, pc: u16, opcode: u8, ins: &Instruction, operand: [u8; 2]) -> StepRecord {
        StepRecord {
            pc,
            opcode,
            operand,
            operand_len: ins.mode.operand_len() as u8,
            mnemonic: ins.op.mnemonic(),
            a: self.a,
            x: self.x,
            y: self.y,
            p: self.status.bits(),
            sp: self.sp,
            cycles: self.cycles,
        }
    }

    /// Effective address for `mode` and whether indexing crossed a page.
    ///
    /// `self.pc` already points past the instruction.
    fn resolve(&mut self, mode: AddressingMode, operand: [u8; 2], pc: u16) -> (u16, bool) {
        use AddressingMode::*;

        let lo = operand[0];
        let word = u16::from_le_bytes(operand);

        match mode {
            Implicit | Accumulator => (0, false),
            Immediate => (pc.wrapping_add(1), false),
            ZeroPage => (lo as u16, false),
            ZeroPageX => (lo.wrapping_add(self.x) as u16, false),
            ZeroPageY => (lo.wrapping_add(self.y) as u16, false),
            Relative => (self.pc.wrapping_add(lo as i8 as u16), false),
            Absolute => (word, false),
            AbsoluteX => {
                let addr = word.wrapping_add(self.x as u16);
                (addr, page_differs(word, addr))
            }
            AbsoluteY => {
                let addr = word.wrapping_add(self.y as u16);
                (addr, page_differs(word, addr))
            }
            Indirect => {
                // JMP ($xxFF) takes its high byte from $xx00
                let hi_addr = (word & 0xFF00) | (word.wrapping_add(1) & 0x00FF);
                let lo = self.bus.read(word) as u16;
                let hi = self.bus.read(hi_addr) as u16;
                ((hi << 8) | lo, false)
            }
            IndexedIndirectX => (self.read_zero_page_word(lo.wrapping_add(self.x)), false),
            IndirectIndexedY => {
                let base = self.read_zero_page_word(lo);
                let addr = base.wrapping_add(self.y as u16);
                (addr, page_differs(base, addr))
            }
        }
    }

    /// Run `op` against `addr`. Returns extra cycles (branches only).
    fn execute(&mut self, op: Operation, mode: AddressingMode, addr: u16) -> u32 {
        use Operation::*;

        match op {
            Lda => {
                self.a = self.bus.read(addr);
                self.status.set_zn(self.a);
            }
            Ldx => {
                self.x = self.bus.read(addr);
                self.status.set_zn(self.x);
            }
            Ldy => {
                self.y = self.bus.read(addr);
                self.status.set_zn(self.y);
            }
            Sta => self.bus.write(addr, self.a),
            Stx => self.bus.write(addr, self.x),
            Sty => self.bus.write(addr, self.y),

            Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Txs => self.sp = self.x,
            Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
            }

            Pha => self.push(self.a),
            Php => self.push(self.status.bits() | FLAG_BREAK | FLAG_UNUSED),
            Pla => {
                self.a = self.pop();
                self.status.set_zn(self.a);
            }
            Plp => {
                let p = self.pop();
                self.pull_status(p);
            }

            And => {
                self.a &= self.bus.read(addr);
                self.status.set_zn(self.a);
            }
            Ora => {
                self.a |= self.bus.read(addr);
                self.status.set_zn(self.a);
            }
            Eor => {
                self.a ^= self.bus.read(addr);
                self.status.set_zn(self.a);
            }
            Bit => {
                let m = self.bus.read(addr);
                self.status.zero = self.a & m == 0;
                self.status.overflow = m & 0x40 != 0;
                self.status.negative = m & 0x80 != 0;
            }
            Adc => {
                let m = self.bus.read(addr);
                self.add(m);
            }
            Sbc => {
                let m = self.bus.read(addr);
                self.add(!m);
            }
            Cmp => {
                let m = self.bus.read(addr);
                self.compare(self.a, m);
            }
            Cpx => {
                let m = self.bus.read(addr);
                self.compare(self.x, m);
            }
            Cpy => {
                let m = self.bus.read(addr);
                self.compare(self.y, m);
            }

            Inc => {
                let r = self.modify(mode, addr, |_, v| v.wrapping_add(1));
                self.status.set_zn(r);
            }
            Dec => {
                let r = self.modify(mode, addr, |_, v| v.wrapping_sub(1));
                self.status.set_zn(r);
            }
            Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }

            Asl => {
                let r = self.modify(mode, addr, Self::asl);
                self.status.set_zn(r);
            }
            Lsr => {
                let r = self.modify(mode, addr, Self::lsr);
                self.status.set_zn(r);
            }
            Rol => {
                let r = self.modify(mode, addr, Self::rol);
                self.status.set_zn(r);
            }
            Ror => {
                let r = self.modify(mode, addr, Self::ror);
                self.status.set_zn(r);
            }

            Jmp => self.pc = addr,
            Jsr => {
                self.push_word(self.pc.wrapping_sub(1));
                self.pc = addr;
            }
            Rts => self.pc = self.pop_word().wrapping_add(1),
            Brk => {
                // return address skips the padding byte after BRK
                self.push_word(self.pc.wrapping_add(1));
                self.push(self.status.bits() | FLAG_BREAK | FLAG_UNUSED);
                self.status.interrupt_disable = true;
                self.pc = self.read_word(IRQ_VECTOR);
                debug!("BRK -> PC=${:04X}", self.pc);
            }
            Rti => {
                let p = self.pop();
                self.pull_status(p);
                self.pc = self.pop_word();
            }

            Bcc => return self.branch(!self.status.carry, addr),
            Bcs => return self.branch(self.status.carry, addr),
            Beq => return self.branch(self.status.zero, addr),
            Bne => return self.branch(!self.status.zero, addr),
            Bmi => return self.branch(self.status.negative, addr),
            Bpl => return self.branch(!self.status.negative, addr),
            Bvc => return self.branch(!self.status.overflow, addr),
            Bvs => return self.branch(self.status.overflow, addr),

            Clc => self.status.carry = false,
            Cld => self.status.decimal = false,
            Cli => self.status.interrupt_disable = false,
            Clv => self.status.overflow = false,
            Sec => self.status.carry = true,
            Sed => self.status.decimal = true,
            Sei => self.status.interrupt_disable = true,

            Nop | Skb => {}
            Ign => {
                self.bus.read(addr);
            }

            Lax => {
                let m = self.bus.read(addr);
                self.a = m;
                self.x = m;
                self.status.set_zn(m);
            }
            Sax => self.bus.write(addr, self.a & self.x),
            Dcp => {
                let r = self.modify(mode, addr, |_, v| v.wrapping_sub(1));
                self.compare(self.a, r);
            }
            Isc => {
                let r = self.modify(mode, addr, |_, v| v.wrapping_add(1));
                self.add(!r);
            }
            Slo => {
                let r = self.modify(mode, addr, Self::asl);
                self.a |= r;
                self.status.set_zn(self.a);
            }
            Rla => {
                let r = self.modify(mode, addr, Self::rol);
                self.a &= r;
                self.status.set_zn(self.a);
            }
            Sre => {
                let r = self.modify(mode, addr, Self::lsr);
                self.a ^= r;
                self.status.set_zn(self.a);
            }
            Rra => {
                let r = self.modify(mode, addr, Self::ror);
                self.add(r);
            }
            Alr => {
                let a = self.a & self.bus.read(addr);
                self.a = self.lsr(a);
                self.status.set_zn(self.a);
            }
            Anc => {
                self.a &= self.bus.read(addr);
                self.status.set_zn(self.a);
                self.status.carry = self.status.negative;
            }
            Arr => {
                self.a &= self.bus.read(addr);
                self.a = (self.a >> 1) | ((self.status.carry as u8) << 7);
                self.status.set_zn(self.a);
                let bit6 = self.a & 0x40 != 0;
                let bit5 = self.a & 0x20 != 0;
                self.status.carry = bit6;
                self.status.overflow = bit6 ^ bit5;
            }
            Axs => {
                let m = self.bus.read(addr);
                let ax = self.a & self.x;
                self.status.carry = ax >= m;
                self.x = ax.wrapping_sub(m);
                self.status.set_zn(self.x);
            }
        }

        0
    }

    /// A + m + C with carry and signed overflow. Decimal mode is ignored on the 2A03.
    fn add(&mut self, m: u8) {
        let sum = self.a as u16 + m as u16 + self.status.carry as u16;
        let result = sum as u8;

        self.status.carry = sum > 0xFF;
        self.status.overflow = (!(self.a ^ m) & (self.a ^ result) & 0x80) != 0;

        self.a = result;
        self.status.set_zn(self.a);
    }

    fn compare(&mut self, register: u8, m: u8) {
        self.status.carry = register >= m;
        self.status.set_zn(register.wrapping_sub(m));
    }

    fn branch(&mut self, condition: bool, target: u16) -> u32 {
        if !condition {
            return 0;
        }
        let extra = if page_differs(self.pc, target) { 2 } else { 1 };
        self.pc = target;
        extra
    }

    /// Read-modify-write on memory or, in accumulator mode, on A.
    fn modify(&mut self, mode: AddressingMode, addr: u16, f: fn(&mut Self, u8) -> u8) -> u8 {
        let value = if mode == AddressingMode::Accumulator {
            self.a
        } else {
            self.bus.read(addr)
        };

        let result = f(self, value);

        if mode == AddressingMode::Accumulator {
            self.a = result;
        } else {
            self.bus.write(addr, result);
        }
        result
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.status.carry = value & 0x80 != 0;
        value << 1
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.status.carry = value & 0x01 != 0;
        value >> 1
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = self.status.carry as u8;
        self.status.carry = value & 0x80 != 0;
        (value << 1) | carry_in
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = self.status.carry as u8;
        self.status.carry = value & 0x01 != 0;
        (value >> 1) | (carry_in << 7)
    }

    /// PLP/RTI: bits 4 and 5 of the pulled byte do not exist in the register.
    fn pull_status(&mut self, p: u8) {
        let brk = self.status.brk;
        self.status = Status::from_bits(p);
        self.status.brk = brk;
    }

    fn push(&mut self, data: u8) {
        self.bus.write(STACK_BASE | self.sp as u16, data);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.bus.read(STACK_BASE | self.sp as u16)
    }

    fn push_word(&mut self, data: u16) {
        self.push((data >> 8) as u8);
        self.push(data as u8);
    }

    fn pop_word(&mut self) -> u16 {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        (hi << 8) | lo
    }

    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.bus.read(addr) as u16;
        let hi = self.bus.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// 16-bit pointer from page zero; the high byte wraps to $00.
    fn read_zero_page_word(&mut self, ptr: u8) -> u16 {
        let lo = self.bus.read(ptr as u16) as u16;
        let hi = self.bus.read(ptr.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }
}

fn page_differs(a: u16, b: u16) -> bool {
    a & 0xFF00 != b & 0xFF00
}
