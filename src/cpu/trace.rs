//! Per-instruction trace records and the sinks that consume them.
//!
//! The engine never writes trace output itself. When a [`StepObserver`] is installed it is
//! handed one [`StepRecord`] per executed instruction, captured before the instruction ran,
//! which is the layout nestest logs use.

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use log::trace;

/// Register snapshot plus the instruction bytes at `pc`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRecord {
    pub pc: u16,
    pub opcode: u8,
    pub operand: [u8; 2],
    /// Operand bytes actually used (0-2).
    pub operand_len: u8,
    pub mnemonic: &'static str,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
    pub cycles: u64,
}

impl StepRecord {
    /// Opcode followed by its operand bytes.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode];
        bytes.extend_from_slice(&self.operand[..self.operand_len as usize]);
        bytes
    }
}

impl fmt::Display for StepRecord {
    /// `C000  4C F5 C5  A:00 X:00 Y:00 P:24 SP:FD CYC:7`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self
            .bytes()
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "{:04X}  {:<8}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.pc, bytes, self.a, self.x, self.y, self.p, self.sp, self.cycles
        )
    }
}

/// Sink called by the CPU after each instruction.
pub trait StepObserver {
    fn on_step(&mut self, record: &StepRecord);
}

/// Forwards every record to `log::trace!`.
#[derive(Default)]
pub struct LogTracer;

impl StepObserver for LogTracer {
    fn on_step(&mut self, record: &StepRecord) {
        trace!(target: "famicore::cpu::trace", "{record}");
    }
}

/// Keeps the most recent records in memory.
///
/// Clones share the same buffer, so one handle can be boxed into the CPU while another is kept
/// for inspection.
#[derive(Clone)]
pub struct TraceBuffer {
    records: Rc<RefCell<VecDeque<StepRecord>>>,
    capacity: usize,
}

impl TraceBuffer {
    /// Buffer that keeps every record.
    pub fn new() -> Self {
        Self::with_capacity(usize::MAX)
    }

    /// Buffer that keeps only the last `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Rc::new(RefCell::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn records(&self) -> Vec<StepRecord> {
        self.records.borrow().iter().copied().collect()
    }

    /// Records rendered as nestest log lines.
    pub fn lines(&self) -> Vec<String> {
        self.records.borrow().iter().map(|r| r.to_string()).collect()
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepObserver for TraceBuffer {
    fn on_step(&mut self, record: &StepRecord) {
        let mut records = self.records.borrow_mut();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(*record);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use log::{LevelFilter, Log, Metadata, Record};

    use super::*;

    fn record(pc: u16) -> StepRecord {
        StepRecord {
            pc,
            opcode: 0x4C,
            operand: [0xF5, 0xC5],
            operand_len: 2,
            mnemonic: "JMP",
            a: 0,
            x: 0,
            y: 0,
            p: 0x24,
            sp: 0xFD,
            cycles: 7,
        }
    }

    #[test]
    fn display_matches_nestest_layout() {
        assert_eq!(
            record(0xC000).to_string(),
            "C000  4C F5 C5  A:00 X:00 Y:00 P:24 SP:FD CYC:7"
        );
    }

    #[test]
    fn short_instructions_are_padded() {
        let mut r = record(0xC5F5);
        r.opcode = 0xA2;
        r.operand_len = 1;
        r.operand = [0x00, 0x00];
        assert_eq!(
            r.to_string(),
            "C5F5  A2 00     A:00 X:00 Y:00 P:24 SP:FD CYC:7"
        );
    }

    struct Capture;

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

    impl Log for Capture {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.target() == "famicore::cpu::trace"
        }

        fn log(&self, record: &Record<'_>) {
            if self.enabled(record.metadata()) {
                CAPTURED.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture;

    #[test]
    fn log_tracer_emits_nestest_lines() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Trace);

        let line = record(0xC000).to_string();
        LogTracer.on_step(&record(0xC000));
        assert!(CAPTURED.lock().unwrap().contains(&line));
    }

    #[test]
    fn bounded_buffer_drops_oldest() {
        let mut buffer = TraceBuffer::with_capacity(2);
        let handle = buffer.clone();
        for pc in [1, 2, 3] {
            buffer.on_step(&record(pc));
        }
        let pcs: Vec<u16> = handle.records().iter().map(|r| r.pc).collect();
        assert_eq!(pcs, vec![2, 3]);
    }
}
