//! Headless NES core runner.
//!
//! Loads a cartridge and clocks the CPU for a number of frames, optionally printing a
//! nestest-style trace of every instruction.
//! Usage: famicore path/to/game.nes [--frames N] [--entry C000] [--trace | --log-trace]

use std::path::PathBuf;

use ansi_term::Colour::{Cyan, Green, Yellow};
use clap::Parser;
use log::{error, info};

use famicore::{
    config::ConsoleConfig,
    console::{Console, FrameOutcome},
    cpu::trace::{LogTracer, StepObserver, StepRecord},
    error::Result,
};

/// Headless NES CPU/bus runner
#[derive(Parser)]
#[command(name = "famicore")]
#[command(about = "Runs an iNES cartridge on the famicore CPU core", long_about = None)]
struct Args {
    /// Path to an iNES cartridge image (.nes)
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short = 'f', long, default_value = "60")]
    frames: u64,

    /// Start at this address (hex) instead of the reset vector, e.g. C000 for nestest
    #[arg(short = 'e', long, value_parser = parse_hex_u16)]
    entry: Option<u16>,

    /// Print every executed instruction
    #[arg(short = 't', long)]
    trace: bool,

    /// Send every executed instruction to the logger at trace level
    /// (target famicore::cpu::trace, adjustable through RUST_LOG)
    #[arg(long, conflicts_with = "trace")]
    log_trace: bool,
}

fn parse_hex_u16(s: &str) -> std::result::Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches('$');
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {s:?}: {e}"))
}

/// Colored trace lines on stdout.
struct ColorTrace;

impl StepObserver for ColorTrace {
    fn on_step(&mut self, record: &StepRecord) {
        let line = record.to_string();
        let (pc, rest) = line.split_at(4);
        let (regs, cycles) = rest.rsplit_once(" CYC:").unwrap_or((rest, ""));
        println!(
            "{}{} {}  {}",
            Green.paint(pc),
            regs,
            Cyan.paint(format!("CYC:{cycles}")),
            Yellow.bold().paint(record.mnemonic),
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::new();
    logger.filter_level(log::LevelFilter::Info);
    if args.log_trace {
        logger.filter_module("famicore::cpu::trace", log::LevelFilter::Trace);
    }
    logger.parse_default_env().init();

    let mut config = ConsoleConfig::default();
    if let Some(entry) = args.entry {
        config = config.with_entry_point(entry);
    }

    info!("loading {}", args.rom.display());
    let raw = std::fs::read(&args.rom)?;

    let mut console = Console::new(config);
    if let Err(e) = console.load_rom(raw) {
        error!("failed to load {}: {}", args.rom.display(), e);
        return Err(e);
    }

    if args.trace {
        console.cpu.set_observer(Box::new(ColorTrace));
    } else if args.log_trace {
        console.cpu.set_observer(Box::new(LogTracer));
    }

    match console.run_frames(args.frames) {
        FrameOutcome::Completed => {
            info!(
                "ran {} frame(s), {} cycles, PC=${:04X}",
                console.frame_count(),
                console.cpu.cycles,
                console.cpu.pc
            );
            Ok(())
        }
        FrameOutcome::Halted(halt) => {
            let cpu = &console.cpu;
            error!(
                "halted after {} frame(s): A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
                console.frame_count(),
                cpu.a,
                cpu.x,
                cpu.y,
                cpu.status.bits(),
                cpu.sp
            );
            Err(halt.into())
        }
    }
}
