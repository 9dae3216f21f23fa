//! Frame driver: owns the CPU (which owns the bus) and clocks it one frame at a time.

use log::{info, warn};

use crate::{
    bus::NesBus,
    cartridge::cartridge::Cartridge,
    config::ConsoleConfig,
    cpu::cpu::{CPU, CpuState, Halt},
    error::Result,
};

/// How a frame ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Completed,
    /// The engine stopped on an undefined opcode part-way through the frame.
    Halted(Halt),
}

pub struct Console {
    pub cpu: CPU<NesBus>,
    config: ConsoleConfig,
    cartridge: Option<Cartridge>,
    frames: u64,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            cpu: CPU::new(NesBus::new()),
            config,
            cartridge: None,
            frames: 0,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn bus(&self) -> &NesBus {
        &self.cpu.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.cpu.bus
    }

    /// Frames completed since the last load or power cycle.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Parse `raw`, wipe both address spaces, project the cartridge and power on.
    ///
    /// On error the previous session is left untouched.
    pub fn load_rom(&mut self, raw: Vec<u8>) -> Result<()> {
        let cartridge = Cartridge::load_rom(raw)?;
        self.cartridge = Some(cartridge);
        self.power_cycle();
        Ok(())
    }

    /// Fresh session: clear memory, re-project the cartridge, power-on reset the CPU.
    pub fn power_cycle(&mut self) {
        self.cpu.bus.power_cycle();
        if let Some(cartridge) = &self.cartridge {
            cartridge.project(self.cpu.bus.spaces());
        }

        self.cpu.reset();
        if let Some(entry) = self.config.entry_point {
            info!("entry point override: ${:04X}", entry);
            self.cpu.pc = entry;
        }
        self.frames = 0;
    }

    /// Warm reset: PPU registers cleared, CPU reset latched for the next instruction boundary.
    /// Memory is kept.
    pub fn reset(&mut self) {
        self.cpu.bus.ppu.reset();
        self.cpu.request_reset();
    }

    /// Clock one frame's worth of CPU cycles.
    ///
    /// VBlank clears at the start of the frame and is raised `vblank_cycles` before its end,
    /// which requests an NMI if the program enabled it.
    pub fn run_frame(&mut self) -> FrameOutcome {
        let vblank_start = self.config.vblank_start();
        self.cpu.bus.ppu.end_vblank();

        for cycle in 0..self.config.cycles_per_frame {
            if cycle == vblank_start {
                self.cpu.bus.ppu.begin_vblank();
            }
            if let CpuState::Halted(halt) = self.cpu.tick() {
                warn!(
                    "frame {} stopped: undefined instruction ${:02X} at ${:04X}",
                    self.frames, halt.opcode, halt.pc
                );
                return FrameOutcome::Halted(halt);
            }
        }

        self.frames += 1;
        FrameOutcome::Completed
    }

    /// Run up to `count` frames, stopping early on a halt.
    pub fn run_frames(&mut self, count: u64) -> FrameOutcome {
        for _ in 0..count {
            if let outcome @ FrameOutcome::Halted(_) = self.run_frame() {
                return outcome;
            }
        }
        FrameOutcome::Completed
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}
