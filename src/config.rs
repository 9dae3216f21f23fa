//! Frame timing and boot options for [`crate::console::Console`].

/// NTSC CPU clock (1.789773 MHz) over 60 frames.
pub const NTSC_CYCLES_PER_FRAME: u32 = 29_829;

/// About 20 scanlines of VBlank at 113.67 CPU cycles per line.
pub const NTSC_VBLANK_CYCLES: u32 = 2_273;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// CPU cycles in one frame.
    pub cycles_per_frame: u32,
    /// VBlank is raised this many cycles before the end of each frame.
    pub vblank_cycles: u32,
    /// Start here instead of at the reset vector (nestest automation starts at $C000).
    pub entry_point: Option<u16>,
}

impl ConsoleConfig {
    pub fn with_entry_point(mut self, entry_point: u16) -> Self {
        self.entry_point = Some(entry_point);
        self
    }

    /// Cycle within a frame at which VBlank begins.
    pub fn vblank_start(&self) -> u32 {
        self.cycles_per_frame.saturating_sub(self.vblank_cycles)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            cycles_per_frame: NTSC_CYCLES_PER_FRAME,
            vblank_cycles: NTSC_VBLANK_CYCLES,
            entry_point: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vblank_starts_before_frame_end() {
        let config = ConsoleConfig::default();
        assert_eq!(config.vblank_start(), 29_829 - 2_273);
    }

    #[test]
    fn oversized_vblank_starts_at_frame_start() {
        let config = ConsoleConfig {
            cycles_per_frame: 100,
            vblank_cycles: 500,
            entry_point: None,
        };
        assert_eq!(config.vblank_start(), 0);
    }
}
