//! Once-a-second debug readout

use std::fmt;

use crate::sim::World;

/// Heading shown above the readout
pub const TITLE: &str = "Steer the red and orange into the blue, keep them off the green";

/// Snapshot taken on each diagnostics interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsReadout {
    /// Frames presented since the previous sample
    pub fps: u32,
    pub entities: usize,
    pub frame: u64,
    pub draw_count: usize,
    pub lives: i32,
    pub chasers_killed: u64,
    pub minders_killed: u64,
}

impl DiagnosticsReadout {
    /// One line per counter, in panel order
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("{} FPS", self.fps),
            format!("{} entities", self.entities),
            format!("{} frame", self.frame),
            format!("{} draw count", self.draw_count),
            format!("{} lives", self.lives),
            format!("{} chasers killed", self.chasers_killed),
            format!("{} minders killed", self.minders_killed),
        ]
    }
}

impl fmt::Display for DiagnosticsReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join(" | "))
    }
}

/// Frame counter between samples
#[derive(Debug, Default)]
pub struct Diagnostics {
    frames: u32,
    draw_count: usize,
    last: Option<DiagnosticsReadout>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one presented frame
    pub fn record_frame(&mut self, draw_count: usize) {
        self.frames += 1;
        self.draw_count = draw_count;
    }

    /// Read the counters and reset the FPS count
    pub fn sample(&mut self, world: Option<&World>) -> DiagnosticsReadout {
        let mut readout = DiagnosticsReadout {
            fps: self.frames,
            draw_count: self.draw_count,
            ..Default::default()
        };
        if let Some(world) = world {
            readout.entities = world.entities.len();
            readout.frame = world.frame;
            readout.lives = world.lives;
            readout.chasers_killed = world.statistics.chasers_killed;
            readout.minders_killed = world.statistics.minders_killed;
        }
        self.frames = 0;
        self.last = Some(readout);
        readout
    }

    /// Most recent sample, if any
    pub fn last(&self) -> Option<&DiagnosticsReadout> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Viewport;
    use crate::tuning::Tuning;

    #[test]
    fn test_sample_resets_fps() {
        let mut d = Diagnostics::new();
        for _ in 0..60 {
            d.record_frame(5);
        }
        let world = World::new(1, Viewport::new(800.0, 600.0), Tuning::default());
        let r = d.sample(Some(&world));
        assert_eq!(r.fps, 60);
        assert_eq!(r.draw_count, 5);
        assert_eq!(r.entities, 1);
        assert_eq!(r.lives, 3);
        assert_eq!(d.sample(None).fps, 0);
    }

    #[test]
    fn test_readout_lines() {
        let r = DiagnosticsReadout {
            fps: 59,
            lives: 2,
            ..Default::default()
        };
        let lines = r.lines();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "59 FPS");
        assert_eq!(lines[4], "2 lives");
    }
}
