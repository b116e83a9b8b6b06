//! Timed visual effects
//!
//! A ripple is a snapshot (position, colour, radius, repetitions left). It is
//! advanced by render time and never looks back into the simulation.

use glam::DVec2;

use crate::consts::{RIPPLE_DELAY_MS, RIPPLE_GROWTH, RIPPLE_START_RADIUS};
use crate::sim::Color;

/// Explosion ripple: a filled circle redrawn `remaining` more times,
/// growing each repetition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub at: DVec2,
    pub color: Color,
    pub radius: f64,
    pub remaining: u32,
    /// When the next repetition is due; `None` means on the next frame
    pub next_due_ms: Option<f64>,
}

impl Ripple {
    pub fn new(at: DVec2, color: Color, repetitions: u32) -> Self {
        Self {
            at,
            color,
            radius: RIPPLE_START_RADIUS,
            remaining: repetitions,
            next_due_ms: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Collect the radii of every repetition due by `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> Vec<f64> {
        let mut drawn = Vec::new();
        while self.remaining > 0 {
            let due = self.next_due_ms.unwrap_or(now_ms);
            if due > now_ms {
                break;
            }
            drawn.push(self.radius);
            self.radius *= RIPPLE_GROWTH;
            self.remaining -= 1;
            self.next_due_ms = Some(due + RIPPLE_DELAY_MS);
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_repetition_is_immediate() {
        let mut r = Ripple::new(DVec2::ZERO, Color::CHASER, 3);
        assert_eq!(r.advance(1000.0), vec![RIPPLE_START_RADIUS]);
        assert_eq!(r.remaining, 2);
        assert_eq!(r.next_due_ms, Some(1000.0 + RIPPLE_DELAY_MS));
    }

    #[test]
    fn test_repetitions_grow_and_expire() {
        let mut r = Ripple::new(DVec2::ZERO, Color::MINDER, 4);
        let mut radii = r.advance(0.0);
        radii.extend(r.advance(10.0));
        radii.extend(r.advance(20.0));
        // A long frame catches up on everything that fell due
        radii.extend(r.advance(100.0));
        assert_eq!(radii.len(), 4);
        assert!(r.is_finished());
        for pair in radii.windows(2) {
            assert!((pair[1] - pair[0] * RIPPLE_GROWTH).abs() < 1e-9);
        }
        assert!(r.advance(500.0).is_empty());
    }
}
