//! Frame-cadence spawning
//!
//! Cadence is deterministic (multiples of the frame counter); positions come
//! from the world's seeded RNG.

use glam::DVec2;
use rand::Rng;

use super::entity::{EntityId, distance};
use super::state::{SimError, Viewport, World};
use crate::tuning::Tuning;

/// What spawned on one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub antimatter: Option<EntityId>,
    pub chaser: Option<EntityId>,
    pub minder: Option<EntityId>,
}

impl SpawnReport {
    pub fn count(&self) -> usize {
        [self.antimatter, self.chaser, self.minder]
            .iter()
            .filter(|id| id.is_some())
            .count()
    }
}

/// Run the spawn policy for the world's current frame
pub fn run(world: &mut World) -> Result<SpawnReport, SimError> {
    let frame = world.frame;
    let player_pos = world.player()?.pos;
    let viewport = world.viewport;
    let tuning = &world.tuning;

    let antimatter_due = Tuning::is_due(frame, tuning.antimatter_spawn_period);
    let chaser_due = Tuning::is_due(frame, tuning.chaser_spawn_period);
    let minder_due =
        frame >= tuning.minder_first_frame && Tuning::is_due(frame, tuning.minder_spawn_period);
    let clearance = tuning.spawn_clearance;
    let attempts = tuning.max_spawn_attempts;

    let mut report = SpawnReport::default();

    if antimatter_due {
        let pos = central_point(&mut world.rng, viewport);
        report.antimatter = Some(world.spawn_antimatter(pos));
    }

    if chaser_due {
        let pos = point_clear_of(&mut world.rng, viewport, player_pos, clearance, attempts);
        report.chaser = Some(world.spawn_chaser(pos));
    }

    if minder_due {
        let pos = point_clear_of(&mut world.rng, viewport, player_pos, clearance, attempts);
        report.minder = Some(world.spawn_minder(pos));
    }

    if report.count() > 0 {
        log::debug!("Frame {}: spawned {:?}", frame, report);
    }

    Ok(report)
}

/// Uniform point in the central half of the viewport on each axis
pub fn central_point<R: Rng>(rng: &mut R, viewport: Viewport) -> DVec2 {
    DVec2::new(
        viewport.width / 4.0 + rng.random::<f64>() * viewport.width / 2.0,
        viewport.height / 4.0 + rng.random::<f64>() * viewport.height / 2.0,
    )
}

/// Uniform point anywhere in the viewport
pub fn any_point<R: Rng>(rng: &mut R, viewport: Viewport) -> DVec2 {
    DVec2::new(
        rng.random::<f64>() * viewport.width,
        rng.random::<f64>() * viewport.height,
    )
}

/// Rejection-sample a viewport point at least `clearance` from `avoid`.
///
/// Gives up after `max_attempts` re-rolls and keeps the last roll, so a
/// viewport too small for the clearance cannot stall the tick.
pub fn point_clear_of<R: Rng>(
    rng: &mut R,
    viewport: Viewport,
    avoid: DVec2,
    clearance: f64,
    max_attempts: u32,
) -> DVec2 {
    let mut pos = any_point(rng, viewport);
    let mut attempts = 0;
    while distance(pos, avoid) < clearance {
        if attempts >= max_attempts {
            log::debug!("Spawn clearance not met after {} re-rolls", attempts);
            break;
        }
        pos = any_point(rng, viewport);
        attempts += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::EntityKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_central_point_bounds() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let p = central_point(&mut rng, viewport());
            assert!((200.0..=600.0).contains(&p.x));
            assert!((150.0..=450.0).contains(&p.y));
        }
    }

    #[test]
    fn test_point_clear_of_respects_clearance() {
        let mut rng = Pcg32::seed_from_u64(2);
        let avoid = DVec2::new(400.0, 300.0);
        for _ in 0..1000 {
            let p = point_clear_of(&mut rng, viewport(), avoid, SPAWN_CLEARANCE, MAX_SPAWN_ATTEMPTS);
            assert!(distance(p, avoid) >= SPAWN_CLEARANCE);
        }
    }

    #[test]
    fn test_point_clear_of_gives_up_on_tiny_viewport() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tiny = Viewport::new(10.0, 10.0);
        let p = point_clear_of(&mut rng, tiny, DVec2::new(5.0, 5.0), SPAWN_CLEARANCE, 8);
        assert!(p.x < 10.0 && p.y < 10.0);
    }

    #[test]
    fn test_spawn_cadence_over_frames() {
        let mut world = World::new(42, viewport(), Tuning::default());
        let n: u64 = 2400;
        let (mut antimatter, mut chasers, mut minders) = (0u64, 0u64, 0u64);

        for frame in 1..=n {
            world.frame = frame;
            let report = run(&mut world).unwrap();
            antimatter += report.antimatter.is_some() as u64;
            chasers += report.chaser.is_some() as u64;
            minders += report.minder.is_some() as u64;
        }

        assert_eq!(antimatter, n / ANTIMATTER_SPAWN_PERIOD);
        assert_eq!(chasers, n / CHASER_SPAWN_PERIOD);
        assert_eq!(minders, n / MINDER_SPAWN_PERIOD);
        assert_eq!(world.antimatter.len() as u64, antimatter);
    }

    #[test]
    fn test_frame_zero_spawns_antimatter_and_chaser_only() {
        let mut world = World::new(5, viewport(), Tuning::default());
        let report = run(&mut world).unwrap();
        assert!(report.antimatter.is_some());
        assert!(report.chaser.is_some());
        assert!(report.minder.is_none());
    }

    #[test]
    fn test_first_minder_on_frame_600() {
        let mut world = World::new(9, viewport(), Tuning::default());
        world.frame = MINDER_FIRST_FRAME;
        let report = run(&mut world).unwrap();
        let id = report.minder.expect("minder spawns on frame 600");
        let minder = world.get(id).unwrap();
        assert!(matches!(minder.kind, EntityKind::Minder { .. }));
        // 600 is also a multiple of 50 but not of 80
        assert!(report.antimatter.is_some());
        assert!(report.chaser.is_none());
    }
}
