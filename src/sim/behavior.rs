//! Per-kind movement rules
//!
//! Each rule mutates only its own entity's pose and state; deletion flags on
//! other entities are set through [`super::collision`].

use glam::DVec2;
use rand::Rng;

use super::collision::resolve_hostile;
use super::entity::{Entity, EntityKind, distance};
use super::state::{SimError, World};
use super::tick::TickInput;

/// Step the entity at `index` once.
///
/// The entity is copied out, stepped against the world, and written back, so
/// other entities can be flagged while it is being updated.
pub(crate) fn step_at(world: &mut World, index: usize, input: &TickInput) -> Result<(), SimError> {
    let player = *world.player()?;
    let mut entity = world.entities[index];

    match entity.kind {
        EntityKind::Player => step_player(world, &mut entity, input.pointer),
        EntityKind::Chaser { .. } => {
            step_chaser(world, &mut entity, player.pos);
            resolve_hostile(world, &mut entity, &player);
        }
        EntityKind::Minder { .. } => {
            step_minder(world, &mut entity, player.pos);
            resolve_hostile(world, &mut entity, &player);
        }
        EntityKind::Antimatter => step_antimatter(world, &mut entity, player.pos),
    }

    world.entities[index] = entity;
    Ok(())
}

/// Hide on the far side of the player from the pointer, with a shiver.
///
/// The X branch for a pointer on the right half subtracts an unscaled random
/// and a flat 15, unlike every other branch. Kept as is.
fn step_player(world: &mut World, player: &mut Entity, pointer: Option<DVec2>) {
    let Some(pointer) = pointer else {
        return;
    };
    let jitter = world.tuning.player_jitter;
    let (half_w, half_h) = (player.size.0 / 2.0, player.size.1 / 2.0);
    let center = world.viewport.center();

    let offset_y = if pointer.y < center.y {
        player.pos.y + half_h + world.rng.random::<f64>() * jitter
    } else {
        player.pos.y - half_h - world.rng.random::<f64>() * jitter
    };

    let offset_x = if pointer.x < center.x {
        player.pos.x + half_w + world.rng.random::<f64>() * jitter
    } else {
        player.pos.x - half_w - world.rng.random::<f64>() - jitter
    };

    let follow = world.tuning.player_follow;
    player.pos += (pointer - DVec2::new(offset_x, offset_y)) * follow;
    player.face(pointer);
}

/// Pure pursuit; the speed factor ramps every tick up to the cap.
fn step_chaser(world: &World, chaser: &mut Entity, player_pos: DVec2) {
    let EntityKind::Chaser { speed_factor } = &mut chaser.kind else {
        return;
    };
    *speed_factor = (*speed_factor * world.tuning.speed_ramp).min(world.tuning.chaser_speed_cap);
    let step = world.tuning.chaser_pursuit * *speed_factor;

    chaser.pos += (player_pos - chaser.pos) * step;
    chaser.face(player_pos);
}

/// Pursuit inside the activation radius only. The speed factor ramps after
/// each pursuing move and snaps back to 1 outside the radius.
fn step_minder(world: &World, minder: &mut Entity, player_pos: DVec2) {
    minder.face(player_pos);

    let in_range = distance(minder.pos, player_pos) < world.tuning.minder_radius;
    let EntityKind::Minder { speed_factor } = &mut minder.kind else {
        return;
    };

    if in_range {
        let step = world.tuning.minder_pursuit * *speed_factor;
        *speed_factor *= world.tuning.speed_ramp;
        minder.pos += (player_pos - minder.pos) * step;
    } else {
        *speed_factor = 1.0;
    }
}

/// Drift away from the player; despawn once well past a viewport edge.
fn step_antimatter(world: &World, antimatter: &mut Entity, player_pos: DVec2) {
    antimatter.pos -= (player_pos - antimatter.pos) * world.tuning.antimatter_drift;
    antimatter.face(player_pos);

    let viewport = world.viewport;
    if antimatter.is_offscreen(viewport.width, viewport.height, world.tuning.offscreen_margin) {
        antimatter.marked_for_deletion = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::facing_angle;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    fn world() -> World {
        let mut w = World::new(11, Viewport::new(800.0, 600.0), Tuning::default());
        w.start().unwrap();
        w
    }

    fn step_last(w: &mut World, input: &TickInput) -> Entity {
        let index = w.entities.len() - 1;
        step_at(w, index, input).unwrap();
        w.entities[index]
    }

    #[test]
    fn test_chaser_speed_ramp_is_capped_and_monotone() {
        let mut w = world();
        // Far away so it never reaches the player within the test
        w.spawn_chaser(DVec2::new(-1.0e9, -1.0e9));
        let input = TickInput::default();

        let mut previous = 1.0;
        for k in 1..=1000 {
            let chaser = step_last(&mut w, &input);
            let factor = chaser.kind.speed_factor().unwrap();
            let expected = SPEED_RAMP.powi(k).min(CHASER_SPEED_CAP);
            assert!((factor - expected).abs() < 1e-9 * expected, "tick {k}");
            assert!(factor >= previous);
            assert!(factor <= CHASER_SPEED_CAP);
            previous = factor;
        }
        assert_eq!(previous, CHASER_SPEED_CAP);
    }

    #[test]
    fn test_chaser_moves_toward_player() {
        let mut w = world();
        let player = w.player().unwrap().pos;
        let start = player + DVec2::new(200.0, 0.0);
        w.spawn_chaser(start);

        let chaser = step_last(&mut w, &TickInput::default());
        let expected = start + (player - start) * CHASER_PURSUIT * SPEED_RAMP;
        assert!((chaser.pos - expected).length() < 1e-9);
        assert_eq!(chaser.rotation, facing_angle(chaser.pos, player));
    }

    #[test]
    fn test_minder_idles_outside_radius() {
        let mut w = world();
        let player = w.player().unwrap().pos;
        let start = player + DVec2::new(MINDER_RADIUS + 10.0, 0.0);
        w.spawn_minder(start);

        let minder = step_last(&mut w, &TickInput::default());
        assert_eq!(minder.pos, start);
        assert_eq!(minder.kind.speed_factor(), Some(1.0));
        assert_eq!(minder.rotation, facing_angle(start, player));
    }

    #[test]
    fn test_minder_pursues_then_resets_momentum() {
        let mut w = world();
        let player = w.player().unwrap().pos;
        let start = player + DVec2::new(300.0, 0.0);
        w.spawn_minder(start);

        let minder = step_last(&mut w, &TickInput::default());
        // First pursuing move uses the unramped factor
        let expected = start + (player - start) * MINDER_PURSUIT;
        assert!((minder.pos - expected).length() < 1e-9);
        assert_eq!(minder.kind.speed_factor(), Some(SPEED_RAMP));

        // Teleport out of range: momentum resets
        let index = w.entities.len() - 1;
        w.entities[index].pos = player + DVec2::new(1000.0, 0.0);
        let minder = step_last(&mut w, &TickInput::default());
        assert_eq!(minder.kind.speed_factor(), Some(1.0));
    }

    #[test]
    fn test_antimatter_drifts_away_and_despawns_offscreen() {
        let mut w = world();
        let player = w.player().unwrap().pos;
        let start = player + DVec2::new(100.0, 0.0);
        w.spawn_antimatter(start);

        let am = step_last(&mut w, &TickInput::default());
        assert!(am.pos.x > start.x);
        assert!(!am.marked_for_deletion);

        let index = w.entities.len() - 1;
        w.entities[index].pos = DVec2::new(849.0, 300.0);
        let am = step_last(&mut w, &TickInput::default());
        assert!(am.pos.x > 850.0);
        assert!(am.marked_for_deletion);
    }

    #[test]
    fn test_player_holds_without_pointer() {
        let mut w = world();
        let before = *w.player().unwrap();
        step_at(&mut w, 0, &TickInput::default()).unwrap();
        assert_eq!(w.entities[0], before);
    }

    #[test]
    fn test_player_hides_from_pointer() {
        let mut w = world();
        let before = w.player().unwrap().pos;
        // Pointer in the top-left quadrant
        let pointer = DVec2::new(100.0, 100.0);
        step_at(&mut w, 0, &TickInput { pointer: Some(pointer) }).unwrap();
        let player = w.entities[0];

        // Offset lies below-right of the player, so the step heads up-left,
        // bounded by the jitter range
        let half = DVec2::new(ENTITY_SIZE.0 / 2.0, ENTITY_SIZE.1 / 2.0);
        let nearest = (pointer - (before + half)) * PLAYER_FOLLOW;
        let farthest = (pointer - (before + half + DVec2::splat(PLAYER_JITTER))) * PLAYER_FOLLOW;
        let delta = player.pos - before;
        assert!(delta.x <= nearest.x && delta.x >= farthest.x);
        assert!(delta.y <= nearest.y && delta.y >= farthest.y);
        assert_eq!(player.rotation, facing_angle(player.pos, pointer));
    }

    #[test]
    fn test_player_right_half_branch_is_asymmetric() {
        let mut w = world();
        let before = w.player().unwrap().pos;
        // Pointer straight right of the player, below the centre line
        let pointer = DVec2::new(700.0, 300.0);
        step_at(&mut w, 0, &TickInput { pointer: Some(pointer) }).unwrap();
        let delta = w.entities[0].pos - before;

        // offset_x = x - w/2 - rand - 15 with rand in [0, 1)
        let half_w = ENTITY_SIZE.0 / 2.0;
        let max = (pointer.x - (before.x - half_w - 1.0 - PLAYER_JITTER)) * PLAYER_FOLLOW;
        let min = (pointer.x - (before.x - half_w - PLAYER_JITTER)) * PLAYER_FOLLOW;
        assert!(delta.x >= min && delta.x <= max, "dx {} not in [{min}, {max}]", delta.x);
    }
}
