//! Hostile collision resolution
//!
//! Collisions are detected from the hostile's side: chasers and minders check
//! the player and every antimatter handle after moving. Antimatter never
//! checks anything itself.

use super::entity::{Entity, EntityKind};
use super::state::{GameEvent, GamePhase, World};

/// What a hostile's collision pass did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// The hostile reached the player
    pub hit_player: bool,
    /// Antimatter entities destroyed alongside the hostile
    pub antimatter_destroyed: u32,
}

/// Resolve `hostile` against the player and all antimatter.
///
/// `hostile` has been copied out of the world, so it is updated in place and
/// written back by the caller. Lives and statistics stop changing once the
/// world is in [`GamePhase::GameOver`]; effects are still emitted.
pub fn resolve_hostile(world: &mut World, hostile: &mut Entity, player: &Entity) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let scoring = world.phase != GamePhase::GameOver;

    if hostile.collides_with(player, world.tuning.player_hit_threshold) {
        hostile.marked_for_deletion = true;
        if scoring {
            world.lives -= 1;
        }
        outcome.hit_player = true;
        world.push_event(GameEvent::ScreenFlash {
            color: hostile.appearance,
        });
        log::debug!("{} {:?} hit the player, lives={}", hostile.kind.name(), hostile.id, world.lives);
    }

    let ripples = match hostile.kind {
        EntityKind::Minder { .. } => world.tuning.minder_ripples,
        _ => world.tuning.chaser_ripples,
    };
    let threshold = world.tuning.antimatter_hit_threshold;

    for slot in 0..world.antimatter.len() {
        let id = world.antimatter[slot];
        let Some(target) = world.entities.iter_mut().find(|e| e.id == id) else {
            continue;
        };
        if !hostile.collides_with(target, threshold) {
            continue;
        }

        hostile.marked_for_deletion = true;
        target.marked_for_deletion = true;
        outcome.antimatter_destroyed += 1;

        if scoring {
            match hostile.kind {
                EntityKind::Minder { .. } => world.statistics.minders_killed += 1,
                _ => world.statistics.chasers_killed += 1,
            }
        }
        world.push_event(GameEvent::Explosion {
            at: hostile.pos,
            color: hostile.appearance,
            ripples,
        });
        log::debug!("{} {:?} destroyed by antimatter {:?}", hostile.kind.name(), hostile.id, id);
    }

    outcome
}
