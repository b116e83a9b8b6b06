//! Simulation tick
//!
//! One tick: advance the frame counter, spawn, step every entity once,
//! clean up, then check the loss condition.

use glam::DVec2;

use super::behavior::step_at;
use super::entity::EntityId;
use super::spawn;
use super::state::{GameEvent, GamePhase, SimError, World};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Last known pointer position (None until the first sample arrives)
    pub pointer: Option<DVec2>,
}

/// Advance the world by one tick. A paused world is left untouched.
pub fn tick(world: &mut World, input: &TickInput) -> Result<(), SimError> {
    if world.phase == GamePhase::Paused {
        return Ok(());
    }
    world.player()?;

    world.frame += 1;
    spawn::run(world)?;

    // Entities spawned above are stepped this tick; nothing is added while stepping
    for index in 0..world.entities.len() {
        step_at(world, index, input)?;
    }

    world.cleanup();
    check_loss(world);
    Ok(())
}

/// Step a single entity by handle, outside the regular tick
pub fn step_entity(world: &mut World, id: EntityId, input: &TickInput) -> Result<(), SimError> {
    let index = world.index_of(id).ok_or(SimError::UnknownEntity(id))?;
    step_at(world, index, input)
}

/// One-shot transition to game over once lives run out
fn check_loss(world: &mut World) {
    if world.phase == GamePhase::GameOver || world.lives > 0 {
        return;
    }
    world.phase = GamePhase::GameOver;
    let statistics = world.statistics;
    log::info!(
        "Game over at frame {} ({} chasers, {} minders killed)",
        world.frame,
        statistics.chasers_killed,
        statistics.minders_killed
    );
    world.push_event(GameEvent::GameOver {
        frame: world.frame,
        statistics,
    });
}
