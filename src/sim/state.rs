//! World state and core simulation types
//!
//! The world owns every live entity, the antimatter handle list, counters
//! and the event queue the session drains after each tick.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Color, Entity, EntityId};
use crate::tuning::Tuning;

/// Contract violations inside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("world has no player entity")]
    MissingPlayer,
    #[error("entity {0:?} is not part of this world")]
    UnknownEntity(EntityId),
    #[error("world was already started")]
    AlreadyStarted,
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not ticking (before start, or paused)
    Paused,
    /// Active gameplay
    Running,
    /// Lives ran out; entities keep moving but the score is frozen
    GameOver,
}

/// Kill counters reported at game over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub chasers_killed: u64,
    pub minders_killed: u64,
}

/// Size of the play area in screen units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Side effects a tick asks the outside world to perform
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A hostile reached the player
    ScreenFlash { color: Color },
    /// A hostile hit antimatter
    Explosion { at: DVec2, color: Color, ripples: u32 },
    /// Lives ran out (emitted once per world)
    GameOver { frame: u64, statistics: Statistics },
}

/// Pose and appearance handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRecord {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl From<&Entity> for RenderRecord {
    fn from(entity: &Entity) -> Self {
        Self {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            width: entity.size.0,
            height: entity.size.1,
            color: entity.appearance,
        }
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    /// Balance numbers for this session
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// All live entities, in insertion order
    pub entities: Vec<Entity>,
    /// Handles of live antimatter (subset of `entities`)
    pub antimatter: Vec<EntityId>,
    /// Ticks since start
    pub frame: u64,
    pub lives: i32,
    pub statistics: Statistics,
    pub phase: GamePhase,
    /// Seed the RNG was built from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    player: EntityId,
    started: bool,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Create a paused world with the player at the viewport centre
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let lives = tuning.starting_lives;
        let mut world = Self {
            tuning,
            viewport,
            entities: Vec::new(),
            antimatter: Vec::new(),
            frame: 0,
            lives,
            statistics: Statistics::default(),
            phase: GamePhase::Paused,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: EntityId(0),
            started: false,
            events: Vec::new(),
            next_id: 1,
        };

        let id = world.next_entity_id();
        world.entities.push(Entity::player(id, viewport.center()));
        world.player = id;

        world
    }

    /// Reset counters and begin running. Rejected once the world has started.
    pub fn start(&mut self) -> Result<(), SimError> {
        if self.started {
            return Err(SimError::AlreadyStarted);
        }
        self.started = true;
        self.frame = 0;
        self.lives = self.tuning.starting_lives;
        self.statistics = Statistics::default();
        self.phase = GamePhase::Running;
        log::info!("World started (seed {}, lives {})", self.seed, self.lives);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Running -> Paused. Returns whether the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            true
        } else {
            false
        }
    }

    /// Paused -> Running for a started world. Returns whether the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.started && self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            true
        } else {
            false
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn player(&self) -> Result<&Entity, SimError> {
        self.get(self.player).ok_or(SimError::MissingPlayer)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn spawn_antimatter(&mut self, pos: DVec2) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity::antimatter(id, pos));
        self.antimatter.push(id);
        id
    }

    pub fn spawn_chaser(&mut self, pos: DVec2) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity::chaser(id, pos));
        id
    }

    pub fn spawn_minder(&mut self, pos: DVec2) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity::minder(id, pos));
        id
    }

    /// Mark an entity by handle
    pub fn mark_for_deletion(&mut self, id: EntityId) -> Result<(), SimError> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(SimError::UnknownEntity(id))?;
        entity.marked_for_deletion = true;
        Ok(())
    }

    /// Drop marked entities from the main collection and, independently,
    /// from the antimatter list. Survivors keep their relative order.
    /// Returns how many entities were removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.marked_for_deletion);
        let entities = &self.entities;
        self.antimatter
            .retain(|id| entities.iter().any(|e| e.id == *id));
        before - self.entities.len()
    }

    /// Resize the play area (applied between ticks)
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// Pose of every live entity, in collection order
    pub fn render_list(&self) -> Vec<RenderRecord> {
        self.entities.iter().map(RenderRecord::from).collect()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
