//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - One tick per scheduled frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (collection order, survivors keep their order)

pub mod behavior;
pub mod collision;
pub mod entity;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, resolve_hostile};
pub use entity::{Color, Entity, EntityId, EntityKind, distance, facing_angle, is_offscreen};
pub use spawn::SpawnReport;
pub use state::{
    GameEvent, GamePhase, RenderRecord, SimError, Statistics, Viewport, World,
};
pub use tick::{TickInput, step_entity, tick};
