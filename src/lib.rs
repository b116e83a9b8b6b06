//! Antimatter - a 2D arcade evasion game
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, loss condition)
//! - `session`: Session lifecycle and the frame-driven loop
//! - `renderer`: Render contract, effect batching and the WebGPU pipeline
//! - `platform`: Frame scheduling abstraction
//! - `tuning`: Data-driven game balance
//! - `settings`: Visual preferences
//! - `ui`: Menu hooks and game-over text
//! - `diagnostics`: Once-a-second debug readout

pub mod diagnostics;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use session::{Session, SessionError};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Lives at session start
    pub const STARTING_LIVES: i32 = 3;

    /// Spawn cadence in frames
    pub const ANTIMATTER_SPAWN_PERIOD: u64 = 50;
    pub const CHASER_SPAWN_PERIOD: u64 = 80;
    pub const MINDER_SPAWN_PERIOD: u64 = 600;
    /// First frame on which a minder may appear
    pub const MINDER_FIRST_FRAME: u64 = 600;
    /// Hostiles never spawn closer than this to the player
    pub const SPAWN_CLEARANCE: f64 = 100.0;
    /// Re-roll limit for the clearance rule
    pub const MAX_SPAWN_ATTEMPTS: u32 = 64;

    /// Fraction of the pointer offset the player covers per tick
    pub const PLAYER_FOLLOW: f64 = 0.1;
    /// Maximum random "shiver" added to the player's hiding offset
    pub const PLAYER_JITTER: f64 = 15.0;

    /// Chaser pursuit fraction (scaled by speed factor)
    pub const CHASER_PURSUIT: f64 = 0.01;
    /// Per-tick speed factor growth while pursuing
    pub const SPEED_RAMP: f64 = 1.005;
    pub const CHASER_SPEED_CAP: f64 = 17.0;

    /// Minder pursuit fraction (scaled by speed factor)
    pub const MINDER_PURSUIT: f64 = 0.05;
    /// Minders only chase inside this radius
    pub const MINDER_RADIUS: f64 = 350.0;

    /// Antimatter drifts away from the player by this fraction per tick
    pub const ANTIMATTER_DRIFT: f64 = 0.008;
    /// Distance past the viewport edge before something counts as off-screen
    pub const OFFSCREEN_MARGIN: f64 = 50.0;

    /// Collision thresholds
    pub const DEFAULT_COLLISION_THRESHOLD: f64 = 20.0;
    pub const PLAYER_HIT_THRESHOLD: f64 = 15.0;
    pub const ANTIMATTER_HIT_THRESHOLD: f64 = 25.0;

    /// Explosion ripple repetitions
    pub const CHASER_RIPPLES: u32 = 3;
    pub const MINDER_RIPPLES: u32 = 4;
    pub const RIPPLE_START_RADIUS: f64 = 25.0;
    pub const RIPPLE_GROWTH: f64 = 1.1;
    pub const RIPPLE_DELAY_MS: f64 = 20.0;

    /// Entity footprints (width, height)
    pub const ENTITY_SIZE: (f64, f64) = (20.0, 15.0);
    pub const MINDER_SIZE: (f64, f64) = (10.0, 30.0);

    /// Diagnostics readout period
    pub const DIAGNOSTICS_PERIOD_MS: u32 = 1000;
}
