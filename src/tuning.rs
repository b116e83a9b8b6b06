//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_lives: i32,

    // === Spawning ===
    pub antimatter_spawn_period: u64,
    pub chaser_spawn_period: u64,
    pub minder_spawn_period: u64,
    pub minder_first_frame: u64,
    pub spawn_clearance: f64,
    pub max_spawn_attempts: u32,

    // === Player ===
    pub player_follow: f64,
    pub player_jitter: f64,

    // === Hostiles ===
    pub chaser_pursuit: f64,
    pub speed_ramp: f64,
    pub chaser_speed_cap: f64,
    pub minder_pursuit: f64,
    pub minder_radius: f64,

    // === Antimatter ===
    pub antimatter_drift: f64,
    pub offscreen_margin: f64,

    // === Collisions ===
    pub player_hit_threshold: f64,
    pub antimatter_hit_threshold: f64,
    pub chaser_ripples: u32,
    pub minder_ripples: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,

            antimatter_spawn_period: ANTIMATTER_SPAWN_PERIOD,
            chaser_spawn_period: CHASER_SPAWN_PERIOD,
            minder_spawn_period: MINDER_SPAWN_PERIOD,
            minder_first_frame: MINDER_FIRST_FRAME,
            spawn_clearance: SPAWN_CLEARANCE,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,

            player_follow: PLAYER_FOLLOW,
            player_jitter: PLAYER_JITTER,

            chaser_pursuit: CHASER_PURSUIT,
            speed_ramp: SPEED_RAMP,
            chaser_speed_cap: CHASER_SPEED_CAP,
            minder_pursuit: MINDER_PURSUIT,
            minder_radius: MINDER_RADIUS,

            antimatter_drift: ANTIMATTER_DRIFT,
            offscreen_margin: OFFSCREEN_MARGIN,

            player_hit_threshold: PLAYER_HIT_THRESHOLD,
            antimatter_hit_threshold: ANTIMATTER_HIT_THRESHOLD,
            chaser_ripples: CHASER_RIPPLES,
            minder_ripples: MINDER_RIPPLES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning: lives={}, chaser cap={}, minder radius={}",
            tuning.starting_lives,
            tuning.chaser_speed_cap,
            tuning.minder_radius
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether a spawn with the given period is due on `frame`
    #[inline]
    pub fn is_due(frame: u64, period: u64) -> bool {
        period != 0 && frame % period == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 5, "minder_radius": 250.0 }"#)
            .expect("valid json");
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.minder_radius, 250.0);
        assert_eq!(tuning.chaser_speed_cap, CHASER_SPEED_CAP);
        assert_eq!(tuning.antimatter_spawn_period, ANTIMATTER_SPAWN_PERIOD);
    }

    #[test]
    fn test_json_round_trip() {
        let mut tuning = Tuning::default();
        tuning.chaser_ripples = 7;
        let json = tuning.to_json().expect("serializable");
        assert_eq!(Tuning::from_json(&json).expect("parses"), tuning);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ starting_lives: }").is_err());
    }

    #[test]
    fn test_is_due() {
        assert!(Tuning::is_due(0, 50));
        assert!(Tuning::is_due(100, 50));
        assert!(!Tuning::is_due(101, 50));
        // A zero period disables the spawner instead of dividing by zero
        assert!(!Tuning::is_due(100, 0));
    }
}
