//! Entities and the geometry they share
//!
//! Screen coordinates: x grows right, y grows down. Facing angles are
//! measured from the vertical (see [`facing_angle`]).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ENTITY_SIZE, MINDER_SIZE};

/// Stable handle for an entity within one world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Flat RGB colour; identifies an entity's kind to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const PLAYER: Color = Color::rgb(143, 199, 60);
    pub const CHASER: Color = Color::rgb(217, 65, 30);
    pub const MINDER: Color = Color::rgb(243, 156, 18);
    pub const ANTIMATTER: Color = Color::rgb(52, 152, 219);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for GPU vertices
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

/// Per-kind behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Hides from the pointer
    Player,
    /// Pure pursuit with a ramping, capped speed factor
    Chaser { speed_factor: f64 },
    /// Pursuit inside an activation radius; momentum resets outside it
    Minder { speed_factor: f64 },
    /// Drifts away from the player; kills hostiles that touch it
    Antimatter,
}

impl EntityKind {
    pub fn is_hostile(&self) -> bool {
        matches!(self, EntityKind::Chaser { .. } | EntityKind::Minder { .. })
    }

    pub fn is_antimatter(&self) -> bool {
        matches!(self, EntityKind::Antimatter)
    }

    pub fn speed_factor(&self) -> Option<f64> {
        match *self {
            EntityKind::Chaser { speed_factor } | EntityKind::Minder { speed_factor } => {
                Some(speed_factor)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Chaser { .. } => "chaser",
            EntityKind::Minder { .. } => "minder",
            EntityKind::Antimatter => "antimatter",
        }
    }
}

/// A simulated actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: DVec2,
    /// Facing angle (radians from vertical)
    pub rotation: f64,
    /// Render footprint (width, height)
    pub size: (f64, f64),
    pub appearance: Color,
    /// Set once; consumed by the cleanup pass at the end of the tick
    pub marked_for_deletion: bool,
}

impl Entity {
    fn with_kind(id: EntityId, kind: EntityKind, pos: DVec2) -> Self {
        let (size, appearance) = match kind {
            EntityKind::Player => (ENTITY_SIZE, Color::PLAYER),
            EntityKind::Chaser { .. } => (ENTITY_SIZE, Color::CHASER),
            EntityKind::Minder { .. } => (MINDER_SIZE, Color::MINDER),
            EntityKind::Antimatter => (ENTITY_SIZE, Color::ANTIMATTER),
        };
        Self {
            id,
            kind,
            pos,
            rotation: 0.0,
            size,
            appearance,
            marked_for_deletion: false,
        }
    }

    pub fn player(id: EntityId, pos: DVec2) -> Self {
        Self::with_kind(id, EntityKind::Player, pos)
    }

    pub fn chaser(id: EntityId, pos: DVec2) -> Self {
        Self::with_kind(id, EntityKind::Chaser { speed_factor: 1.0 }, pos)
    }

    pub fn minder(id: EntityId, pos: DVec2) -> Self {
        Self::with_kind(id, EntityKind::Minder { speed_factor: 1.0 }, pos)
    }

    pub fn antimatter(id: EntityId, pos: DVec2) -> Self {
        Self::with_kind(id, EntityKind::Antimatter, pos)
    }

    pub fn distance_to(&self, other: &Entity) -> f64 {
        distance(self.pos, other.pos)
    }

    /// Turn toward `target`
    pub fn face(&mut self, target: DVec2) {
        self.rotation = facing_angle(self.pos, target);
    }

    /// Strictly closer than `threshold`
    pub fn collides_with(&self, other: &Entity, threshold: f64) -> bool {
        self.distance_to(other) < threshold
    }

    /// Whether the entity is more than `margin` past any edge of a
    /// `width` x `height` viewport
    pub fn is_offscreen(&self, width: f64, height: f64, margin: f64) -> bool {
        is_offscreen(self.pos, width, height, margin)
    }
}

/// Euclidean distance
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Angle that faces `to` from `from`, measured from the vertical:
/// `atan2(to.x - from.x, from.y - to.y)`
#[inline]
pub fn facing_angle(from: DVec2, to: DVec2) -> f64 {
    (to.x - from.x).atan2(from.y - to.y)
}

#[inline]
pub fn is_offscreen(pos: DVec2, width: f64, height: f64, margin: f64) -> bool {
    pos.x < -margin || pos.x > width + margin || pos.y < -margin || pos.y > height + margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_COLLISION_THRESHOLD;
    use proptest::prelude::*;

    fn at(x: f64, y: f64) -> Entity {
        Entity::chaser(EntityId(1), DVec2::new(x, y))
    }

    #[test]
    fn test_kind_defaults() {
        let minder = Entity::minder(EntityId(1), DVec2::ZERO);
        assert_eq!(minder.size, MINDER_SIZE);
        assert_eq!(minder.appearance, Color::MINDER);
        assert_eq!(minder.kind.speed_factor(), Some(1.0));

        let antimatter = Entity::antimatter(EntityId(2), DVec2::ZERO);
        assert_eq!(antimatter.size, ENTITY_SIZE);
        assert!(antimatter.kind.is_antimatter());
        assert!(!antimatter.kind.is_hostile());
        assert!(!antimatter.marked_for_deletion);
    }

    #[test]
    fn test_face_points_up_and_right() {
        let mut e = at(0.0, 0.0);
        // Straight up the screen (negative y) is angle 0
        e.face(DVec2::new(0.0, -10.0));
        assert!(e.rotation.abs() < 1e-12);
        // Right is +90 degrees
        e.face(DVec2::new(10.0, 0.0));
        assert!((e.rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_collision_threshold_is_strict() {
        let a = at(0.0, 0.0);
        let b = at(DEFAULT_COLLISION_THRESHOLD, 0.0);
        assert!(!a.collides_with(&b, DEFAULT_COLLISION_THRESHOLD));
        let c = at(DEFAULT_COLLISION_THRESHOLD - 0.001, 0.0);
        assert!(a.collides_with(&c, DEFAULT_COLLISION_THRESHOLD));
    }

    #[test]
    fn test_offscreen_margin() {
        assert!(!is_offscreen(DVec2::new(-50.0, 10.0), 800.0, 600.0, 50.0));
        assert!(is_offscreen(DVec2::new(-50.5, 10.0), 800.0, 600.0, 50.0));
        assert!(is_offscreen(DVec2::new(10.0, 650.5), 800.0, 600.0, 50.0));
        assert!(!is_offscreen(DVec2::new(850.0, 650.0), 800.0, 600.0, 50.0));
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            ax in -1e4f64..1e4, ay in -1e4f64..1e4,
            bx in -1e4f64..1e4, by in -1e4f64..1e4,
        ) {
            let a = at(ax, ay);
            let b = at(bx, by);
            prop_assert_eq!(a.distance_to(&b), b.distance_to(&a));
            prop_assert!(a.distance_to(&b) >= 0.0);
            prop_assert_eq!(a.distance_to(&b) == 0.0, a.pos == b.pos);
        }

        #[test]
        fn facing_matches_atan2_convention(
            ax in -1e4f64..1e4, ay in -1e4f64..1e4,
            bx in -1e4f64..1e4, by in -1e4f64..1e4,
        ) {
            prop_assume!((ax, ay) != (bx, by));
            let mut a = at(ax, ay);
            a.face(DVec2::new(bx, by));
            prop_assert!(a.rotation.is_finite());
            prop_assert_eq!(a.rotation, (bx - ax).atan2(ay - by));
        }
    }
}
