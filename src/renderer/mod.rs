//! Rendering module
//!
//! The session hands every frame a render list and the effect events from
//! the tick; a [`Renderer`] turns them into pixels.

pub mod effects;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

use glam::DVec2;

use crate::sim::{Color, RenderRecord};

pub use effects::Ripple;
pub use pipeline::{GpuRenderer, RenderState};
pub use scene::Scene;
pub use vertex::Vertex;

/// Draw surface driven by the session
pub trait Renderer {
    /// Surface size changed (CSS pixels)
    fn resize(&mut self, width: f64, height: f64);

    /// Tint the next frame (player hit)
    fn flash(&mut self, color: Color);

    /// Start an expanding ripple at `at`
    fn explode(&mut self, at: DVec2, color: Color, ripples: u32);

    /// Draw one frame; returns how many records were drawn
    fn present(&mut self, time_ms: f64, records: &[RenderRecord]) -> usize;
}
