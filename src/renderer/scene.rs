//! CPU-side scene building
//!
//! Turns render records and effects into vertex batches. Trails come from
//! keeping the last few frames and fading each older one by the background
//! wash alpha, which works on surfaces that do not preserve their contents.

use std::collections::VecDeque;

use glam::{DVec2, Vec2};

use super::Renderer;
use super::effects::Ripple;
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::OFFSCREEN_MARGIN;
use crate::settings::Settings;
use crate::sim::{Color, RenderRecord, is_offscreen};

/// Frames kept for trails (0.9^24 is under 8% opacity)
const TRAIL_LAYERS: usize = 24;
const CIRCLE_SEGMENTS: u32 = 24;

/// Vertex batches for the current and recent frames
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    trails: bool,
    flashes: bool,
    /// Newest layer at the back
    layers: VecDeque<Vec<Vertex>>,
    pending_flash: Option<Color>,
    ripples: Vec<Ripple>,
    draw_count: usize,
}

impl Scene {
    pub fn new(width: f64, height: f64, settings: &Settings) -> Self {
        Self {
            width,
            height,
            trails: settings.trails,
            flashes: settings.effective_screen_flash(),
            layers: VecDeque::with_capacity(TRAIL_LAYERS),
            pending_flash: None,
            ripples: Vec::new(),
            draw_count: 0,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.trails = settings.trails;
        self.flashes = settings.effective_screen_flash();
        if !self.trails {
            self.layers.clear();
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Records drawn in the last frame (off-screen ones are skipped)
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn active_ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    /// Build the newest layer from this frame's effects and records
    pub fn build(&mut self, time_ms: f64, records: &[RenderRecord]) -> usize {
        let mut layer = Vec::new();

        if let Some(color) = self.pending_flash.take() {
            layer.extend(shapes::fullscreen(
                self.width as f32,
                self.height as f32,
                color.to_rgba(1.0 - colors::TRAIL_FADE),
            ));
        }

        for ripple in &mut self.ripples {
            let center = ripple.at.as_vec2();
            let rgba = ripple.color.to_rgba(1.0);
            for radius in ripple.advance(time_ms) {
                layer.extend(shapes::circle(center, radius as f32, rgba, CIRCLE_SEGMENTS));
            }
        }
        self.ripples.retain(|r| !r.is_finished());

        let mut drawn = 0;
        for record in records {
            if is_offscreen(DVec2::new(record.x, record.y), self.width, self.height, OFFSCREEN_MARGIN) {
                continue;
            }
            drawn += 1;
            layer.extend(shapes::rotated_rect(
                Vec2::new(record.x as f32, record.y as f32),
                Vec2::new(record.width as f32, record.height as f32),
                record.rotation as f32,
                record.color.to_rgba(1.0),
            ));
        }

        if !self.trails {
            self.layers.clear();
        }
        self.layers.push_back(layer);
        while self.layers.len() > TRAIL_LAYERS {
            self.layers.pop_front();
        }

        self.draw_count = drawn;
        drawn
    }

    /// All layers composited oldest first, each older frame faded once more
    pub fn vertices(&self) -> Vec<Vertex> {
        let keep = 1.0 - colors::TRAIL_FADE;
        let newest = self.layers.len().saturating_sub(1);
        let mut out = Vec::with_capacity(self.layers.iter().map(Vec::len).sum());
        for (index, layer) in self.layers.iter().enumerate() {
            let factor = keep.powi((newest - index) as i32);
            out.extend(layer.iter().map(|v| v.faded(factor)));
        }
        out
    }
}

impl Renderer for Scene {
    fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
            self.layers.clear();
        }
    }

    fn flash(&mut self, color: Color) {
        if self.flashes {
            self.pending_flash = Some(color);
        }
    }

    fn explode(&mut self, at: DVec2, color: Color, ripples: u32) {
        if ripples > 0 {
            self.ripples.push(Ripple::new(at, color, ripples));
        }
    }

    fn present(&mut self, time_ms: f64, records: &[RenderRecord]) -> usize {
        self.build(time_ms, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: f64, y: f64) -> RenderRecord {
        RenderRecord {
            x,
            y,
            rotation: 0.0,
            width: 20.0,
            height: 15.0,
            color: Color::CHASER,
        }
    }

    fn scene() -> Scene {
        Scene::new(800.0, 600.0, &Settings::default())
    }

    #[test]
    fn test_offscreen_records_are_skipped() {
        let mut s = scene();
        let drawn = s.present(0.0, &[record(10.0, 10.0), record(-60.0, 10.0), record(10.0, 700.0)]);
        assert_eq!(drawn, 1);
        assert_eq!(s.draw_count(), 1);
        assert_eq!(s.vertices().len(), 6);
    }

    #[test]
    fn test_trails_fade_older_frames() {
        let mut s = scene();
        s.present(0.0, &[record(10.0, 10.0)]);
        s.present(16.0, &[record(20.0, 10.0)]);
        let v = s.vertices();
        assert_eq!(v.len(), 12);
        assert!((v[0].color[3] - 0.9).abs() < 1e-6);
        assert_eq!(v[6].color[3], 1.0);
    }

    #[test]
    fn test_trails_disabled_keeps_one_layer() {
        let settings = Settings {
            trails: false,
            ..Default::default()
        };
        let mut s = Scene::new(800.0, 600.0, &settings);
        s.present(0.0, &[record(10.0, 10.0)]);
        s.present(16.0, &[record(20.0, 10.0)]);
        assert_eq!(s.vertices().len(), 6);
    }

    #[test]
    fn test_trail_history_is_bounded() {
        let mut s = scene();
        for i in 0..100 {
            s.present(i as f64 * 16.0, &[record(10.0, 10.0)]);
        }
        assert_eq!(s.vertices().len(), TRAIL_LAYERS * 6);
    }

    #[test]
    fn test_explosion_ripples_run_out() {
        let mut s = scene();
        s.explode(DVec2::new(100.0, 100.0), Color::CHASER, 3);
        let mut time = 0.0;
        for _ in 0..10 {
            s.present(time, &[]);
            time += 16.0;
        }
        assert!(s.active_ripples().is_empty());
    }

    #[test]
    fn test_flash_respects_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            trails: false,
            ..Default::default()
        };
        let mut s = Scene::new(800.0, 600.0, &settings);
        s.flash(Color::MINDER);
        s.present(0.0, &[]);
        assert!(s.vertices().is_empty());

        let mut s = Scene::new(800.0, 600.0, &Settings { trails: false, ..Default::default() });
        s.flash(Color::MINDER);
        s.present(0.0, &[]);
        assert_eq!(s.vertices().len(), 6);
    }

    #[test]
    fn test_resize_ignores_empty_surface() {
        let mut s = scene();
        s.resize(0.0, 300.0);
        assert_eq!(s.size(), (800.0, 600.0));
        s.resize(1024.0, 768.0);
        assert_eq!(s.size(), (1024.0, 768.0));
    }
}
