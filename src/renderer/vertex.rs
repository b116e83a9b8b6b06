//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Same vertex with its alpha scaled
    pub fn faded(self, factor: f32) -> Self {
        let [r, g, b, a] = self.color;
        Self::new(self.position[0], self.position[1], [r, g, b, a * factor])
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for the scene
pub mod colors {
    /// Light grey page the entities are drawn on
    pub const BACKGROUND: [f32; 4] = [240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0, 1.0];
    /// Alpha of the background wash laid over the previous frame (trails)
    pub const TRAIL_FADE: f32 = 0.1;
}
