//! Shape generation for 2D primitives (screen space, y down)

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Filled rectangle of `size` centred on `center`, rotated clockwise by
/// `rotation` radians (canvas convention)
pub fn rotated_rect(center: Vec2, size: Vec2, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    let (sin, cos) = rotation.sin_cos();
    let corner = |local: Vec2| {
        let p = center + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
        Vertex::new(p.x, p.y, color)
    };

    let tl = corner(Vec2::new(-half.x, -half.y));
    let tr = corner(Vec2::new(half.x, -half.y));
    let br = corner(Vec2::new(half.x, half.y));
    let bl = corner(Vec2::new(-half.x, half.y));

    vec![tl, tr, br, br, bl, tl]
}

/// Rectangle covering the whole surface
pub fn fullscreen(width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    rotated_rect(
        Vec2::new(width / 2.0, height / 2.0),
        Vec2::new(width, height),
        0.0,
        color,
    )
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrotated_rect_corners() {
        let v = rotated_rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 2.0), 0.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [8.0, 19.0]);
        assert_eq!(v[2].position, [12.0, 21.0]);
    }

    #[test]
    fn test_quarter_turn_swaps_extent() {
        let v = rotated_rect(Vec2::ZERO, Vec2::new(20.0, 10.0), PI / 2.0, [1.0; 4]);
        let max_x = v.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_x - 5.0).abs() < 1e-4);
        assert!((max_y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_triangle_count() {
        let v = circle(Vec2::ZERO, 25.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        for vertex in v.iter().skip(1).step_by(3) {
            let r = Vec2::from(vertex.position).length();
            assert!((r - 25.0).abs() < 1e-3);
        }
    }
}
