//! Sprite quad generation
//!
//! Builds textured quads in world space. Rotation is applied CPU-side so
//! the pipeline stays one textured triangle list; the collision box in the
//! sim remains axis-aligned regardless of the drawn angle.

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::{GameMode, GameState};

/// Append one quad (two triangles), rotated by `angle` about its center
pub fn push_quad(vertices: &mut Vec<Vertex>, pos: Vec2, size: Vec2, angle: f32) {
    let center = pos + size * 0.5;
    let (sin, cos) = angle.sin_cos();
    let rotate = |corner: Vec2| {
        let local = corner - center;
        center
            + Vec2::new(
                local.x * cos - local.y * sin,
                local.x * sin + local.y * cos,
            )
    };

    let tl = rotate(pos);
    let tr = rotate(pos + Vec2::new(size.x, 0.0));
    let br = rotate(pos + size);
    let bl = rotate(pos + Vec2::new(0.0, size.y));

    vertices.push(Vertex::new(tl.x, tl.y, 0.0, 0.0));
    vertices.push(Vertex::new(tr.x, tr.y, 1.0, 0.0));
    vertices.push(Vertex::new(br.x, br.y, 1.0, 1.0));

    vertices.push(Vertex::new(tl.x, tl.y, 0.0, 0.0));
    vertices.push(Vertex::new(br.x, br.y, 1.0, 1.0));
    vertices.push(Vertex::new(bl.x, bl.y, 0.0, 1.0));
}

/// Player quad; empty before the first run exists
pub fn player_quad(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    if state.mode != GameMode::NotStarted {
        push_quad(
            &mut vertices,
            state.player.pos,
            state.player.size,
            0.0,
        );
    }
    vertices
}

/// One quad per live obstacle, carrying its cosmetic rotation
pub fn obstacle_quads(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(state.obstacles.len() * 6);
    for obstacle in &state.obstacles {
        push_quad(&mut vertices, obstacle.pos, obstacle.size, obstacle.angle);
    }
    vertices
}
