//! Quad generation for display objects
//!
//! Everything here works in screen pixels; the pipeline converts to NDC.

use glam::{Mat2, Vec2};

use super::stage::{DisplayObject, Sprite, TilingSprite};
use super::vertex::Vertex;

/// Two triangles from four corners given clockwise from top-left
fn quad(corners: [Vec2; 4], uvs: [[f32; 2]; 4], frame: [f32; 4], tiling: f32) -> [Vertex; 6] {
    let v = |i: usize| Vertex::new(corners[i].x, corners[i].y, uvs[i], frame, tiling);
    [v(0), v(1), v(2), v(0), v(2), v(3)]
}

/// Vertices for a sprite, honoring pivot, rotation and horizontal flip
pub fn sprite(sprite: &Sprite) -> [Vertex; 6] {
    let frame = sprite.current_frame();
    let scale = Vec2::new(
        sprite.facing() * sprite.width / frame.width,
        sprite.height / frame.height,
    );
    let rotation = Mat2::from_angle(sprite.angle.to_radians());

    let local = [
        Vec2::new(0.0, 0.0),
        Vec2::new(frame.width, 0.0),
        Vec2::new(frame.width, frame.height),
        Vec2::new(0.0, frame.height),
    ];
    let corners = local.map(|p| sprite.position + rotation * ((p - sprite.pivot) * scale));
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    quad(corners, uvs, frame.uv, 0.0)
}

/// Vertices for a tiling surface; uvs count whole texture repeats
pub fn tiling_sprite(tiling: &TilingSprite) -> [Vertex; 6] {
    let min = tiling.position;
    let max = tiling.position + Vec2::new(tiling.width, tiling.height);
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ];

    let tile = Vec2::new(tiling.frame.width, tiling.frame.height);
    let uv = |offset: Vec2| {
        let t = (offset - tiling.tile_position) / tile;
        [t.x, t.y]
    };
    let uvs = [
        uv(Vec2::ZERO),
        uv(Vec2::new(tiling.width, 0.0)),
        uv(Vec2::new(tiling.width, tiling.height)),
        uv(Vec2::new(0.0, tiling.height)),
    ];

    quad(corners, uvs, tiling.frame.uv, 1.0)
}

/// Vertices for the whole display list, back to front
pub fn display_list<'a>(objects: impl Iterator<Item = DisplayObject<'a>>) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6 * 8);
    for object in objects {
        match object {
            DisplayObject::Tiling(t) => vertices.extend_from_slice(&tiling_sprite(t)),
            DisplayObject::Sprite(s) => vertices.extend_from_slice(&sprite(s)),
        }
    }
    vertices
}
