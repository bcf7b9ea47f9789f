//! Vertex types for 2D sprite rendering

use bytemuck::{Pod, Zeroable};

/// Textured 2D vertex
///
/// `uv` is relative to the atlas frame in `frame`; values outside 0..1 only
/// make sense for tiling surfaces, which the shader wraps back into the frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Atlas frame rect: [u, v, du, dv]
    pub frame: [f32; 4],
    /// 1.0 for tiling surfaces, 0.0 for sprites
    pub tiling: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, uv: [f32; 2], frame: [f32; 4], tiling: f32) -> Self {
        Self {
            position: [x, y],
            uv,
            frame,
            tiling,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            0 => Float32x2,
            1 => Float32x2,
            2 => Float32x4,
            3 => Float32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Clear color shown before the background layer covers the screen (sky blue)
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.31,
    g: 0.75,
    b: 0.79,
    a: 1.0,
};
