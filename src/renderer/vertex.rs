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

/// Colors for things that are not sprites
pub mod colors {
    pub const SKY: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const TILE_EDGE: [f32; 4] = [0.0, 0.0, 0.0, 0.25];
    pub const CONTROLS_BG: [f32; 4] = [0.12, 0.12, 0.20, 1.0];
    pub const PAUSE_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.70];
    pub const GAME_OVER_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.59];
    pub const WIN_SHADE: [f32; 4] = [1.0, 1.0, 1.0, 0.59];
    pub const BUTTON: [f32; 4] = [0.20, 0.20, 0.30, 0.90];
    pub const BUTTON_BORDER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SOUND_ON: [f32; 4] = [0.39, 1.0, 0.39, 1.0];
    pub const SOUND_OFF: [f32; 4] = [1.0, 0.39, 0.39, 1.0];
    pub const DASH_READY: [f32; 4] = [0.39, 1.0, 0.39, 1.0];
    pub const DASH_COOLING: [f32; 4] = [1.0, 0.39, 0.39, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
