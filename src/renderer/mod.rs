//! WebGPU rendering module
//!
//! The scene is rebuilt every frame as colored quads and drawn in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, screen_to_world, world_to_ndc};
pub use scene::build_scene;
pub use vertex::Vertex;
