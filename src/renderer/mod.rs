//! Rendering module
//!
//! World-space state is mapped onto a retained sprite stage, which the WebGPU
//! backend draws as textured quads from a single atlas.

pub mod atlas;
pub mod pipeline;
pub mod shapes;
pub mod stage;
pub mod vertex;
pub mod viewport;

pub use atlas::{AssetError, Frame, SpriteAtlas, load_atlas};
pub use pipeline::{RenderError, SpriteRenderState};
pub use stage::{DisplayObject, Layer, Sprite, Stage, TilingSprite, create_renderer};
pub use viewport::Viewport;
