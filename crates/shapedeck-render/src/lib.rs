//! Renderer for the ShapeDeck preview.
//!
//! Splits into a CPU side (geometry dispatch, triangle-mesh builders,
//! scene staging) that is fully testable without a GPU, and a wgpu
//! backend that uploads and draws whatever the scene stages.

pub mod geometry;
pub mod mesh;
pub mod renderer;
pub mod scene;

pub use geometry::Geometry;
pub use mesh::{MeshData, Vertex};
pub use renderer::{MeshRenderer, RendererError};
pub use scene::{
    PreviewScene, StagedShape, ViewVolume, ROTATION_STEP, ROW_SPACING, VIEW_VOLUME,
};
