//! Viewer data structures: the scene input model, draw batches and textures.
//!
//! - `scene_graph` is the parser-independent scene description
//! - `draw_batch` holds GPU-ready draw batches and the render pass extension
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod draw_batch;
pub mod scene_graph;
pub mod texture;
