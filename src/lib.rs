//! morph-view
//!
//! An interactive wgpu viewer with two views: a Julia-style fractal that can
//! be panned and zoomed around the cursor, and a glTF scene whose geometry
//! morphs towards a sphere under an orbit camera.
//!
//! High-level modules
//! - `camera`: orbit camera and perspective projection
//! - `fractal`: fractal pan/zoom state and shader parameters
//! - `frame_clock`: windowed frame rate estimation
//! - `controls`: integer controls and their mapping to shader values
//! - `input`: window-system independent pointer, wheel and key events
//! - `data_structures`: scene graph input model, draw batches, textures
//! - `resources`: glTF loading, buffer classification and scene binding
//! - `pipelines`: fractal and scene render pipelines
//! - `context`: GPU device, queue and surface
//! - `render`: per-frame render pass setup
//! - `flow`: the `RenderCore` interface and the winit event loop
//! - `config`, `logging`, `error`: command line configuration, logger setup
//!   and the load/binding error types
//! - `views`: the fractal and morphing render cores
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod fractal;
pub mod frame_clock;
pub mod input;
pub mod logging;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod views;

pub use error::{BindingError, LoadError, PrimitiveError};
