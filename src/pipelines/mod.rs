//! Render pipelines.
//!
//! - `basic` holds the shared pipeline builder and depth/uniform helpers
//! - `fractal` draws the fractal as a full-screen quad
//! - `scene` draws glTF batches with morphing and lighting

pub mod basic;
pub mod fractal;
pub mod scene;
