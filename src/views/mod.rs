//! The two render cores the viewer can host.

pub mod fractal_view;
pub mod morphing_view;

pub use fractal_view::FractalView;
pub use morphing_view::MorphingView;
