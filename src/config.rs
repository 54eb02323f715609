//! Viewer configuration and command line arguments.

use std::path::PathBuf;

use cgmath::{Point3, Vector3};
use clap::Parser;

use crate::{camera::OrbitCamera, fractal::FractalParams, logging::LoggingConfig};

/// Which render core the window hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewKind {
    /// Julia-style fractal with pan and zoom.
    #[default]
    Fractal,
    /// glTF scene with morphing and an orbit camera.
    Morphing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub location: Point3<f32>,
    pub focus: Point3<f32>,
    pub up: Vector3<f32>,
    /// Distance moved per keyboard step.
    pub step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            location: Point3::new(0.0, 2.0, 7.0),
            focus: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            step: 0.5,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> OrbitCamera {
        OrbitCamera::new(self.location, self.focus, self.up, self.step)
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub view: ViewKind,
    pub model: PathBuf,
    pub width: u32,
    pub height: u32,
    pub camera: CameraConfig,
    pub fractal: FractalParams,
    pub logging: LoggingConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            view: ViewKind::default(),
            model: PathBuf::from("assets/model.glb"),
            width: 640,
            height: 480,
            camera: CameraConfig::default(),
            fractal: FractalParams::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn title(&self) -> &'static str {
        match self.view {
            ViewKind::Fractal => "Fractal",
            ViewKind::Morphing => "Morphing",
        }
    }
}

/// Interactive fractal and glTF morphing viewer.
#[derive(Parser, Debug)]
#[command(name = "morph-view", version)]
pub struct Args {
    /// View to open.
    #[arg(long, default_value = "fractal", value_enum)]
    pub view: ViewKind,

    /// glTF or GLB file shown by the morphing view.
    #[arg(long, default_value = "assets/model.glb")]
    pub model: PathBuf,

    /// Initial window width in pixels.
    #[arg(long, default_value = "640")]
    pub width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value = "480")]
    pub height: u32,

    /// Log filter in `env_logger` syntax. Falls back to RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,

    /// Distance the camera moves per key press.
    #[arg(long, default_value = "0.5")]
    pub camera_step: f32,
}

impl From<Args> for ViewerConfig {
    fn from(args: Args) -> Self {
        let defaults = ViewerConfig::default();
        Self {
            view: args.view,
            model: args.model,
            width: args.width,
            height: args.height,
            camera: CameraConfig {
                step: args.camera_step,
                ..defaults.camera
            },
            logging: LoggingConfig {
                env_filter: args.log,
                ..defaults.logging
            },
            ..defaults
        }
    }
}
