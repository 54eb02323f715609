//! Integer controls and their mapping to shader values.
//!
//! Each tunable value is held as a clamped integer, like a slider position,
//! and converted to the float the shader expects when uniforms are written.

use std::f32::consts::PI;
use std::ops::RangeInclusive;

use cgmath::Vector3;

use crate::fractal::FractalParams;

pub const ITERATIONS_RANGE: RangeInclusive<i32> = 0..=200;
pub const PARAM_RANGE: RangeInclusive<i32> = -1000..=1000;
pub const PERCENT_RANGE: RangeInclusive<i32> = 0..=100;
pub const AZIMUTH_RANGE: RangeInclusive<i32> = 0..=360;

pub const LIGHT_RADIUS: f32 = 5.0;
pub const LIGHT_HEIGHT: f32 = 5.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliderControl {
    value: i32,
    range: RangeInclusive<i32>,
}

impl SliderControl {
    pub fn new(value: i32, range: RangeInclusive<i32>) -> Self {
        let value = value.clamp(*range.start(), *range.end());
        Self { value, range }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn range(&self) -> &RangeInclusive<i32> {
        &self.range
    }

    /// Sets the value, clamped to the range. Returns whether it changed.
    pub fn set(&mut self, value: i32) -> bool {
        let value = value.clamp(*self.range.start(), *self.range.end());
        let changed = value != self.value;
        self.value = value;
        changed
    }

    pub fn nudge(&mut self, by: i32) -> bool {
        self.set(self.value.saturating_add(by))
    }
}

/// `-1000..=1000` to `-1.0..=1.0`.
pub fn param_from_control(value: i32) -> f32 {
    value as f32 / 1000.0
}

pub fn param_to_control(param: f32) -> i32 {
    (param * 1000.0).round() as i32
}

/// `0..=100` to `0.0..=1.0`.
pub fn unit_from_percent(value: i32) -> f32 {
    value as f32 / 100.0
}

/// Position on the light circle for an azimuth in degrees.
pub fn light_position(azimuth: i32, radius: f32, height: f32) -> Vector3<f32> {
    let angle = 2.0 * PI * azimuth as f32 / 360.0;
    Vector3::new(radius * angle.sin(), radius * angle.cos(), height)
}

/// Which fractal parameter the `-`/`=` keys adjust.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParamSelection {
    #[default]
    Param1,
    Param2,
    Param3,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FractalControls {
    pub iterations: SliderControl,
    pub param1: SliderControl,
    pub param2: SliderControl,
    pub param3: SliderControl,
    pub selected: ParamSelection,
}

impl FractalControls {
    pub fn from_params(params: &FractalParams) -> Self {
        Self {
            iterations: SliderControl::new(params.iterations, ITERATIONS_RANGE),
            param1: SliderControl::new(param_to_control(params.param1), PARAM_RANGE),
            param2: SliderControl::new(param_to_control(params.param2), PARAM_RANGE),
            param3: SliderControl::new(param_to_control(params.param3), PARAM_RANGE),
            selected: ParamSelection::default(),
        }
    }

    pub fn selected_mut(&mut self) -> &mut SliderControl {
        match self.selected {
            ParamSelection::Param1 => &mut self.param1,
            ParamSelection::Param2 => &mut self.param2,
            ParamSelection::Param3 => &mut self.param3,
        }
    }

    pub fn params(&self) -> FractalParams {
        FractalParams {
            iterations: self.iterations.value(),
            param1: param_from_control(self.param1.value()),
            param2: param_from_control(self.param2.value()),
            param3: param_from_control(self.param3.value()),
        }
    }
}

impl Default for FractalControls {
    fn default() -> Self {
        Self::from_params(&FractalParams::default())
    }
}

/// Shader-facing values of the morphing scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneParams {
    pub morphing: f32,
    pub light_color: Vector3<f32>,
    pub light_intensity: f32,
    pub light_position: Vector3<f32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneControls {
    pub morph: SliderControl,
    pub red: SliderControl,
    pub green: SliderControl,
    pub blue: SliderControl,
    pub intensity: SliderControl,
    pub azimuth: SliderControl,
}

impl SceneControls {
    pub fn params(&self) -> SceneParams {
        SceneParams {
            morphing: unit_from_percent(self.morph.value()),
            light_color: Vector3::new(
                unit_from_percent(self.red.value()),
                unit_from_percent(self.green.value()),
                unit_from_percent(self.blue.value()),
            ),
            light_intensity: unit_from_percent(self.intensity.value()),
            light_position: light_position(self.azimuth.value(), LIGHT_RADIUS, LIGHT_HEIGHT),
        }
    }
}

impl Default for SceneControls {
    fn default() -> Self {
        Self {
            morph: SliderControl::new(0, PERCENT_RANGE),
            red: SliderControl::new(100, PERCENT_RANGE),
            green: SliderControl::new(80, PERCENT_RANGE),
            blue: SliderControl::new(100, PERCENT_RANGE),
            intensity: SliderControl::new(100, PERCENT_RANGE),
            azimuth: SliderControl::new(45, AZIMUTH_RANGE),
        }
    }
}
