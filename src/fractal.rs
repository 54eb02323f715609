//! Pan and zoom state of the fractal view.
//!
//! The fractal shader maps a fragment at normalized device coordinates `p` to
//! `(p + shift) / zoom`. Dragging moves `shift` in NDC units, the wheel changes
//! `zoom` multiplicatively while keeping the point under the cursor fixed.

use cgmath::{Vector2, Zero};

use crate::input::{PointerEvent, WheelEvent};

pub const DEFAULT_ZOOM: f32 = 0.4;
pub const MIN_ZOOM: f32 = 0.1;
/// Shader-space origin corner.
pub const CORNER: Vector2<f32> = Vector2::new(-1.0, -1.0);

#[derive(Clone, Debug, PartialEq)]
pub struct FractalViewTransform {
    zoom: f32,
    committed_shift: Vector2<f32>,
    drag_shift: Vector2<f32>,
    press_position: Option<Vector2<f32>>,
    viewport: (u32, u32),
}

impl Default for FractalViewTransform {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            committed_shift: Vector2::zero(),
            drag_shift: Vector2::zero(),
            press_position: None,
            viewport: (0, 0),
        }
    }
}

impl FractalViewTransform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            ..Default::default()
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn committed_shift(&self) -> Vector2<f32> {
        self.committed_shift
    }

    pub fn drag_shift(&self) -> Vector2<f32> {
        self.drag_shift
    }

    /// The value of the `shift` uniform.
    pub fn shift(&self) -> Vector2<f32> {
        self.committed_shift + self.drag_shift
    }

    pub fn is_dragging(&self) -> bool {
        self.press_position.is_some()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.press_position = Some(event.position);
        self.drag_shift = Vector2::zero();
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> bool {
        match self.drag_from_press(event.position) {
            Some(drag) => {
                self.drag_shift = drag;
                true
            }
            None => false,
        }
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) {
        if let Some(drag) = self.drag_from_press(event.position) {
            self.drag_shift = drag;
        }
        if self.press_position.take().is_some() {
            self.committed_shift += self.drag_shift;
        }
        self.drag_shift = Vector2::zero();
    }

    /// Zooms by `delta / 1000` of the current zoom, anchored at the pointer.
    pub fn on_wheel(&mut self, event: &WheelEvent) -> bool {
        let Some(p) = self.normalized(event.position) else {
            return false;
        };
        let prev_zoom = self.zoom;
        self.zoom = (self.zoom + (event.delta / 1000.0) * self.zoom).max(MIN_ZOOM);
        self.committed_shift =
            (CORNER + self.committed_shift + p * 2.0) * (self.zoom / prev_zoom) - CORNER - p * 2.0;
        true
    }

    /// Fractal-plane coordinate shown at `position` (pixels) with the current
    /// committed state.
    pub fn shader_point(&self, position: Vector2<f32>) -> Option<Vector2<f32>> {
        let p = self.normalized(position)?;
        Some((p * 2.0 + CORNER + self.committed_shift) / self.zoom)
    }

    /// Pointer position in `[0, 1]` with y pointing up.
    fn normalized(&self, position: Vector2<f32>) -> Option<Vector2<f32>> {
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Vector2::new(
            position.x / width as f32,
            1.0 - position.y / height as f32,
        ))
    }

    fn drag_from_press(&self, position: Vector2<f32>) -> Option<Vector2<f32>> {
        let press = self.press_position?;
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return None;
        }
        let offset = position - press;
        Some(Vector2::new(
            -2.0 * offset.x / width as f32,
            2.0 * offset.y / height as f32,
        ))
    }
}

/// Shader parameters driven by the controls.
///
/// The shader iterates `z^(2 + param1) + (param2, param3)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    pub iterations: i32,
    pub param1: f32,
    pub param2: f32,
    pub param3: f32,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            param1: 0.0,
            param2: -0.345,
            param3: 0.654,
        }
    }
}
