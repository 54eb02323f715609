//! Orbit camera and perspective projection.
//!
//! [`OrbitCamera`] keeps a location, a focus point and an up vector and is
//! driven directly by pointer gestures: the primary button rotates around the
//! focus, the secondary button pans, the wheel dollies. The view matrix is
//! derived on demand with a right-handed look-at.

use cgmath::{InnerSpace, Matrix4, Point3, Quaternion, Rad, Rotation3, Vector2, Vector3, perspective};

use crate::input::{PointerButton, PointerEvent, WheelEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Minimum focus distance a dolly may leave behind.
const MIN_FOCUS_DISTANCE: f32 = 1e-4;
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Discrete keyboard translations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraStep {
    Forward,
    Backward,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    location: Point3<f32>,
    focus: Point3<f32>,
    up: Vector3<f32>,
    step: f32,
    viewport: (u32, u32),
    last_position: Option<Vector2<f32>>,
}

impl OrbitCamera {
    /// Creates a camera; `up` is made orthogonal to the view direction.
    pub fn new(location: Point3<f32>, focus: Point3<f32>, up: Vector3<f32>, step: f32) -> Self {
        let mut camera = Self {
            location,
            focus,
            up,
            step,
            viewport: (0, 0),
            last_position: None,
        };
        if let Some(up) = camera.orthogonal_up(up) {
            camera.up = up;
        } else {
            log::warn!("Camera up vector {:?} is parallel to the view direction", up);
        }
        camera
    }

    pub fn location(&self) -> Point3<f32> {
        self.location
    }

    pub fn focus(&self) -> Point3<f32> {
        self.focus
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.location, self.focus, self.up)
    }

    /// Unit vector pointing right on screen.
    pub fn right(&self) -> Vector3<f32> {
        self.up.cross(self.location - self.focus).normalize()
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.last_position = Some(event.position);
    }

    /// Rotates or pans depending on the held buttons. Returns whether the camera moved.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> bool {
        let Some(last) = self.last_position else {
            return false;
        };
        let diff = event.position - last;
        self.last_position = Some(event.position);

        if event.held.contains(PointerButton::Primary) {
            self.rotate(diff)
        } else if event.held.contains(PointerButton::Secondary) {
            self.pan(diff)
        } else {
            false
        }
    }

    /// Ends the drag once no button is held any more.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) {
        if event.held.is_empty() {
            self.last_position = None;
        }
    }

    pub fn on_wheel(&mut self, event: &WheelEvent) -> bool {
        self.dolly(event.delta)
    }

    /// Rotates the location about the focus by `-diff.x` degrees around `up`
    /// and `-diff.y` degrees around `right`.
    pub fn rotate(&mut self, diff: Vector2<f32>) -> bool {
        let view = self.location - self.focus;
        let right = self.up.cross(view);
        if right.magnitude2() < DEGENERATE_EPSILON * view.magnitude2() {
            log::debug!("Skipping rotation, view direction is parallel to up");
            return false;
        }
        let right = right.normalize();

        let around_up = Quaternion::from_axis_angle(self.up, Rad::from(cgmath::Deg(-diff.x)));
        let around_right = Quaternion::from_axis_angle(right, Rad::from(cgmath::Deg(-diff.y)));
        let rotation = around_right * around_up;

        let new_view = rotation * view;
        let rotated_up = rotation * self.up;
        let up = rotated_up - new_view * (rotated_up.dot(new_view) / new_view.magnitude2());
        if up.magnitude2() < DEGENERATE_EPSILON {
            log::debug!("Skipping rotation, up vector degenerated");
            return false;
        }

        self.location = self.focus + new_view;
        self.up = up.normalize();
        true
    }

    /// Moves location and focus together in the screen plane.
    pub fn pan(&mut self, diff: Vector2<f32>) -> bool {
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return false;
        }
        let delta =
            self.right() * (-diff.x / width as f32) + self.up * (diff.y / height as f32);
        self.location += delta;
        self.focus += delta;
        true
    }

    /// Scales the focus distance by `1 - delta / 1000`.
    pub fn dolly(&mut self, delta: f32) -> bool {
        let mul = -delta / 1000.0;
        let view = self.location - self.focus;
        if (1.0 + mul) * view.magnitude() <= MIN_FOCUS_DISTANCE {
            log::debug!("Skipping dolly of {}, camera would reach the focus", delta);
            return false;
        }
        self.location += view * mul;
        true
    }

    /// Translates location and focus by the configured step.
    pub fn step(&mut self, step: CameraStep) {
        let forward = (self.focus - self.location).normalize();
        let direction = match step {
            CameraStep::Forward => forward,
            CameraStep::Backward => -forward,
            CameraStep::Up => self.up,
            CameraStep::Down => -self.up,
            CameraStep::Left => -self.right(),
            CameraStep::Right => self.right(),
        };
        let delta = direction * self.step;
        self.location += delta;
        self.focus += delta;
    }

    fn orthogonal_up(&self, up: Vector3<f32>) -> Option<Vector3<f32>> {
        let view = self.location - self.focus;
        if view.magnitude2() == 0.0 {
            return None;
        }
        let threshold = DEGENERATE_EPSILON * up.magnitude2();
        let up = up - view * (up.dot(view) / view.magnitude2());
        (up.magnitude2() >= threshold && threshold > 0.0).then(|| up.normalize())
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 2.0, 7.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
            0.5,
        )
    }
}

pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Ignores zero-height sizes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
