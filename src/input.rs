//! Window-system independent input events.
//!
//! Views only ever see these types; [`crate::flow`] converts winit events
//! into them.

use cgmath::Vector2;
use winit::{event::MouseButton, keyboard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    fn bit(self) -> u8 {
        match self {
            PointerButton::Primary => 1,
            PointerButton::Secondary => 1 << 1,
            PointerButton::Middle => 1 << 2,
        }
    }

    pub fn from_winit(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            MouseButton::Middle => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

/// The set of buttons currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: PointerButtons = PointerButtons(0);

    pub fn only(button: PointerButton) -> Self {
        PointerButtons(button.bit())
    }

    pub fn contains(self, button: PointerButton) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !button.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A press, move or release at a position in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Vector2<f32>,
    /// The button that changed state; `None` for moves.
    pub button: Option<PointerButton>,
    /// Buttons held after the event was applied.
    pub held: PointerButtons,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, button: Option<PointerButton>, held: PointerButtons) -> Self {
        Self {
            position: Vector2::new(x, y),
            button,
            held,
        }
    }
}

/// A wheel step with its signed magnitude (120 per notch) and pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub position: Vector2<f32>,
    pub delta: f32,
}

/// Scroll units per wheel notch.
pub const WHEEL_NOTCH: f32 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewerKey {
    A,
    D,
    E,
    F,
    I,
    K,
    L,
    M,
    N,
    S,
    U,
    W,
    Digit1,
    Digit2,
    Digit3,
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
}

impl ViewerKey {
    pub fn from_winit(key: keyboard::KeyCode) -> Option<Self> {
        Some(match key {
            keyboard::KeyCode::KeyA => ViewerKey::A,
            keyboard::KeyCode::KeyD => ViewerKey::D,
            keyboard::KeyCode::KeyE => ViewerKey::E,
            keyboard::KeyCode::KeyF => ViewerKey::F,
            keyboard::KeyCode::KeyI => ViewerKey::I,
            keyboard::KeyCode::KeyK => ViewerKey::K,
            keyboard::KeyCode::KeyL => ViewerKey::L,
            keyboard::KeyCode::KeyM => ViewerKey::M,
            keyboard::KeyCode::KeyN => ViewerKey::N,
            keyboard::KeyCode::KeyS => ViewerKey::S,
            keyboard::KeyCode::KeyU => ViewerKey::U,
            keyboard::KeyCode::KeyW => ViewerKey::W,
            keyboard::KeyCode::Digit1 => ViewerKey::Digit1,
            keyboard::KeyCode::Digit2 => ViewerKey::Digit2,
            keyboard::KeyCode::Digit3 => ViewerKey::Digit3,
            keyboard::KeyCode::Minus => ViewerKey::Minus,
            keyboard::KeyCode::Equal => ViewerKey::Equal,
            keyboard::KeyCode::BracketLeft => ViewerKey::BracketLeft,
            keyboard::KeyCode::BracketRight => ViewerKey::BracketRight,
            _ => return None,
        })
    }
}
