mod common;

use cgmath::{Vector2, Zero};
use common::test_utils::{Lcg, assert_close};
use morph_view::{
    fractal::{DEFAULT_ZOOM, FractalViewTransform, MIN_ZOOM},
    input::{PointerButton, PointerButtons, PointerEvent, WheelEvent},
};

fn press(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(
        x,
        y,
        Some(PointerButton::Primary),
        PointerButtons::only(PointerButton::Primary),
    )
}

fn moved(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(x, y, None, PointerButtons::only(PointerButton::Primary))
}

fn release(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(x, y, Some(PointerButton::Primary), PointerButtons::NONE)
}

fn wheel(x: f32, y: f32, delta: f32) -> WheelEvent {
    WheelEvent {
        position: Vector2::new(x, y),
        delta,
    }
}

#[test]
fn drag_commits_on_release() {
    let mut view = FractalViewTransform::new(200, 200);

    view.on_pointer_down(&press(50.0, 50.0));
    view.on_pointer_move(&moved(60.0, 50.0));
    view.on_pointer_up(&release(60.0, 50.0));

    assert_close(view.committed_shift().x, -0.1, "committed x");
    assert_close(view.committed_shift().y, 0.0, "committed y");
    assert_eq!(view.drag_shift(), Vector2::zero());
    assert!(!view.is_dragging());
}

#[test]
fn uniform_shift_includes_the_drag_in_progress() {
    let mut view = FractalViewTransform::new(200, 100);
    view.on_pointer_down(&press(0.0, 0.0));
    view.on_pointer_up(&release(20.0, 0.0));

    view.on_pointer_down(&press(100.0, 50.0));
    view.on_pointer_move(&moved(100.0, 60.0));

    assert!(view.is_dragging());
    assert_close(view.drag_shift().y, 0.2, "drag y");
    assert_close(view.shift().x, -0.2, "shift x");
    assert_close(view.shift().y, 0.2, "shift y");
    assert_close(view.committed_shift().y, 0.0, "committed y");
}

#[test]
fn drag_is_measured_from_the_press_position() {
    let mut view = FractalViewTransform::new(200, 200);
    view.on_pointer_down(&press(100.0, 100.0));

    for x in [110.0, 130.0, 90.0, 120.0] {
        view.on_pointer_move(&moved(x, 100.0));
    }

    assert_close(view.drag_shift().x, -0.2, "drag x");
}

#[test]
fn move_without_press_is_ignored() {
    let mut view = FractalViewTransform::new(200, 200);

    assert!(!view.on_pointer_move(&moved(150.0, 20.0)));
    view.on_pointer_up(&release(150.0, 20.0));

    assert_eq!(view, FractalViewTransform::new(200, 200));
}

#[test]
fn wheel_keeps_point_under_cursor_fixed() {
    let mut rng = Lcg::new(11);
    let mut view = FractalViewTransform::new(640, 480);

    for _ in 0..200 {
        let position = Vector2::new(rng.range(0.0, 640.0), rng.range(0.0, 480.0));
        let delta = rng.range(-360.0, 360.0);
        let before = view.shader_point(position).unwrap();

        assert!(view.on_wheel(&wheel(position.x, position.y, delta)));

        let after = view.shader_point(position).unwrap();
        let tolerance = 1e-3 * before.x.abs().max(before.y.abs()).max(1.0);
        assert!((after.x - before.x).abs() < tolerance, "{:?} vs {:?}", before, after);
        assert!((after.y - before.y).abs() < tolerance, "{:?} vs {:?}", before, after);
    }
}

#[test]
fn wheel_zoom_is_multiplicative() {
    let mut view = FractalViewTransform::new(100, 100);

    view.on_wheel(&wheel(50.0, 50.0, 120.0));

    assert_close(view.zoom(), DEFAULT_ZOOM * 1.12, "zoom");
}

#[test]
fn zoom_never_drops_below_floor() {
    let mut view = FractalViewTransform::new(100, 100);

    for _ in 0..10 {
        view.on_wheel(&wheel(30.0, 70.0, -900.0));
    }

    assert_close(view.zoom(), MIN_ZOOM, "zoom");
}

#[test]
fn zero_viewport_ignores_wheel_and_drag() {
    let mut view = FractalViewTransform::default();

    assert!(!view.on_wheel(&wheel(10.0, 10.0, 120.0)));
    view.on_pointer_down(&press(0.0, 0.0));
    assert!(!view.on_pointer_move(&moved(10.0, 10.0)));
    view.on_pointer_up(&release(10.0, 10.0));

    assert_close(view.zoom(), DEFAULT_ZOOM, "zoom");
    assert_eq!(view.shift(), Vector2::zero());
    assert!(view.shader_point(Vector2::new(1.0, 1.0)).is_none());
}

#[test]
fn shader_point_at_bottom_left_is_corner() {
    let view = FractalViewTransform::new(200, 100);

    let point = view.shader_point(Vector2::new(0.0, 100.0)).unwrap();

    assert_close(point.x, -1.0 / DEFAULT_ZOOM, "x");
    assert_close(point.y, -1.0 / DEFAULT_ZOOM, "y");
}
