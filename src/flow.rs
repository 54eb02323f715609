//! Render core interface and application event loop.
//!
//! A [`RenderCore`] is one interactive view: it owns its pipelines and view
//! state, receives window-system independent input and records its draw calls
//! into the frame's render pass. [`run`] hosts exactly one core in a winit
//! window.
//!
//! # Lifecycle
//!
//! 1. `init()` once, after the GPU context exists
//! 2. `resize()` on every surface size change (and once after `init`)
//! 3. pointer, wheel and key events as they arrive
//! 4. per frame: `update()` writes uniforms, `render()` records draws
//! 5. whenever the frame clock closes a window, `status()` becomes the title

use std::sync::Arc;

use anyhow::Context as _;
use cgmath::{Vector2, Zero};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::Window,
};

use crate::{
    config::ViewerConfig,
    context::Context,
    frame_clock::FrameClock,
    input::{PointerButton, PointerButtons, PointerEvent, ViewerKey, WHEEL_NOTCH, WheelEvent},
    render::render_frame,
};

pub trait RenderCore {
    /// Create GPU resources. Called once with a ready context.
    fn init(&mut self, ctx: &Context) -> anyhow::Result<()>;

    /// Surface size in physical pixels; never zero.
    fn resize(&mut self, width: u32, height: u32);

    /// Write this frame's uniforms.
    fn update(&mut self, ctx: &Context);

    /// Record draw calls. Pipeline, bind groups and buffers are set here.
    fn render(&self, pass: &mut wgpu::RenderPass<'_>);

    fn on_pointer_down(&mut self, event: &PointerEvent);
    fn on_pointer_move(&mut self, event: &PointerEvent);
    fn on_pointer_up(&mut self, event: &PointerEvent);
    fn on_wheel(&mut self, event: &WheelEvent);

    /// A key was released.
    fn on_key(&mut self, _key: ViewerKey) {}

    /// Window title for the latest frame rate.
    fn status(&self, fps: u32) -> String {
        format!("FPS: {}", fps)
    }
}

#[derive(Debug)]
struct PointerTracker {
    position: Vector2<f32>,
    held: PointerButtons,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            held: PointerButtons::NONE,
        }
    }
}

impl PointerTracker {
    fn event(&self, button: Option<PointerButton>) -> PointerEvent {
        PointerEvent {
            position: self.position,
            button,
            held: self.held,
        }
    }
}

struct AppState {
    ctx: Context,
    core: Box<dyn RenderCore>,
    clock: FrameClock,
    pointer: PointerTracker,
}

impl AppState {
    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.core.resize(width, height);
        }
    }

    fn redraw(&mut self) {
        self.core.update(&self.ctx);
        let core = &self.core;
        match render_frame(&self.ctx, |pass| core.render(pass)) {
            Ok(()) => {
                if let Some(rate) = self.clock.tick() {
                    log::info!("FPS: {}", rate);
                    self.ctx.window.set_title(&self.core.status(rate));
                }
            }
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                let size = self.ctx.window.inner_size();
                self.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
        self.ctx.window.request_redraw();
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: ViewerConfig,
    // Taken once the window exists.
    core: Option<Box<dyn RenderCore>>,
    state: Option<AppState>,
}

impl App {
    pub fn new(config: ViewerConfig, core: Box<dyn RenderCore>) -> anyhow::Result<Self> {
        let async_runtime =
            tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
        Ok(Self {
            async_runtime,
            config,
            core: Some(core),
            state: None,
        })
    }

    fn init_state(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create the window")?,
        );
        let ctx = self.async_runtime.block_on(Context::new(window))?;
        let mut core = self.core.take().context("render core already initialized")?;
        core.init(&ctx)?;
        let (width, height) = ctx.size();
        core.resize(width, height);

        Ok(AppState {
            ctx,
            core,
            clock: FrameClock::new(),
            pointer: PointerTracker::default(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init_state(event_loop) {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("App initialization failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => state.redraw(),
            WindowEvent::CursorMoved { position, .. } => {
                state.pointer.position = Vector2::new(position.x as f32, position.y as f32);
                let event = state.pointer.event(None);
                state.core.on_pointer_move(&event);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let Some(button) = PointerButton::from_winit(button) else {
                    return;
                };
                match button_state {
                    ElementState::Pressed => {
                        state.pointer.held.insert(button);
                        let event = state.pointer.event(Some(button));
                        state.core.on_pointer_down(&event);
                    }
                    ElementState::Released => {
                        state.pointer.held.remove(button);
                        let event = state.pointer.event(Some(button));
                        state.core.on_pointer_up(&event);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * WHEEL_NOTCH,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                state.core.on_wheel(&WheelEvent {
                    position: state.pointer.position,
                    delta,
                });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        ..
                    },
                ..
            } => {
                if let Some(key) = ViewerKey::from_winit(code) {
                    state.core.on_key(key);
                }
            }
            _ => {}
        }
    }
}

/// Opens a window and runs `core` until the window is closed.
pub fn run(config: ViewerConfig, core: Box<dyn RenderCore>) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, core)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
