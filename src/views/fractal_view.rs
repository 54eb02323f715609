use crate::{
    context::Context,
    controls::{FractalControls, ParamSelection},
    flow::RenderCore,
    fractal::{FractalParams, FractalViewTransform},
    input::{PointerEvent, ViewerKey, WheelEvent},
    pipelines::fractal::{FractalPipeline, FractalUniform},
};

const ITERATION_STEP: i32 = 10;
const PARAM_STEP: i32 = 25;

/// Pan/zoom fractal explorer.
pub struct FractalView {
    transform: FractalViewTransform,
    controls: FractalControls,
    pipeline: Option<FractalPipeline>,
}

impl FractalView {
    pub fn new(params: &FractalParams) -> Self {
        Self {
            transform: FractalViewTransform::default(),
            controls: FractalControls::from_params(params),
            pipeline: None,
        }
    }

    pub fn transform(&self) -> &FractalViewTransform {
        &self.transform
    }

    pub fn controls(&self) -> &FractalControls {
        &self.controls
    }

    pub fn uniform(&self) -> FractalUniform {
        FractalUniform::new(&self.controls.params(), &self.transform)
    }

    /// Applies a control key. Returns whether a value changed.
    pub fn apply_key(&mut self, key: ViewerKey) -> bool {
        match key {
            ViewerKey::BracketLeft => self.controls.iterations.nudge(-ITERATION_STEP),
            ViewerKey::BracketRight => self.controls.iterations.nudge(ITERATION_STEP),
            ViewerKey::Digit1 => self.select(ParamSelection::Param1),
            ViewerKey::Digit2 => self.select(ParamSelection::Param2),
            ViewerKey::Digit3 => self.select(ParamSelection::Param3),
            ViewerKey::Minus => self.controls.selected_mut().nudge(-PARAM_STEP),
            ViewerKey::Equal => self.controls.selected_mut().nudge(PARAM_STEP),
            _ => false,
        }
    }

    fn select(&mut self, selection: ParamSelection) -> bool {
        let changed = self.controls.selected != selection;
        self.controls.selected = selection;
        changed
    }
}

impl Default for FractalView {
    fn default() -> Self {
        Self::new(&FractalParams::default())
    }
}

impl RenderCore for FractalView {
    fn init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        self.pipeline = Some(FractalPipeline::new(&ctx.device, ctx.config.format));
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.transform.set_viewport(width, height);
    }

    fn update(&mut self, ctx: &Context) {
        if let Some(pipeline) = &self.pipeline {
            pipeline.write_uniform(&ctx.queue, &self.uniform());
        }
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(pipeline) = &self.pipeline {
            pipeline.draw(pass);
        }
    }

    fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.transform.on_pointer_down(event);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent) {
        self.transform.on_pointer_move(event);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) {
        self.transform.on_pointer_up(event);
    }

    fn on_wheel(&mut self, event: &WheelEvent) {
        self.transform.on_wheel(event);
    }

    fn on_key(&mut self, key: ViewerKey) {
        if self.apply_key(key) {
            let params = self.controls.params();
            log::debug!(
                "iterations {}, params ({}, {}, {})",
                params.iterations,
                params.param1,
                params.param2,
                params.param3
            );
        }
    }
}
