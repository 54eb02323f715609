use std::path::PathBuf;

use cgmath::{EuclideanSpace, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    camera::{CameraStep, OrbitCamera, Projection},
    context::Context,
    controls::SceneControls,
    data_structures::{
        draw_batch::{BatchTexture, DrawBatch, DrawBatches, FALLBACK_BUFFER_SIZE},
        scene_graph::SceneGraph,
        texture::Texture,
    },
    flow::RenderCore,
    input::{PointerEvent, ViewerKey, WheelEvent},
    pipelines::scene::{ScenePipelines, SceneUniform},
    resources::{
        self,
        binder::{SceneBinder, SceneBinding},
        buffers::{BufferAllocator, GpuBuffers},
        texture::{diffuse_bind_group, to_rgba},
    },
};

const MORPH_STEP: i32 = 5;
const AZIMUTH_STEP: i32 = 15;
const INTENSITY_STEP: i32 = 5;

struct SceneResources {
    pipelines: ScenePipelines,
    batches: Vec<DrawBatch>,
    untextured: wgpu::BindGroup,
    // Owns the buffers the batches draw from.
    _buffers: GpuBuffers,
    _blank: Texture,
}

/// glTF viewer that morphs the model towards a sphere.
pub struct MorphingView {
    model_path: PathBuf,
    camera: OrbitCamera,
    projection: Projection,
    controls: SceneControls,
    uniform: SceneUniform,
    scene: Option<SceneResources>,
}

impl MorphingView {
    pub fn new(model_path: impl Into<PathBuf>, camera: OrbitCamera) -> Self {
        Self {
            model_path: model_path.into(),
            camera,
            projection: Projection::new(1, 1, cgmath::Deg(60.0), 0.1, 100.0),
            controls: SceneControls::default(),
            uniform: SceneUniform::new(),
            scene: None,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn controls(&self) -> &SceneControls {
        &self.controls
    }

    /// Number of batches drawn per frame.
    pub fn batch_count(&self) -> usize {
        self.scene.as_ref().map_or(0, |scene| scene.batches.len())
    }

    /// Recomputes the uniform block from camera, projection and controls.
    pub fn refresh_uniform(&mut self) -> &SceneUniform {
        let params = self.controls.params();
        self.uniform.set_matrices(
            Matrix4::identity(),
            self.camera.view_matrix(),
            self.projection.calc_matrix(),
        );
        self.uniform.set_morphing(params.morphing);
        self.uniform
            .set_light(params.light_color, params.light_intensity, params.light_position);
        self.uniform.set_view_pos(self.camera.location().to_vec());
        &self.uniform
    }

    /// Applies a camera or control key. Returns whether anything changed.
    pub fn apply_key(&mut self, key: ViewerKey) -> bool {
        let step = match key {
            ViewerKey::E => Some(CameraStep::Forward),
            ViewerKey::F => Some(CameraStep::Backward),
            ViewerKey::W => Some(CameraStep::Up),
            ViewerKey::S => Some(CameraStep::Down),
            ViewerKey::A => Some(CameraStep::Left),
            ViewerKey::D => Some(CameraStep::Right),
            _ => None,
        };
        if let Some(step) = step {
            self.camera.step(step);
            return true;
        }
        match key {
            ViewerKey::M => self.controls.morph.nudge(MORPH_STEP),
            ViewerKey::N => self.controls.morph.nudge(-MORPH_STEP),
            ViewerKey::L => self.controls.azimuth.nudge(AZIMUTH_STEP),
            ViewerKey::K => self.controls.azimuth.nudge(-AZIMUTH_STEP),
            ViewerKey::I => self.controls.intensity.nudge(INTENSITY_STEP),
            ViewerKey::U => self.controls.intensity.nudge(-INTENSITY_STEP),
            _ => false,
        }
    }

    fn load_graph(&self) -> SceneGraph {
        match resources::load_scene_gltf(&self.model_path) {
            Ok(graph) => graph,
            Err(e) => {
                log::error!("Showing an empty scene: {:#}", e);
                SceneGraph::default()
            }
        }
    }
}

fn bind_scene(graph: &SceneGraph) -> SceneBinding {
    match SceneBinder::new(graph).bind() {
        Ok(binding) => {
            if !binding.skipped.is_empty() {
                log::warn!("Skipped {} primitives", binding.skipped.len());
            }
            binding
        }
        Err(e) => {
            log::error!("Scene binding aborted: {}", e);
            SceneBinding::default()
        }
    }
}

fn batch_texture(
    ctx: &Context,
    layout: &wgpu::BindGroupLayout,
    graph: &SceneGraph,
    image: usize,
) -> Option<BatchTexture> {
    let source = graph.images.get(image)?;
    let rgba = match to_rgba(image, source) {
        Ok(rgba) => rgba,
        Err(e) => {
            log::warn!("Drawing untextured: {}", e);
            return None;
        }
    };
    if rgba.width() == 0 || rgba.height() == 0 {
        log::warn!("Drawing untextured: image {} is empty", image);
        return None;
    }
    let label = format!("image {}", image);
    let texture = Texture::from_rgba(&ctx.device, &ctx.queue, &rgba, Some(&label));
    let bind_group = diffuse_bind_group(&ctx.device, layout, &texture, &label);
    Some(BatchTexture {
        texture,
        bind_group,
    })
}

fn build_scene(ctx: &Context, graph: &SceneGraph) -> SceneResources {
    let mut pipelines = ScenePipelines::new(&ctx.device, ctx.config.format);
    let blank = Texture::create_blank(&ctx.device, &ctx.queue);
    let untextured =
        diffuse_bind_group(&ctx.device, &pipelines.texture_layout, &blank, "untextured");

    let binding = bind_scene(graph);
    let buffers = match BufferAllocator::allocate(&ctx.device, graph, &binding.table) {
        Ok(buffers) => buffers,
        Err(e) => {
            log::error!("Buffer upload failed, showing an empty scene: {}", e);
            return SceneResources {
                pipelines,
                batches: Vec::new(),
                untextured,
                _buffers: GpuBuffers::default(),
                _blank: blank,
            };
        }
    };
    let fallback = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Missing Attribute Buffer"),
            contents: &[0u8; FALLBACK_BUFFER_SIZE as usize],
            usage: wgpu::BufferUsages::VERTEX,
        });

    let batches: Vec<DrawBatch> = binding
        .batches
        .iter()
        .filter_map(|descriptor| {
            let texture = descriptor
                .image
                .and_then(|image| batch_texture(ctx, &pipelines.texture_layout, graph, image));
            let batch = DrawBatch::new(descriptor, &buffers, &fallback, texture);
            if batch.is_none() {
                log::error!(
                    "Primitive {} of mesh {} references an unallocated buffer",
                    descriptor.primitive,
                    descriptor.mesh
                );
            }
            batch
        })
        .collect();
    pipelines.prepare(&ctx.device, batches.iter().map(|batch| &batch.layout));

    log::info!(
        "Bound {} draw batches using {} pipelines",
        batches.len(),
        pipelines.len()
    );
    SceneResources {
        pipelines,
        batches,
        untextured,
        _buffers: buffers,
        _blank: blank,
    }
}

impl RenderCore for MorphingView {
    fn init(&mut self, ctx: &Context) -> anyhow::Result<()> {
        let graph = self.load_graph();
        self.scene = Some(build_scene(ctx, &graph));
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.camera.set_viewport(width, height);
    }

    fn update(&mut self, ctx: &Context) {
        self.refresh_uniform();
        if let Some(scene) = &self.scene {
            scene.pipelines.write_uniform(&ctx.queue, &self.uniform);
        }
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(scene) = &self.scene else {
            return;
        };
        pass.draw_batches(
            &scene.batches,
            |layout| scene.pipelines.get(layout),
            &scene.pipelines.bind_group,
            &scene.untextured,
        );
    }

    fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.camera.on_pointer_down(event);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent) {
        self.camera.on_pointer_move(event);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) {
        self.camera.on_pointer_up(event);
    }

    fn on_wheel(&mut self, event: &WheelEvent) {
        self.camera.on_wheel(event);
    }

    fn on_key(&mut self, key: ViewerKey) {
        self.apply_key(key);
    }

    fn status(&self, fps: u32) -> String {
        format!("FPS: {}, morphing: {}", fps, self.controls.morph.value())
    }
}
