//! Lit, morphing scene pipelines.
//!
//! wgpu fixes vertex formats, strides and topology per pipeline, so one
//! pipeline is built for every distinct [`BatchLayout`] in the scene.

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::draw_batch::{BatchLayout, SLOT_COUNT},
    pipelines::basic::{self, mk_render_pipeline},
    resources::texture::diffuse_layout,
};

/// Mirrors `SceneUniforms` in `scene.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub morphing: [f32; 3],
    _padding: f32,
    pub light_color: [f32; 3],
    pub light_intensity: f32,
    pub light_pos: [f32; 3],
    _padding2: f32,
    pub view_pos: [f32; 3],
    _padding3: f32,
}

impl SceneUniform {
    pub fn new() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            model: identity,
            view: identity,
            projection: identity,
            morphing: [0.0; 3],
            _padding: 0.0,
            light_color: [1.0, 1.0, 1.0],
            light_intensity: 1.0,
            light_pos: [0.0; 3],
            _padding2: 0.0,
            view_pos: [0.0; 3],
            _padding3: 0.0,
        }
    }

    pub fn set_matrices(&mut self, model: Matrix4<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.model = model.into();
        self.view = view.into();
        self.projection = projection.into();
    }

    pub fn set_morphing(&mut self, factor: f32) {
        self.morphing = [factor, 0.0, 0.0];
    }

    pub fn set_light(&mut self, color: Vector3<f32>, intensity: f32, position: Vector3<f32>) {
        self.light_color = color.into();
        self.light_intensity = intensity;
        self.light_pos = position.into();
    }

    pub fn set_view_pos(&mut self, position: Vector3<f32>) {
        self.view_pos = position.into();
    }
}

impl Default for SceneUniform {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ScenePipelines {
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub texture_layout: wgpu::BindGroupLayout,
    layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    pipelines: HashMap<BatchLayout, wgpu::RenderPipeline>,
}

impl ScenePipelines {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::new()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_layout = basic::mk_uniform_layout(device, "scene_bind_group_layout");
        let bind_group =
            basic::mk_uniform_bind_group(device, &uniform_layout, &uniform_buffer, "scene_bind_group");
        let texture_layout = diffuse_layout(device);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        Self {
            uniform_buffer,
            bind_group,
            texture_layout,
            layout,
            shader,
            color_format,
            pipelines: HashMap::new(),
        }
    }

    /// Builds the pipelines for every layout not seen yet.
    pub fn prepare<'a>(&mut self, device: &wgpu::Device, layouts: impl IntoIterator<Item = &'a BatchLayout>) {
        for layout in layouts {
            if self.pipelines.contains_key(layout) {
                continue;
            }
            log::debug!("Creating scene pipeline for {:?}", layout);
            let pipeline = self.create(device, layout);
            self.pipelines.insert(*layout, pipeline);
        }
    }

    pub fn get(&self, layout: &BatchLayout) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(layout)
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &SceneUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    fn create(&self, device: &wgpu::Device, layout: &BatchLayout) -> wgpu::RenderPipeline {
        let attributes: [[wgpu::VertexAttribute; 1]; SLOT_COUNT] = std::array::from_fn(|location| {
            [wgpu::VertexAttribute {
                format: layout.slot_or_fallback(location).format,
                offset: 0,
                shader_location: location as u32,
            }]
        });
        let buffers: Vec<wgpu::VertexBufferLayout> = attributes
            .iter()
            .enumerate()
            .map(|(location, attribute)| wgpu::VertexBufferLayout {
                array_stride: layout.slot_or_fallback(location).stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attribute,
            })
            .collect();

        let culls = matches!(
            layout.topology,
            wgpu::PrimitiveTopology::TriangleList | wgpu::PrimitiveTopology::TriangleStrip
        );
        mk_render_pipeline(
            device,
            "Scene Pipeline",
            &self.layout,
            self.color_format,
            wgpu::PrimitiveState {
                topology: layout.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: culls.then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            basic::depth_less(),
            &buffers,
            &self.shader,
        )
    }
}
