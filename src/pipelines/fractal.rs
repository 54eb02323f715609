//! Full-screen fractal pipeline.

use wgpu::util::DeviceExt;

use crate::{
    fractal::{FractalParams, FractalViewTransform},
    pipelines::basic::{self, mk_render_pipeline},
};

/// Mirrors `FractalUniforms` in `fractal.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FractalUniform {
    pub iterations: i32,
    pub param1: f32,
    pub param2: f32,
    pub param3: f32,
    pub zoom: f32,
    // `shift` is a vec2 and needs 8 byte alignment
    _padding: f32,
    pub shift: [f32; 2],
}

impl FractalUniform {
    pub fn new(params: &FractalParams, view: &FractalViewTransform) -> Self {
        Self {
            iterations: params.iterations,
            param1: params.param1,
            param2: params.param2,
            param3: params.param3,
            zoom: view.zoom(),
            _padding: 0.0,
            shift: view.shift().into(),
        }
    }
}

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 8] = [
    -1.0, -1.0,
     1.0, -1.0,
    -1.0,  1.0,
     1.0,  1.0,
];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 2, 3];

pub struct FractalPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl FractalPipeline {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fractal Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FractalUniform::new(
                &FractalParams::default(),
                &FractalViewTransform::default(),
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = basic::mk_uniform_layout(device, "fractal_bind_group_layout");
        let bind_group = basic::mk_uniform_bind_group(
            device,
            &bind_group_layout,
            &uniform_buffer,
            "fractal_bind_group",
        );

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fractal Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fractal Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Fractal Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Fractal Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("fractal.wgsl").into()),
        });
        let render_pipeline = mk_render_pipeline(
            device,
            "Fractal Pipeline",
            &layout,
            color_format,
            wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            basic::depth_ignored(),
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2],
            }],
            &shader,
        );

        Self {
            render_pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &FractalUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.render_pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}
