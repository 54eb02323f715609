//! GPU draw batches.
//!
//! A [`DrawBatch`] is the realized form of a
//! [`BatchDescriptor`](crate::resources::binder::BatchDescriptor): it holds
//! handles to the buffers feeding each attribute slot, the optional index
//! buffer and the batch's own texture. Batches are created once at load time
//! and never mutated.

use crate::{
    data_structures::{scene_graph::PrimitiveMode, texture::Texture},
    resources::{binder::BatchDescriptor, buffers::GpuBuffers},
};

/// Number of vertex attribute slots (POSITION, NORMAL, TEXCOORD_0).
pub const SLOT_COUNT: usize = 3;

/// Formats used for slots a primitive does not provide.
pub const FALLBACK_FORMATS: [wgpu::VertexFormat; SLOT_COUNT] = [
    wgpu::VertexFormat::Float32x3,
    wgpu::VertexFormat::Float32x3,
    wgpu::VertexFormat::Float32x2,
];

/// Size of the zeroed buffer that feeds missing slots.
pub const FALLBACK_BUFFER_SIZE: u64 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotLayout {
    pub format: wgpu::VertexFormat,
    pub stride: u64,
}

/// Everything a render pipeline must know about a batch's vertex input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchLayout {
    pub topology: wgpu::PrimitiveTopology,
    pub slots: [Option<SlotLayout>; SLOT_COUNT],
}

impl BatchLayout {
    /// The slot's layout, or a zero-stride fallback if the batch lacks it.
    pub fn slot_or_fallback(&self, location: usize) -> SlotLayout {
        self.slots[location].unwrap_or(SlotLayout {
            format: FALLBACK_FORMATS[location],
            stride: 0,
        })
    }
}

/// A vertex buffer bound to one attribute slot.
#[derive(Clone, Debug)]
pub struct VertexSlot {
    pub buffer: wgpu::Buffer,
    pub offset: u64,
}

/// Per-slot vertex buffer bindings.
#[derive(Clone, Debug)]
pub struct VertexState {
    pub slots: [VertexSlot; SLOT_COUNT],
}

#[derive(Clone, Debug)]
pub struct IndexState {
    pub buffer: wgpu::Buffer,
    pub format: wgpu::IndexFormat,
    pub byte_offset: u64,
}

#[derive(Debug)]
pub struct BatchTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct DrawBatch {
    pub layout: BatchLayout,
    pub mode: PrimitiveMode,
    /// Indices to draw when indexed, vertices otherwise.
    pub index_count: u32,
    vertex_state: VertexState,
    index: Option<IndexState>,
    texture: Option<BatchTexture>,
}

impl DrawBatch {
    /// Resolves the descriptor's buffer slots against the allocated buffers.
    ///
    /// Returns `None` if a slot has no allocated buffer, which only happens
    /// when the descriptor was built from a different table.
    pub fn new(
        descriptor: &BatchDescriptor,
        buffers: &GpuBuffers,
        fallback: &wgpu::Buffer,
        texture: Option<BatchTexture>,
    ) -> Option<Self> {
        let fallback_slot = VertexSlot {
            buffer: fallback.clone(),
            offset: 0,
        };
        let mut slots = [fallback_slot.clone(), fallback_slot.clone(), fallback_slot];
        for attribute in &descriptor.attributes {
            let gpu = buffers.vertex.get(attribute.buffer_slot)?;
            slots[attribute.location as usize] = VertexSlot {
                buffer: gpu.buffer.clone(),
                offset: attribute.byte_offset,
            };
        }

        let index = match &descriptor.index {
            Some(binding) => {
                let gpu = buffers.index.get(binding.buffer_slot)?;
                Some(IndexState {
                    buffer: gpu.buffer.clone(),
                    format: binding.format,
                    byte_offset: binding.byte_offset,
                })
            }
            None => None,
        };

        Some(Self {
            layout: descriptor.layout(),
            mode: descriptor.mode,
            index_count: descriptor.index_count(),
            vertex_state: VertexState { slots },
            index,
            texture,
        })
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    pub fn index_format(&self) -> Option<wgpu::IndexFormat> {
        self.index.as_ref().map(|index| index.format)
    }

    pub fn index_byte_offset(&self) -> Option<u64> {
        self.index.as_ref().map(|index| index.byte_offset)
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref().map(|t| &t.texture)
    }

    /// Binds vertex state and texture, then issues the draw.
    ///
    /// The pipeline matching [`Self::layout`] and the scene bind group
    /// (group 0) must already be set. `untextured` is bound to group 1 when
    /// the batch has no texture.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, untextured: &wgpu::BindGroup) {
        let bind_group = self
            .texture
            .as_ref()
            .map_or(untextured, |texture| &texture.bind_group);
        pass.set_bind_group(1, bind_group, &[]);

        for (location, slot) in self.vertex_state.slots.iter().enumerate() {
            pass.set_vertex_buffer(location as u32, slot.buffer.slice(slot.offset..));
        }

        match &self.index {
            Some(index) => {
                pass.set_index_buffer(index.buffer.slice(index.byte_offset..), index.format);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            None => pass.draw(0..self.index_count, 0..1),
        }
    }
}

/// Draws a list of batches, switching pipelines as layouts change.
pub trait DrawBatches {
    fn draw_batches<'p>(
        &mut self,
        batches: &[DrawBatch],
        pipeline_for: impl Fn(&BatchLayout) -> Option<&'p wgpu::RenderPipeline>,
        scene_bind_group: &wgpu::BindGroup,
        untextured: &wgpu::BindGroup,
    );
}

impl DrawBatches for wgpu::RenderPass<'_> {
    fn draw_batches<'p>(
        &mut self,
        batches: &[DrawBatch],
        pipeline_for: impl Fn(&BatchLayout) -> Option<&'p wgpu::RenderPipeline>,
        scene_bind_group: &wgpu::BindGroup,
        untextured: &wgpu::BindGroup,
    ) {
        let mut current: Option<BatchLayout> = None;
        for batch in batches {
            if current != Some(batch.layout) {
                let Some(pipeline) = pipeline_for(&batch.layout) else {
                    log::error!("No pipeline for batch layout {:?}", batch.layout);
                    continue;
                };
                self.set_pipeline(pipeline);
                self.set_bind_group(0, scene_bind_group, &[]);
                current = Some(batch.layout);
            }
            batch.draw(self, untextured);
        }
    }
}
