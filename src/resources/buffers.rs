//! Buffer region classification and upload.
//!
//! Regions are split into vertex and index lists in input order. Each region
//! gets exactly one GPU buffer, filled once and never written again.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::scene_graph::{ARRAY_BUFFER, BufferView, ELEMENT_ARRAY_BUFFER, SceneGraph},
    error::{BindingError, LoadError},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Slot in [`BufferTable::vertex`].
    Vertex(usize),
    /// Slot in [`BufferTable::index`].
    Index(usize),
    /// The region carries a tag that is neither vertex nor index.
    Rejected { tag: u32 },
}

/// Lookup table from region index to allocated slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferTable {
    /// Region indices classified as vertex data, in input order.
    pub vertex: Vec<usize>,
    /// Region indices classified as index data, in input order.
    pub index: Vec<usize>,
    classes: Vec<Classification>,
}

impl BufferTable {
    pub fn classification(&self, region: usize) -> Option<Classification> {
        self.classes.get(region).copied()
    }

    pub fn vertex_slot(&self, region: usize, semantic: &str) -> Result<usize, BindingError> {
        match self.classification(region) {
            Some(Classification::Vertex(slot)) => Ok(slot),
            Some(Classification::Rejected { tag }) => {
                Err(BindingError::UnrecognizedUsage { region, tag })
            }
            _ => Err(BindingError::NotVertexBuffer {
                semantic: semantic.to_string(),
                region,
            }),
        }
    }

    pub fn index_slot(&self, region: usize) -> Result<usize, BindingError> {
        match self.classification(region) {
            Some(Classification::Index(slot)) => Ok(slot),
            Some(Classification::Rejected { tag }) => {
                Err(BindingError::UnrecognizedUsage { region, tag })
            }
            _ => Err(BindingError::NotIndexBuffer { region }),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// A static GPU buffer holding one region's bytes.
#[derive(Debug)]
pub struct GpuBuffer {
    pub region: usize,
    pub buffer: wgpu::Buffer,
}

/// Owner of every buffer allocated for a scene.
#[derive(Debug, Default)]
pub struct GpuBuffers {
    pub vertex: Vec<GpuBuffer>,
    pub index: Vec<GpuBuffer>,
}

pub struct BufferAllocator;

impl BufferAllocator {
    /// Partitions regions by usage tag.
    ///
    /// An absent tag counts as vertex data. Regions with an unknown tag are
    /// recorded as rejected and logged; primitives that use them fail to bind.
    pub fn classify(regions: &[BufferView]) -> BufferTable {
        let mut table = BufferTable::default();
        for (region, view) in regions.iter().enumerate() {
            let class = match view.target {
                None | Some(ARRAY_BUFFER) => {
                    table.vertex.push(region);
                    Classification::Vertex(table.vertex.len() - 1)
                }
                Some(ELEMENT_ARRAY_BUFFER) => {
                    table.index.push(region);
                    Classification::Index(table.index.len() - 1)
                }
                Some(tag) => {
                    log::warn!("Buffer region {} has unrecognized usage tag {}", region, tag);
                    Classification::Rejected { tag }
                }
            };
            table.classes.push(class);
        }
        table
    }

    /// Checks that a region lies inside its backing buffer and returns its bytes.
    pub fn region_bytes<'g>(graph: &'g SceneGraph, region: usize) -> Result<&'g [u8], LoadError> {
        let view = graph
            .buffer_views
            .get(region)
            .ok_or(LoadError::UnknownRegion {
                region,
                count: graph.buffer_views.len(),
            })?;
        let raw = graph
            .buffers
            .get(view.buffer)
            .ok_or(LoadError::BufferOutOfRange {
                region,
                buffer: view.buffer,
                count: graph.buffers.len(),
            })?;
        match view.byte_range() {
            Some(range) if range.end <= raw.len() => Ok(&raw[range]),
            range => Err(LoadError::RegionOutOfBounds {
                region,
                end: range.map_or(usize::MAX, |range| range.end),
                len: raw.len(),
            }),
        }
    }

    /// Uploads every classified region into its own static buffer.
    pub fn allocate(
        device: &wgpu::Device,
        graph: &SceneGraph,
        table: &BufferTable,
    ) -> Result<GpuBuffers, LoadError> {
        let upload = |region: usize,
                      usage: wgpu::BufferUsages,
                      kind: &str|
              -> Result<GpuBuffer, LoadError> {
            let contents = Self::region_bytes(graph, region)?;
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Region {} {} Buffer", region, kind)),
                contents,
                usage,
            });
            Ok(GpuBuffer { region, buffer })
        };

        let vertex = table
            .vertex
            .iter()
            .map(|&region| upload(region, wgpu::BufferUsages::VERTEX, "Vertex"))
            .collect::<Result<Vec<_>, LoadError>>()?;
        let index = table
            .index
            .iter()
            .map(|&region| upload(region, wgpu::BufferUsages::INDEX, "Index"))
            .collect::<Result<Vec<_>, LoadError>>()?;

        log::debug!(
            "Allocated {} vertex and {} index buffers",
            vertex.len(),
            index.len()
        );
        Ok(GpuBuffers { vertex, index })
    }
}
