//! Scene traversal and primitive binding.
//!
//! [`SceneBinder`] walks the default scene depth-first and turns every mesh
//! primitive it reaches into a [`BatchDescriptor`]: which classified buffer
//! feeds each attribute slot, with which vertex format, and how the primitive is
//! drawn. Descriptors are plain data; [`crate::data_structures::draw_batch`]
//! turns them into GPU draw batches.

use crate::{
    data_structures::{
        draw_batch::{BatchLayout, SlotLayout},
        scene_graph::{Accessor, BufferView, ComponentType, Primitive, PrimitiveMode, SceneGraph},
    },
    error::{BindingError, LoadError, PrimitiveError},
    resources::buffers::{BufferAllocator, BufferTable},
};

/// Fixed attribute slots shared with `scene.wgsl`.
pub const ATTRIBUTE_LOCATIONS: [(&str, u32); 3] = [("POSITION", 0), ("NORMAL", 1), ("TEXCOORD_0", 2)];
pub const POSITION_LOCATION: u32 = 0;

pub fn attribute_location(semantic: &str) -> Option<u32> {
    ATTRIBUTE_LOCATIONS
        .iter()
        .find(|(name, _)| *name == semantic)
        .map(|(_, location)| *location)
}

/// Vertex formats the scene shader can read as floats.
pub fn vertex_format(
    component_type: ComponentType,
    components: usize,
    normalized: bool,
) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;
    match (component_type, components, normalized) {
        (ComponentType::F32, 1, _) => Some(F::Float32),
        (ComponentType::F32, 2, _) => Some(F::Float32x2),
        (ComponentType::F32, 3, _) => Some(F::Float32x3),
        (ComponentType::F32, 4, _) => Some(F::Float32x4),
        (ComponentType::U8, 2, true) => Some(F::Unorm8x2),
        (ComponentType::U8, 4, true) => Some(F::Unorm8x4),
        (ComponentType::I8, 2, true) => Some(F::Snorm8x2),
        (ComponentType::I8, 4, true) => Some(F::Snorm8x4),
        (ComponentType::U16, 2, true) => Some(F::Unorm16x2),
        (ComponentType::U16, 4, true) => Some(F::Unorm16x4),
        (ComponentType::I16, 2, true) => Some(F::Snorm16x2),
        (ComponentType::I16, 4, true) => Some(F::Snorm16x4),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeBinding {
    pub semantic: String,
    pub location: u32,
    /// Slot in [`BufferTable::vertex`].
    pub buffer_slot: usize,
    pub byte_offset: u64,
    pub byte_stride: u64,
    /// 1 for scalars, the declared component count otherwise.
    pub components: usize,
    pub format: wgpu::VertexFormat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexBinding {
    /// Slot in [`BufferTable::index`].
    pub buffer_slot: usize,
    pub count: u32,
    pub component_type: ComponentType,
    pub format: wgpu::IndexFormat,
    pub byte_offset: u64,
}

/// Everything needed to build one draw batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchDescriptor {
    pub node: usize,
    pub mesh: usize,
    pub primitive: usize,
    pub mode: PrimitiveMode,
    pub topology: wgpu::PrimitiveTopology,
    pub attributes: Vec<AttributeBinding>,
    pub index: Option<IndexBinding>,
    /// Vertex count of the POSITION accessor.
    pub vertex_count: u32,
    /// Image resolved through the primitive's material, if any.
    pub image: Option<usize>,
}

impl BatchDescriptor {
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Elements to draw: the index count when indexed, the vertex count otherwise.
    pub fn index_count(&self) -> u32 {
        self.index
            .as_ref()
            .map_or(self.vertex_count, |index| index.count)
    }

    pub fn layout(&self) -> BatchLayout {
        let mut slots = [None; ATTRIBUTE_LOCATIONS.len()];
        for attribute in &self.attributes {
            slots[attribute.location as usize] = Some(SlotLayout {
                format: attribute.format,
                stride: attribute.byte_stride,
            });
        }
        BatchLayout {
            topology: self.topology,
            slots,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedPrimitive {
    pub mesh: usize,
    pub primitive: usize,
    pub reason: PrimitiveError,
}

/// Result of binding a scene.
#[derive(Clone, Debug, Default)]
pub struct SceneBinding {
    pub table: BufferTable,
    pub batches: Vec<BatchDescriptor>,
    pub skipped: Vec<SkippedPrimitive>,
    /// Texture lookups that failed; the affected batches draw untextured.
    pub texture_errors: Vec<LoadError>,
}

pub struct SceneBinder<'g> {
    graph: &'g SceneGraph,
    table: BufferTable,
}

impl<'g> SceneBinder<'g> {
    pub fn new(graph: &'g SceneGraph) -> Self {
        let table = BufferAllocator::classify(&graph.buffer_views);
        Self { graph, table }
    }

    pub fn table(&self) -> &BufferTable {
        &self.table
    }

    /// Binds every primitive reachable from the default scene.
    ///
    /// Structural problems (missing scene, bad node or mesh index, a node
    /// reached twice) abort the whole scene. Per-primitive problems are
    /// collected in [`SceneBinding::skipped`] and binding carries on.
    pub fn bind(self) -> Result<SceneBinding, LoadError> {
        let graph = self.graph;
        let scene_index = graph.default_scene.ok_or(LoadError::NoDefaultScene)?;
        let scene = graph
            .scenes
            .get(scene_index)
            .ok_or(LoadError::SceneOutOfRange {
                scene: scene_index,
                count: graph.scenes.len(),
            })?;

        let mut binding = SceneBinding::default();
        let mut visited = vec![false; graph.nodes.len()];
        let mut stack: Vec<usize> = scene.nodes.iter().rev().copied().collect();

        while let Some(node_index) = stack.pop() {
            let node = graph
                .nodes
                .get(node_index)
                .ok_or(LoadError::NodeOutOfRange {
                    node: node_index,
                    count: graph.nodes.len(),
                })?;
            if std::mem::replace(&mut visited[node_index], true) {
                return Err(LoadError::CyclicGraph { node: node_index });
            }

            if let Some(mesh_index) = node.mesh {
                let mesh = graph
                    .meshes
                    .get(mesh_index)
                    .ok_or(LoadError::MeshOutOfRange {
                        node: node_index,
                        mesh: mesh_index,
                        count: graph.meshes.len(),
                    })?;
                log::debug!(
                    "Binding mesh {} ({}) of node {}",
                    mesh_index,
                    mesh.name.as_deref().unwrap_or("unnamed"),
                    node_index
                );
                for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
                    match self.bind_primitive(node_index, mesh_index, primitive_index, primitive) {
                        Ok((batch, texture_error)) => {
                            binding.batches.push(batch);
                            binding.texture_errors.extend(texture_error);
                        }
                        Err(reason) => {
                            log::warn!(
                                "Skipping primitive {} of mesh {}: {}",
                                primitive_index,
                                mesh_index,
                                reason
                            );
                            binding.skipped.push(SkippedPrimitive {
                                mesh: mesh_index,
                                primitive: primitive_index,
                                reason,
                            });
                        }
                    }
                }
            }

            stack.extend(node.children.iter().rev());
        }

        binding.table = self.table;
        Ok(binding)
    }

    fn bind_primitive(
        &self,
        node: usize,
        mesh: usize,
        primitive_index: usize,
        primitive: &Primitive,
    ) -> Result<(BatchDescriptor, Option<LoadError>), PrimitiveError> {
        let topology = primitive
            .mode
            .topology()
            .ok_or(BindingError::UnsupportedPrimitiveMode(primitive.mode))?;

        let mut attributes = Vec::new();
        let mut vertex_count = None;
        for (semantic, accessor_index) in &primitive.attributes {
            let Some(location) = attribute_location(semantic) else {
                log::debug!("Attribute {} has no slot, ignoring it", semantic);
                continue;
            };
            let (accessor, region, view, count) = self.accessor_region(*accessor_index)?;
            let buffer_slot = self.table.vertex_slot(region, semantic)?;

            let components = accessor.kind.components();
            let format = vertex_format(accessor.component_type, components, accessor.normalized)
                .ok_or_else(|| BindingError::UnsupportedAttributeFormat {
                    semantic: semantic.clone(),
                    component_type: accessor.component_type,
                    components,
                    normalized: accessor.normalized,
                })?;
            let stride = accessor.byte_stride(view);
            if accessor.byte_offset % 4 != 0 || stride % 4 != 0 {
                return Err(BindingError::MisalignedAttribute {
                    semantic: semantic.clone(),
                    offset: accessor.byte_offset,
                    stride,
                }
                .into());
            }

            if location == POSITION_LOCATION {
                vertex_count = Some(count);
            }
            attributes.push(AttributeBinding {
                semantic: semantic.clone(),
                location,
                buffer_slot,
                byte_offset: accessor.byte_offset as u64,
                byte_stride: stride as u64,
                components,
                format,
            });
        }
        let vertex_count = vertex_count.ok_or(BindingError::MissingPosition)?;

        let index = match primitive.indices {
            Some(accessor_index) => Some(self.bind_indices(accessor_index)?),
            None => None,
        };

        let (image, texture_error) = match self.resolve_image(primitive) {
            Ok(image) => (image, None),
            Err(err) => {
                log::warn!(
                    "Primitive {} of mesh {} is drawn untextured: {}",
                    primitive_index,
                    mesh,
                    err
                );
                (None, Some(err))
            }
        };

        let batch = BatchDescriptor {
            node,
            mesh,
            primitive: primitive_index,
            mode: primitive.mode,
            topology,
            attributes,
            index,
            vertex_count,
            image,
        };
        Ok((batch, texture_error))
    }

    fn bind_indices(&self, accessor_index: usize) -> Result<IndexBinding, PrimitiveError> {
        let (accessor, region, _, count) = self.accessor_region(accessor_index)?;
        let buffer_slot = self.table.index_slot(region)?;
        let format = match accessor.component_type {
            ComponentType::U16 => wgpu::IndexFormat::Uint16,
            ComponentType::U32 => wgpu::IndexFormat::Uint32,
            other => return Err(BindingError::UnsupportedIndexType(other).into()),
        };
        Ok(IndexBinding {
            buffer_slot,
            count,
            component_type: accessor.component_type,
            format,
            byte_offset: accessor.byte_offset as u64,
        })
    }

    fn accessor_region(
        &self,
        accessor_index: usize,
    ) -> Result<(&'g Accessor, usize, &'g BufferView, u32), PrimitiveError> {
        let graph = self.graph;
        let accessor = graph
            .accessors
            .get(accessor_index)
            .ok_or(LoadError::AccessorOutOfRange {
                accessor: accessor_index,
                count: graph.accessors.len(),
            })?;
        let region = accessor
            .buffer_view
            .ok_or(BindingError::MissingBufferView {
                accessor: accessor_index,
            })?;
        let view = graph
            .buffer_views
            .get(region)
            .ok_or(LoadError::RegionOutOfRange {
                accessor: accessor_index,
                region,
                count: graph.buffer_views.len(),
            })?;
        // The last element must end inside the region, and even an empty
        // accessor may not start past it.
        let end = match accessor.count.checked_sub(1) {
            None => Some(accessor.byte_offset),
            Some(last) => last
                .checked_mul(accessor.byte_stride(view))
                .and_then(|span| span.checked_add(accessor.byte_offset))
                .and_then(|span| span.checked_add(accessor.element_size())),
        };
        match end {
            Some(end) if end <= view.byte_length && accessor.byte_offset < view.byte_length => {}
            _ => {
                return Err(LoadError::AccessorOutOfBounds {
                    accessor: accessor_index,
                    end: end.unwrap_or(usize::MAX),
                    len: view.byte_length,
                }
                .into())
            }
        }
        let count = u32::try_from(accessor.count).map_err(|_| BindingError::CountOverflow {
            accessor: accessor_index,
            count: accessor.count,
        })?;
        Ok((accessor, region, view, count))
    }

    /// Follows material -> base colour texture -> image.
    fn resolve_image(&self, primitive: &Primitive) -> Result<Option<usize>, LoadError> {
        let graph = self.graph;
        let Some(material_index) = primitive.material else {
            return Ok(None);
        };
        let material = graph
            .materials
            .get(material_index)
            .ok_or(LoadError::MaterialOutOfRange {
                index: material_index,
                count: graph.materials.len(),
            })?;
        let Some(texture_index) = material.base_color_texture else {
            return Ok(None);
        };
        let texture = graph
            .textures
            .get(texture_index)
            .ok_or(LoadError::TextureOutOfRange {
                index: texture_index,
                count: graph.textures.len(),
            })?;
        match texture.source {
            Some(image) if image < graph.images.len() => Ok(Some(image)),
            Some(image) => Err(LoadError::TextureOutOfRange {
                index: image,
                count: graph.images.len(),
            }),
            None => Ok(None),
        }
    }
}
